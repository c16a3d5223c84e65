//! EventSink port - イベント表面化の抽象化
//!
//! Coordinator は失敗を返り値で伝播しない経路（debounce タスク内など）を
//! 持つ。そこで起きたことはこの sink へ流す。
//!
//! # 実装
//! - `impls::ChannelEventSink`: 表示層が drain する（本番用）
//! - `impls::TracingEventSink`: ログに出すだけ
//! - `impls::RecordingEventSink`: テストで観測する

use crate::domain::SyncEvent;

/// EventSink は同期境界のイベントを記録
///
/// `emit` must not block and must not fail: surfacing an error can never
/// make the mutation that caused it worse.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SyncEvent);
}

/// 何もしない sink（配線を省きたいテスト用）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: SyncEvent) {}
}
