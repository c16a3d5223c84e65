//! Event sinks - Coordinator が表面化するイベントの実装
//!
//! - `ChannelEventSink`: 表示層が drain する（本番用）
//! - `TracingEventSink`: 構造化ログに流すだけ
//! - `RecordingEventSink`: テストで観測する

use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::info;

use crate::domain::SyncEvent;
use crate::ports::EventSink;

/// 表示層へイベントを渡す sink。受け手が先に居なくなっていても
/// 送信失敗で mutation 側を巻き込まない。
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<SyncEvent>,
}

impl ChannelEventSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: SyncEvent) {
        let _ = self.tx.send(event);
    }
}

/// ログ専用 sink。
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: SyncEvent) {
        info!(kind = event.kind(), event = ?event, "sync event");
    }
}

/// テスト用: emit された順に覚えておく。
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().expect("event sink lock poisoned").clone()
    }

    /// `SyncEvent::kind` のリスト（assert しやすい形）。
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(SyncEvent::kind).collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: SyncEvent) {
        self.events.lock().expect("event sink lock poisoned").push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SyncError;

    #[tokio::test]
    async fn channel_sink_delivers_in_order() {
        let (sink, mut rx) = ChannelEventSink::new();
        sink.emit(SyncEvent::Reloaded { todos: 1 });
        sink.emit(SyncEvent::WentOffline {
            reason: "down".to_string(),
        });

        assert_eq!(rx.recv().await, Some(SyncEvent::Reloaded { todos: 1 }));
        assert!(matches!(rx.recv().await, Some(SyncEvent::WentOffline { .. })));
    }

    #[test]
    fn channel_sink_survives_a_dropped_receiver() {
        let (sink, rx) = ChannelEventSink::new();
        drop(rx);
        // panic しないことだけが大事
        sink.emit(SyncEvent::CacheFailed {
            error: SyncError::Cache("disk full".to_string()),
        });
    }

    #[test]
    fn recording_sink_reports_kinds() {
        let sink = RecordingEventSink::new();
        sink.emit(SyncEvent::Reloaded { todos: 0 });
        assert_eq!(sink.kinds(), vec!["reloaded"]);
    }
}
