//! Events - 同期境界で表面化するイベント
//!
//! Coordinator はリモート/キャッシュの失敗で処理を止めない。代わりに
//! `SyncEvent` を `ports::EventSink` へ流し、表示層が transient メッセージ
//! として消費する（自動消去などの見せ方は表示層の責務）。

use super::{SyncError, TodoId};

/// Something the presentation layer may want to tell the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A remote mirror call failed; the optimistic local state was kept.
    RemoteRejected {
        operation: &'static str,
        id: Option<TodoId>,
        error: SyncError,
    },

    /// The remote became unreachable; the cache is now authoritative.
    WentOffline { reason: String },

    /// Authoritative state was reloaded after a failed debounced update.
    Reloaded { todos: usize },

    /// The write-through cache failed. In-memory state is unaffected.
    CacheFailed { error: SyncError },
}

impl SyncEvent {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncEvent::RemoteRejected { .. } => "remote_rejected",
            SyncEvent::WentOffline { .. } => "went_offline",
            SyncEvent::Reloaded { .. } => "reloaded",
            SyncEvent::CacheFailed { .. } => "cache_failed",
        }
    }
}
