//! Sync coordinator: optimistic local mutation + debounced remote mirroring.
//!
//! # 方針
//! - ローカル変異は即時・同期的に適用（optimistic update、rollback 無し）
//! - 成功したローカル変異は毎回キャッシュへ write-through
//! - create/delete は即時ミラー、toggle/rename は debounce 窓を通す
//! - debounce 経路の失敗は表面化して full reload（リモートが正、
//!   リモート不達ならキャッシュが正でオフラインへ）
//! - リモート不達は致命ではない。オフラインに降格して続行する
//!
//! ロック規約: `list` の tokio Mutex を await 跨ぎで保持しない。
//! 変異はロック内で完結させ、スナップショットを取ってからミラーする。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::app::debounce::Debouncer;
use crate::app::list::{BulkAction, BulkIntent, BulkOutcome, TodoCounts, TodoList};
use crate::domain::{Filter, SyncError, SyncEvent, TodoId, TodoRecord, ValidationError};
use crate::ports::{Clock, EventSink, IdGenerator, RemoteApi, TodoCache};

/// Who is authoritative besides the in-memory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Remote reachable; mutations are mirrored to it.
    Online,
    /// Remote unreachable; the cache is the durability backstop until the
    /// next successful `refresh()`.
    Offline,
}

impl SessionMode {
    pub fn is_online(self) -> bool {
        matches!(self, SessionMode::Online)
    }
}

struct Inner {
    list: Mutex<TodoList>,
    offline: AtomicBool,
    remote: Arc<dyn RemoteApi>,
    cache: Arc<dyn TodoCache>,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    debouncer: Debouncer,
}

impl Inner {
    fn is_online(&self) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }

    fn go_offline(&self, reason: String) {
        // 二重発火させない（既にオフラインなら黙る）
        if !self.offline.swap(true, Ordering::SeqCst) {
            warn!(reason = %reason, "remote unreachable, entering offline mode");
            self.events.emit(SyncEvent::WentOffline { reason });
        }
    }

    fn go_online(&self) {
        self.offline.store(false, Ordering::SeqCst);
    }

    /// Write-through mirror of a successful local mutation. Failures are
    /// surfaced, never propagated: the in-memory list already changed.
    async fn write_through(&self, snapshot: &[TodoRecord]) {
        if let Err(error) = self.cache.save(snapshot).await {
            warn!(error = %error, "write-through cache save failed");
            self.events.emit(SyncEvent::CacheFailed { error });
        }
    }

    fn note_remote_failure(&self, operation: &'static str, id: Option<TodoId>, error: &SyncError) {
        warn!(operation, id = ?id, error = %error, "remote mirror failed");
        self.events.emit(SyncEvent::RemoteRejected {
            operation,
            id,
            error: error.clone(),
        });
        if matches!(error, SyncError::Network(_)) {
            self.go_offline(error.to_string());
        }
    }

    /// Full reload after a failed debounced update: the remote copy is
    /// authoritative; unreachable remote degrades to the cached copy.
    /// Unsynced optimistic state is discarded either way.
    async fn reload(&self) {
        match self.remote.list(None).await {
            Ok(todos) => {
                let count = todos.len();
                let snapshot = {
                    let mut list = self.list.lock().await;
                    list.replace_all(todos);
                    list.records().to_vec()
                };
                self.go_online();
                debug!(todos = count, "reloaded authoritative list from remote");
                self.events.emit(SyncEvent::Reloaded { todos: count });
                self.write_through(&snapshot).await;
            }
            Err(error) => {
                self.go_offline(error.to_string());
                match self.cache.load().await {
                    Ok(todos) => {
                        let count = todos.len();
                        let mut list = self.list.lock().await;
                        list.replace_all(todos);
                        drop(list);
                        self.events.emit(SyncEvent::Reloaded { todos: count });
                    }
                    Err(cache_error) => {
                        // Both copies out of reach: keep the in-memory list.
                        self.events.emit(SyncEvent::CacheFailed { error: cache_error });
                    }
                }
            }
        }
    }

    /// Debounced update firing: carries the record's state at fire time,
    /// not at schedule time.
    async fn flush_update(&self, id: TodoId) {
        if !self.is_online() {
            return;
        }
        let record = {
            let list = self.list.lock().await;
            list.get(id).cloned()
        };
        // Removed while the timer was pending (bulk delete races the
        // per-key cancel); nothing left to mirror.
        let Some(record) = record else { return };

        match self.remote.update(id, &record.draft()).await {
            Ok(_) => debug!(id = %id, "debounced update mirrored"),
            Err(error) => {
                self.note_remote_failure("update", Some(id), &error);
                self.reload().await;
            }
        }
    }

    async fn mirror_bulk(&self, outcome: &BulkOutcome) -> Result<(), SyncError> {
        for record in &outcome.changed {
            self.remote.update(record.id, &record.draft()).await?;
        }
        for id in &outcome.removed {
            self.remote.delete(*id).await?;
        }
        Ok(())
    }
}

/// Applies user intents to the in-memory list, mirrors them outward, and
/// degrades to offline mode when the remote is unreachable.
pub struct SyncCoordinator {
    inner: Arc<Inner>,
}

impl SyncCoordinator {
    pub(crate) fn new(
        remote: Arc<dyn RemoteApi>,
        cache: Arc<dyn TodoCache>,
        events: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        debouncer: Debouncer,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                list: Mutex::new(TodoList::new()),
                offline: AtomicBool::new(false),
                remote,
                cache,
                events,
                clock,
                ids,
                debouncer,
            }),
        }
    }

    /// Probe the remote and load the authoritative list: from the remote
    /// when reachable, from the cache (marking the session offline) when
    /// not. Never fails; the worst case is an empty offline list.
    pub async fn initialize(&self) -> SessionMode {
        let inner = &self.inner;
        let probed = match inner.remote.probe().await {
            Ok(()) => inner.remote.list(None).await,
            Err(error) => Err(error),
        };

        match probed {
            Ok(todos) => {
                let snapshot = {
                    let mut list = inner.list.lock().await;
                    list.replace_all(todos);
                    list.records().to_vec()
                };
                inner.go_online();
                debug!(todos = snapshot.len(), "initialized from remote");
                inner.write_through(&snapshot).await;
                SessionMode::Online
            }
            Err(error) => {
                inner.go_offline(error.to_string());
                match inner.cache.load().await {
                    Ok(todos) => {
                        debug!(todos = todos.len(), "initialized from cache");
                        inner.list.lock().await.replace_all(todos);
                    }
                    Err(cache_error) => {
                        inner.events.emit(SyncEvent::CacheFailed { error: cache_error });
                    }
                }
                SessionMode::Offline
            }
        }
    }

    /// The single reconnect/reconcile entry point: same semantics as
    /// [`initialize`](Self::initialize).
    pub async fn refresh(&self) -> SessionMode {
        self.initialize().await
    }

    /// Validate and append a new todo, then mirror it.
    ///
    /// The local mutation and the cache write always happen (no rollback);
    /// when online, an immediate remote create follows. On remote success
    /// the optimistic record is replaced by the server's copy (server ids
    /// are authoritative); on failure the error is surfaced through the
    /// event sink and the optimistic record stays.
    pub async fn create(&self, text: &str) -> Result<TodoRecord, ValidationError> {
        let inner = &self.inner;
        let (record, snapshot) = {
            let mut list = inner.list.lock().await;
            let id = inner.ids.next_todo_id();
            let record = list.create(text, id, Some(inner.clock.now()))?;
            (record, list.records().to_vec())
        };
        inner.write_through(&snapshot).await;

        if !inner.is_online() {
            return Ok(record);
        }

        match inner.remote.create(&record.draft()).await {
            Ok(server_copy) => {
                let snapshot = {
                    let mut list = inner.list.lock().await;
                    list.replace(record.id, server_copy.clone());
                    list.records().to_vec()
                };
                inner.write_through(&snapshot).await;
                Ok(server_copy)
            }
            Err(error) => {
                inner.note_remote_failure("create", Some(record.id), &error);
                Ok(record)
            }
        }
    }

    /// Flip completion. Silent no-op (and no sync traffic) when the id does
    /// not match; otherwise write-through plus a debounced remote update.
    pub async fn toggle(&self, id: TodoId) -> Option<TodoRecord> {
        let (record, snapshot) = {
            let mut list = self.inner.list.lock().await;
            let record = list.toggle(id)?;
            (record, list.records().to_vec())
        };
        self.inner.write_through(&snapshot).await;
        self.schedule_update(id);
        Some(record)
    }

    /// Rename. An empty edit keeps the prior name (cancelled edit) and
    /// produces no sync traffic.
    pub async fn rename(&self, id: TodoId, new_text: &str) -> Option<TodoRecord> {
        let (record, snapshot) = {
            let mut list = self.inner.list.lock().await;
            let record = list.rename(id, new_text)?;
            (record, list.records().to_vec())
        };
        self.inner.write_through(&snapshot).await;
        self.schedule_update(id);
        Some(record)
    }

    /// Remove. The pending debounced update for the id (if any) is dropped;
    /// the remote delete is immediate. A failed delete is surfaced but the
    /// record is not restored.
    pub async fn remove(&self, id: TodoId) -> Option<TodoRecord> {
        let (record, snapshot) = {
            let mut list = self.inner.list.lock().await;
            let record = list.remove(id)?;
            (record, list.records().to_vec())
        };
        self.inner.debouncer.cancel(id);
        self.inner.write_through(&snapshot).await;

        if self.inner.is_online() {
            if let Err(error) = self.inner.remote.delete(id).await {
                self.inner.note_remote_failure("delete", Some(id), &error);
            }
        }
        Some(record)
    }

    /// First phase of a bulk operation: what would happen, for the caller's
    /// confirmation UI. The core never blocks on confirmation itself.
    pub async fn bulk_preview(&self, action: BulkAction) -> BulkIntent {
        self.inner.list.lock().await.bulk_preview(action)
    }

    /// Second phase: apply unconditionally, then mirror record by record
    /// (non-debounced). The first remote failure surfaces an error and
    /// triggers a reload, same policy as the debounced path.
    pub async fn apply_bulk(&self, action: BulkAction) -> BulkOutcome {
        let (outcome, snapshot) = {
            let mut list = self.inner.list.lock().await;
            let outcome = list.apply_bulk(action);
            (outcome, list.records().to_vec())
        };
        if outcome.is_noop() {
            return outcome;
        }
        for id in &outcome.removed {
            self.inner.debouncer.cancel(*id);
        }
        self.inner.write_through(&snapshot).await;

        if self.inner.is_online() {
            if let Err(error) = self.inner.mirror_bulk(&outcome).await {
                self.inner.note_remote_failure("bulk", None, &error);
                self.inner.reload().await;
            }
        }
        outcome
    }

    /// Pure projection of the current list; insertion order preserved.
    pub async fn filtered(&self, filter: Filter) -> Vec<TodoRecord> {
        let list = self.inner.list.lock().await;
        list.filtered(filter).into_iter().cloned().collect()
    }

    pub async fn counts(&self) -> TodoCounts {
        self.inner.list.lock().await.counts()
    }

    pub fn mode(&self) -> SessionMode {
        if self.inner.is_online() {
            SessionMode::Online
        } else {
            SessionMode::Offline
        }
    }

    /// Wait for pending debounced updates to fire (call before exit).
    pub async fn shutdown(&self) {
        self.inner.debouncer.flush().await;
    }

    fn schedule_update(&self, id: TodoId) {
        if !self.inner.is_online() {
            return;
        }
        let inner = Arc::clone(&self.inner);
        self.inner
            .debouncer
            .schedule(id, async move { inner.flush_update(id).await });
    }
}
