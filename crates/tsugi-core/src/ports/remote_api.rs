//! RemoteApi port - リモート HTTP API の抽象化
//!
//! 本番の `impls::HttpRemoteApi` とテスト用の `impls::FakeRemoteApi` を
//! 同じ経路で差し替えるための trait。Coordinator はこの seam しか知らない。

use async_trait::async_trait;

use crate::domain::{Filter, SyncError, TodoDraft, TodoId, TodoRecord};

/// One request per call, no retries, platform-default timeouts.
///
/// Every method fails with a single normalized [`SyncError`]:
/// transport problems map to `Network`, non-2xx responses to `Remote`.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Fetch the list, optionally narrowed by completion state.
    async fn list(&self, filter: Option<Filter>) -> Result<Vec<TodoRecord>, SyncError>;

    /// Create a record; the server assigns the id.
    async fn create(&self, draft: &TodoDraft) -> Result<TodoRecord, SyncError>;

    /// Replace the `{name, completed}` fields of an existing record.
    async fn update(&self, id: TodoId, draft: &TodoDraft) -> Result<TodoRecord, SyncError>;

    /// Delete a record. The acknowledgement body is ignored.
    async fn delete(&self, id: TodoId) -> Result<(), SyncError>;

    /// Liveness probe (`GET /`). `Ok` means reachable.
    async fn probe(&self) -> Result<(), SyncError>;
}
