//! TodoCache port - ローカル永続化（blob store）の抽象化
//!
//! 単一の名前付き blob に JSON 直列化したリスト全体を読み書きする。
//! スキーマバージョニングは無し。増分書き込みも無し（常に丸ごと上書き）。
//!
//! Coordinator を具体的なストレージから切り離すための seam。
//! 実装は `impls::JsonFileCache`（ファイル）と `impls::MemoryCache`（テスト用）。

use async_trait::async_trait;

use crate::domain::{SyncError, TodoRecord};

/// Write-through cache for the todo list.
///
/// # 設計原則
/// - `save` は常にリスト全体の上書き。並行書き込みは last-write-wins で収束。
/// - `load` は blob が無ければ空リスト（エラーではない）。
/// - レイテンシのシミュレーションは UX 用で、正しさに影響しない。
#[async_trait]
pub trait TodoCache: Send + Sync {
    /// Load the stored list, or an empty list when nothing was saved yet.
    async fn load(&self) -> Result<Vec<TodoRecord>, SyncError>;

    /// Overwrite the stored blob wholesale.
    async fn save(&self, todos: &[TodoRecord]) -> Result<(), SyncError>;
}
