//! JsonFileCache - 単一の名前付き blob にリスト全体を JSON で保存
//!
//! 元アプリの localStorage キー 1 個ぶんに相当する。スキーマバージョニング
//! 無し、増分書き込み無し（save は常に丸ごと上書き）。
//!
//! load/save とも体感用の遅延をシミュレートする（正しさには影響しない）。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::time::Duration;

use crate::domain::{SyncError, TodoRecord};
use crate::ports::TodoCache;

/// 既定の blob ファイル名。
pub const DEFAULT_BLOB_NAME: &str = "todo-app-data.json";

const LOAD_DELAY: Duration = Duration::from_millis(500);
const SAVE_DELAY: Duration = Duration::from_millis(200);

pub struct JsonFileCache {
    path: PathBuf,
    load_delay: Duration,
    save_delay: Duration,
}

impl JsonFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            load_delay: LOAD_DELAY,
            save_delay: SAVE_DELAY,
        }
    }

    /// OS の一時ディレクトリ直下の既定 blob。
    pub fn at_default_path() -> Self {
        Self::new(std::env::temp_dir().join(DEFAULT_BLOB_NAME))
    }

    /// テスト用: 遅延シミュレーションを外す。
    pub fn without_latency(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            load_delay: Duration::ZERO,
            save_delay: Duration::ZERO,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TodoCache for JsonFileCache {
    async fn load(&self) -> Result<Vec<TodoRecord>, SyncError> {
        tokio::time::sleep(self.load_delay).await;
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            // blob が無いのはエラーではなく「まだ何も保存していない」
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SyncError::Cache(e.to_string())),
        };
        serde_json::from_slice(&bytes).map_err(|e| SyncError::Cache(e.to_string()))
    }

    async fn save(&self, todos: &[TodoRecord]) -> Result<(), SyncError> {
        tokio::time::sleep(self.save_delay).await;
        let bytes = serde_json::to_vec(todos).map_err(|e| SyncError::Cache(e.to_string()))?;
        std::fs::write(&self.path, bytes).map_err(|e| SyncError::Cache(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoId;

    fn sample() -> Vec<TodoRecord> {
        let mut done = TodoRecord::new(TodoId::new(2), "bread".to_string(), None);
        done.completed = true;
        vec![
            TodoRecord::new(TodoId::new(1), "milk".to_string(), None),
            done,
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn missing_blob_loads_as_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::new(dir.path().join(DEFAULT_BLOB_NAME));

        assert_eq!(cache.load().await.unwrap(), Vec::new());
    }

    #[tokio::test(start_paused = true)]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::without_latency(dir.path().join(DEFAULT_BLOB_NAME));

        let todos = sample();
        cache.save(&todos).await.unwrap();
        assert_eq!(cache.load().await.unwrap(), todos);
    }

    #[tokio::test(start_paused = true)]
    async fn save_of_loaded_list_is_byte_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::without_latency(dir.path().join(DEFAULT_BLOB_NAME));

        cache.save(&sample()).await.unwrap();
        let first = std::fs::read(cache.path()).unwrap();

        let loaded = cache.load().await.unwrap();
        cache.save(&loaded).await.unwrap();
        let second = std::fs::read(cache.path()).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn save_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::without_latency(dir.path().join(DEFAULT_BLOB_NAME));

        cache.save(&sample()).await.unwrap();
        cache.save(&[]).await.unwrap();

        assert_eq!(cache.load().await.unwrap(), Vec::new());
    }
}
