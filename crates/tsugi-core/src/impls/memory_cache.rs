//! MemoryCache - in-memory の blob 二重体（開発・テスト用）
//!
//! JsonFileCache と同じ「直列化済み blob を丸ごと持つ」形にして、
//! byte レベルの冪等性テストにも使えるようにしてある。遅延は無し。

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{SyncError, TodoRecord};
use crate::ports::TodoCache;

#[derive(Default)]
pub struct MemoryCache {
    blob: Mutex<Option<Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存されている生バイト列（まだ save が無ければ None）。
    pub fn raw(&self) -> Option<Vec<u8>> {
        self.blob.lock().expect("memory cache lock poisoned").clone()
    }
}

#[async_trait]
impl TodoCache for MemoryCache {
    async fn load(&self) -> Result<Vec<TodoRecord>, SyncError> {
        let blob = self.blob.lock().expect("memory cache lock poisoned");
        match blob.as_deref() {
            None => Ok(Vec::new()),
            Some(bytes) => serde_json::from_slice(bytes).map_err(|e| SyncError::Cache(e.to_string())),
        }
    }

    async fn save(&self, todos: &[TodoRecord]) -> Result<(), SyncError> {
        let bytes = serde_json::to_vec(todos).map_err(|e| SyncError::Cache(e.to_string()))?;
        *self.blob.lock().expect("memory cache lock poisoned") = Some(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoId;

    #[tokio::test]
    async fn empty_cache_loads_as_empty_list() {
        let cache = MemoryCache::new();
        assert_eq!(cache.load().await.unwrap(), Vec::new());
        assert_eq!(cache.raw(), None);
    }

    #[tokio::test]
    async fn save_of_loaded_list_is_byte_idempotent() {
        let cache = MemoryCache::new();
        let todos = vec![TodoRecord::new(TodoId::new(1), "milk".to_string(), None)];

        cache.save(&todos).await.unwrap();
        let first = cache.raw().unwrap();

        let loaded = cache.load().await.unwrap();
        cache.save(&loaded).await.unwrap();

        assert_eq!(cache.raw().unwrap(), first);
    }
}
