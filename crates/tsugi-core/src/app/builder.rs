//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - remote と cache は必須。build() 時に不足をチェックして
//!   BuildError を返す（起動してから気付くより明確なエラーで早く落とす）
//! - clock / id_generator / events / debounce 窓には本番向けの既定値がある

use std::sync::Arc;

use tokio::time::Duration;

use crate::app::coordinator::SyncCoordinator;
use crate::app::debounce::{DEFAULT_DEBOUNCE_WINDOW, Debouncer};
use crate::ports::{
    Clock, EventSink, IdGenerator, MillisIdGenerator, NoopEventSink, RemoteApi, SystemClock,
    TodoCache,
};

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing port: {0}. The coordinator cannot be wired without it.")]
    MissingPort(&'static str),
}

/// Wires the coordinator against its ports.
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .remote(Arc::new(HttpRemoteApi::from_env()))
///     .cache(Arc::new(JsonFileCache::at_default_path()))
///     .build()?;
/// ```
pub struct AppBuilder {
    remote: Option<Arc<dyn RemoteApi>>,
    cache: Option<Arc<dyn TodoCache>>,
    events: Option<Arc<dyn EventSink>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    debounce_window: Duration,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            remote: None,
            cache: None,
            events: None,
            clock: None,
            ids: None,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }

    pub fn remote<R: RemoteApi + 'static>(mut self, remote: Arc<R>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn cache<C: TodoCache + 'static>(mut self, cache: Arc<C>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn events<E: EventSink + 'static>(mut self, events: Arc<E>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn id_generator<G: IdGenerator + 'static>(mut self, ids: G) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    /// Debounce window for toggle/rename mirroring (default 500 ms).
    pub fn debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    /// # 検証
    /// - remote / cache の配線漏れは MissingPort で即失敗
    pub fn build(self) -> Result<SyncCoordinator, BuildError> {
        let remote = self.remote.ok_or(BuildError::MissingPort("remote"))?;
        let cache = self.cache.ok_or(BuildError::MissingPort("cache"))?;
        let events = self.events.unwrap_or_else(|| Arc::new(NoopEventSink));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(MillisIdGenerator::new(SystemClock)));

        Ok(SyncCoordinator::new(
            remote,
            cache,
            events,
            clock,
            ids,
            Debouncer::new(self.debounce_window),
        ))
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{FakeRemoteApi, MemoryCache};

    #[test]
    fn build_succeeds_with_required_ports() {
        let app = AppBuilder::new()
            .remote(Arc::new(FakeRemoteApi::new()))
            .cache(Arc::new(MemoryCache::new()))
            .build();
        assert!(app.is_ok());
    }

    #[test]
    fn build_fails_without_remote() {
        let app = AppBuilder::new().cache(Arc::new(MemoryCache::new())).build();
        assert!(matches!(app, Err(BuildError::MissingPort("remote"))));
    }

    #[test]
    fn build_fails_without_cache() {
        let app = AppBuilder::new()
            .remote(Arc::new(FakeRemoteApi::new()))
            .build();
        assert!(matches!(app, Err(BuildError::MissingPort("cache"))));
    }
}
