//! Implementations - ports の具体実装（本番用・開発/テスト用）

pub mod event_sinks;
pub mod fake_remote;
pub mod file_cache;
pub mod http_remote;
pub mod memory_cache;

pub use event_sinks::{ChannelEventSink, RecordingEventSink, TracingEventSink};
pub use fake_remote::{FakeCall, FakeRemoteApi};
pub use file_cache::JsonFileCache;
pub use http_remote::{BASE_URL_ENV, DEFAULT_BASE_URL, HttpRemoteApi};
pub use memory_cache::MemoryCache;
