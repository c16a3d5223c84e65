//! tsugi-core
//!
//! Todo リストの状態・同期モデル。表示層（レンダリング・ルーティング）は
//! このクレートの外にあり、ここは「正本となる in-memory リスト」と
//! その外側への鏡映だけを扱う。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, todo, filter, errors, events）
//! - **ports**: 抽象化レイヤー（RemoteApi, TodoCache, Clock, IdGenerator, EventSink）
//! - **app**: アプリケーションロジック（TodoList, Debouncer, SyncCoordinator, AppBuilder）
//! - **impls**: 実装（HttpRemoteApi, JsonFileCache, FakeRemoteApi などテスト/開発用含む）
//!
//! # 同期の基本方針
//! ローカル変異は即時（optimistic）、リモートへの鏡映は create/delete が即時、
//! toggle/rename は debounce 窓経由。リモート不達はオフラインモードへの降格で
//! あって、決して致命ではない。

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{
    AppBuilder, BuildError, BulkAction, BulkIntent, BulkOutcome, SessionMode, SyncCoordinator,
    TodoCounts, TodoList,
};
pub use domain::{Filter, SyncError, SyncEvent, TodoDraft, TodoId, TodoRecord, ValidationError};
