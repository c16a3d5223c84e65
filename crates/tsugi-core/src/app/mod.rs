//! Application logic: list state, debounce, coordinator, wiring.

pub mod builder;
pub mod coordinator;
pub mod debounce;
pub mod list;

pub use builder::{AppBuilder, BuildError};
pub use coordinator::{SessionMode, SyncCoordinator};
pub use debounce::{DEFAULT_DEBOUNCE_WINDOW, Debouncer};
pub use list::{BulkAction, BulkIntent, BulkOutcome, TodoCounts, TodoList};
