//! Domain model (IDs, records, filters, errors, events).

pub mod errors;
pub mod events;
pub mod filter;
pub mod ids;
pub mod todo;

pub use errors::{MAX_NAME_LEN, SyncError, ValidationError};
pub use events::SyncEvent;
pub use filter::Filter;
pub use ids::TodoId;
pub use todo::{TodoDraft, TodoRecord};
