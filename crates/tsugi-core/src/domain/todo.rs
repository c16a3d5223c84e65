//! Todo record: the sole entity, plus its wire-body draft.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TodoId;

/// A single todo item.
///
/// Design:
/// - The in-memory list (`app::TodoList`) is the owning copy; the cache and
///   the remote store hold eventually-mirrored copies.
/// - All state transitions happen through the small mutators here.
/// - `created_at` exists only on locally created records (the remote store
///   does not track it), so it is optional and dropped from the wire body
///   when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: TodoId,
    pub name: String,
    #[serde(default)]
    pub completed: bool,

    /// Creation timestamp, local-fallback records only. Set once.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TodoRecord {
    pub fn new(id: TodoId, name: String, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            name,
            completed: false,
            created_at,
        }
    }

    /// Flip the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Replace the name (caller has already validated/trimmed).
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// The `{name, completed}` body sent on create/update.
    pub fn draft(&self) -> TodoDraft {
        TodoDraft {
            name: self.name.clone(),
            completed: self.completed,
        }
    }
}

/// Create/update wire body. The remote store assigns `id` itself, so the
/// draft never carries one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoDraft {
    pub name: String,
    pub completed: bool,
}

impl TodoDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completed: false,
        }
    }
}
