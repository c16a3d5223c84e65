//! List filter: pure projection over the todo list.

use serde::{Deserialize, Serialize};

use super::TodoRecord;

/// View filter for the todo list.
///
/// - `Active` = not completed
/// - `Completed` = completed
/// - `All` = identity
///
/// Order is never affected; filtering preserves insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Does this record belong to the filtered view?
    pub fn matches(self, todo: &TodoRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    /// Value for the remote `?completed=` query parameter. `All` sends none.
    pub fn as_query(self) -> Option<bool> {
        match self {
            Filter::All => None,
            Filter::Active => Some(false),
            Filter::Completed => Some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoId;

    fn todo(id: i64, completed: bool) -> TodoRecord {
        let mut t = TodoRecord::new(TodoId::new(id), format!("todo {id}"), None);
        t.completed = completed;
        t
    }

    #[test]
    fn active_and_completed_partition() {
        let open = todo(1, false);
        let done = todo(2, true);

        assert!(Filter::Active.matches(&open));
        assert!(!Filter::Active.matches(&done));
        assert!(Filter::Completed.matches(&done));
        assert!(!Filter::Completed.matches(&open));
        assert!(Filter::All.matches(&open));
        assert!(Filter::All.matches(&done));
    }

    #[test]
    fn query_param_form() {
        assert_eq!(Filter::All.as_query(), None);
        assert_eq!(Filter::Active.as_query(), Some(false));
        assert_eq!(Filter::Completed.as_query(), Some(true));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Filter::Active).unwrap(), "\"active\"");
        let f: Filter = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(f, Filter::Completed);
    }
}
