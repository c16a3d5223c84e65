//! Task list state: the in-memory owning copy of the todo list.
//!
//! Design:
//! - This is the "single source of truth" for the session. The cache and the
//!   remote store hold eventually-mirrored copies with no ownership.
//! - Pure state transitions only; no I/O, no awaits. The coordinator decides
//!   what to mirror and when.
//! - Missing ids are silent no-ops, surfaced through `Option` returns so the
//!   coordinator can skip mirroring entirely.

use chrono::{DateTime, Utc};

use crate::domain::{Filter, MAX_NAME_LEN, TodoId, TodoRecord, ValidationError};

/// Counts by completion state for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// A bulk operation over the matching subset of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    MarkAllComplete,
    MarkAllActive,
    DeleteCompleted,
    DeleteAll,
}

/// First phase of a bulk operation: what would happen, for the caller's own
/// confirmation UI. The core never blocks waiting for a confirmation; the
/// caller confirms and then invokes the unconditional [`TodoList::apply_bulk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkIntent {
    pub action: BulkAction,
    pub affected: usize,
    pub description: String,
}

/// What a bulk application actually did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkOutcome {
    /// Records whose fields changed (to be mirrored via update).
    pub changed: Vec<TodoRecord>,
    /// Ids removed from the list (to be mirrored via delete).
    pub removed: Vec<TodoId>,
}

impl BulkOutcome {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }
}

/// In-memory ordered collection of todo records.
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    todos: Vec<TodoRecord>,
}

impl TodoList {
    pub fn new() -> Self {
        Self { todos: Vec::new() }
    }

    pub fn from_records(todos: Vec<TodoRecord>) -> Self {
        Self { todos }
    }

    pub fn records(&self) -> &[TodoRecord] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoRecord> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Validate a candidate name against the current list.
    ///
    /// Returns the trimmed name. The duplicate check is case-insensitive and
    /// runs against the in-memory list only (the remote store does not
    /// enforce it).
    pub fn validate_name(&self, text: &str) -> Result<String, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_NAME_LEN {
            return Err(ValidationError::TooLong(len));
        }
        let lower = trimmed.to_lowercase();
        if self.todos.iter().any(|t| t.name.to_lowercase() == lower) {
            return Err(ValidationError::Duplicate(trimmed.to_string()));
        }
        Ok(trimmed.to_string())
    }

    /// Append a new record with `completed = false`.
    ///
    /// The id comes from the caller (server-assigned or locally generated);
    /// `created_at` is set on locally created records only.
    pub fn create(
        &mut self,
        text: &str,
        id: TodoId,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<TodoRecord, ValidationError> {
        let name = self.validate_name(text)?;
        let record = TodoRecord::new(id, name, created_at);
        self.todos.push(record.clone());
        Ok(record)
    }

    /// Flip `completed`; silent no-op when the id does not match.
    /// Returns the post-toggle snapshot when it did.
    pub fn toggle(&mut self, id: TodoId) -> Option<TodoRecord> {
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        todo.toggle();
        Some(todo.clone())
    }

    /// Set the name when the trimmed text is non-empty; an empty edit keeps
    /// the prior name (a cancelled edit, not an error). Returns the snapshot
    /// only when something actually changed.
    pub fn rename(&mut self, id: TodoId, new_text: &str) -> Option<TodoRecord> {
        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        todo.set_name(trimmed.to_string());
        Some(todo.clone())
    }

    /// Remove and return the matching record; no-op when absent.
    pub fn remove(&mut self, id: TodoId) -> Option<TodoRecord> {
        let pos = self.todos.iter().position(|t| t.id == id)?;
        Some(self.todos.remove(pos))
    }

    /// Replace the record with `id` in place, keeping its position. Used by
    /// the coordinator to adopt the server's copy after a remote create.
    pub fn replace(&mut self, id: TodoId, with: TodoRecord) -> bool {
        match self.todos.iter_mut().find(|t| t.id == id) {
            Some(slot) => {
                *slot = with;
                true
            }
            None => false,
        }
    }

    /// Swap in a freshly loaded authoritative list (reload path).
    pub fn replace_all(&mut self, todos: Vec<TodoRecord>) {
        self.todos = todos;
    }

    /// Pure projection; insertion order preserved.
    pub fn filtered(&self, filter: Filter) -> Vec<&TodoRecord> {
        self.todos.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn counts(&self) -> TodoCounts {
        let completed = self.todos.iter().filter(|t| t.completed).count();
        TodoCounts {
            total: self.todos.len(),
            active: self.todos.len() - completed,
            completed,
        }
    }

    /// What `apply_bulk` would do, with the confirmation text the caller's
    /// UI shows before committing.
    pub fn bulk_preview(&self, action: BulkAction) -> BulkIntent {
        let counts = self.counts();
        let (affected, description) = match action {
            BulkAction::MarkAllComplete => (
                counts.active,
                format!("Mark all {} active todos as complete?", counts.active),
            ),
            BulkAction::MarkAllActive => (
                counts.completed,
                format!("Mark all {} completed todos as active?", counts.completed),
            ),
            BulkAction::DeleteCompleted => (
                counts.completed,
                format!(
                    "Delete all {} completed todos? This cannot be undone.",
                    counts.completed
                ),
            ),
            BulkAction::DeleteAll => (
                counts.total,
                format!("Delete ALL {} todos? This cannot be undone.", counts.total),
            ),
        };
        BulkIntent {
            action,
            affected,
            description,
        }
    }

    /// Apply a bulk action unconditionally to the matching subset.
    /// No-op (empty outcome) when the subset is empty.
    pub fn apply_bulk(&mut self, action: BulkAction) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        match action {
            BulkAction::MarkAllComplete => {
                for todo in self.todos.iter_mut().filter(|t| !t.completed) {
                    todo.completed = true;
                    outcome.changed.push(todo.clone());
                }
            }
            BulkAction::MarkAllActive => {
                for todo in self.todos.iter_mut().filter(|t| t.completed) {
                    todo.completed = false;
                    outcome.changed.push(todo.clone());
                }
            }
            BulkAction::DeleteCompleted => {
                outcome.removed = self
                    .todos
                    .iter()
                    .filter(|t| t.completed)
                    .map(|t| t.id)
                    .collect();
                self.todos.retain(|t| !t.completed);
            }
            BulkAction::DeleteAll => {
                outcome.removed = self.todos.iter().map(|t| t.id).collect();
                self.todos.clear();
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    fn list_with(names: &[(&str, bool)]) -> TodoList {
        let mut list = TodoList::new();
        for (i, (name, completed)) in names.iter().enumerate() {
            let rec = list.create(name, TodoId::new(i as i64 + 1), None).unwrap();
            if *completed {
                list.toggle(rec.id).unwrap();
            }
        }
        list
    }

    #[test]
    fn create_appends_uncompleted_record() {
        let mut list = TodoList::new();
        let rec = list.create("  buy milk  ", TodoId::new(1), None).unwrap();

        assert_eq!(rec.name, "buy milk"); // trimmed
        assert!(!rec.completed);

        let all = list.filtered(Filter::All);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], &rec);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn create_rejects_empty_input(#[case] text: &str) {
        let mut list = TodoList::new();
        assert_eq!(list.create(text, TodoId::new(1), None), Err(ValidationError::Empty));
        assert!(list.is_empty());
    }

    #[test]
    fn create_rejects_over_100_chars() {
        let mut list = TodoList::new();
        let long = "x".repeat(101);
        assert_eq!(
            list.create(&long, TodoId::new(1), None),
            Err(ValidationError::TooLong(101))
        );
        assert!(list.is_empty());

        // 100 ちょうどは通る
        let exact = "y".repeat(100);
        assert!(list.create(&exact, TodoId::new(1), None).is_ok());
    }

    #[rstest]
    #[case("buy milk")]
    #[case("BUY MILK")]
    #[case("  Buy Milk  ")]
    fn create_rejects_case_insensitive_duplicates(#[case] dup: &str) {
        let mut list = list_with(&[("buy milk", false)]);
        let err = list.create(dup, TodoId::new(99), None).unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate(_)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let mut list = list_with(&[("a", false), ("b", true)]);
        let before = list.records().to_vec();

        for id in [TodoId::new(1), TodoId::new(2)] {
            list.toggle(id).unwrap();
            list.toggle(id).unwrap();
        }

        assert_eq!(list.records(), &before[..]);
    }

    #[test]
    fn toggle_missing_id_is_silent_noop() {
        let mut list = list_with(&[("a", false)]);
        assert_eq!(list.toggle(TodoId::new(404)), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn rename_sets_trimmed_name() {
        let mut list = list_with(&[("a", false)]);
        let rec = list.rename(TodoId::new(1), "  renamed  ").unwrap();
        assert_eq!(rec.name, "renamed");
    }

    #[test]
    fn rename_empty_is_a_cancelled_edit() {
        let mut list = list_with(&[("a", false)]);
        assert_eq!(list.rename(TodoId::new(1), "   "), None);
        assert_eq!(list.get(TodoId::new(1)).unwrap().name, "a");
    }

    #[test]
    fn remove_missing_id_leaves_list_unchanged() {
        let mut list = list_with(&[("a", false), ("b", false)]);
        assert_eq!(list.remove(TodoId::new(404)), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn counts_invariant_holds_after_every_mutation() {
        let mut list = TodoList::new();
        let check = |l: &TodoList| {
            let c = l.counts();
            assert_eq!(c.active + c.completed, c.total);
        };

        list.create("a", TodoId::new(1), None).unwrap();
        check(&list);
        list.create("b", TodoId::new(2), None).unwrap();
        check(&list);
        list.toggle(TodoId::new(1)).unwrap();
        check(&list);
        list.rename(TodoId::new(2), "b2").unwrap();
        check(&list);
        list.remove(TodoId::new(1)).unwrap();
        check(&list);
        list.apply_bulk(BulkAction::MarkAllComplete);
        check(&list);
    }

    #[test]
    fn active_and_completed_views_partition_the_ids() {
        let list = list_with(&[("a", false), ("b", true), ("c", false), ("d", true)]);

        let active: HashSet<TodoId> = list.filtered(Filter::Active).iter().map(|t| t.id).collect();
        let completed: HashSet<TodoId> =
            list.filtered(Filter::Completed).iter().map(|t| t.id).collect();
        let all: HashSet<TodoId> = list.filtered(Filter::All).iter().map(|t| t.id).collect();

        assert!(active.is_disjoint(&completed));
        let union: HashSet<TodoId> = active.union(&completed).copied().collect();
        assert_eq!(union, all);
    }

    #[test]
    fn filtered_preserves_insertion_order() {
        let list = list_with(&[("a", true), ("b", false), ("c", true)]);
        let names: Vec<&str> = list
            .filtered(Filter::Completed)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn bulk_preview_mirrors_confirmation_prompts() {
        let list = list_with(&[("a", false), ("b", true), ("c", true)]);

        let intent = list.bulk_preview(BulkAction::MarkAllComplete);
        assert_eq!(intent.affected, 1);
        assert_eq!(intent.description, "Mark all 1 active todos as complete?");

        let intent = list.bulk_preview(BulkAction::DeleteAll);
        assert_eq!(intent.affected, 3);
        assert_eq!(intent.description, "Delete ALL 3 todos? This cannot be undone.");
    }

    #[test]
    fn bulk_mark_all_complete_touches_only_active() {
        let mut list = list_with(&[("a", false), ("b", true), ("c", false)]);
        let outcome = list.apply_bulk(BulkAction::MarkAllComplete);

        assert_eq!(outcome.changed.len(), 2);
        assert!(outcome.removed.is_empty());
        assert_eq!(list.counts().completed, 3);
    }

    #[test]
    fn bulk_delete_completed_keeps_active() {
        let mut list = list_with(&[("a", false), ("b", true), ("c", true)]);
        let outcome = list.apply_bulk(BulkAction::DeleteCompleted);

        assert_eq!(outcome.removed, vec![TodoId::new(2), TodoId::new(3)]);
        assert_eq!(list.len(), 1);
        assert_eq!(list.records()[0].name, "a");
    }

    #[test]
    fn bulk_on_empty_subset_is_noop() {
        let mut list = list_with(&[("a", false)]);
        let outcome = list.apply_bulk(BulkAction::DeleteCompleted);
        assert!(outcome.is_noop());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn replace_keeps_position() {
        let mut list = list_with(&[("a", false), ("b", false)]);
        let server_copy = TodoRecord::new(TodoId::new(77), "a".to_string(), None);

        assert!(list.replace(TodoId::new(1), server_copy));
        assert_eq!(list.records()[0].id, TodoId::new(77));
        assert_eq!(list.records()[1].id, TodoId::new(2));
    }
}
