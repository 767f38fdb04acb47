//! Listing filters and aggregate counts over an owner's tasks.

use super::{Task, TaskStatus};
use std::cmp::Ordering;

/// Which of an owner's tasks a listing covers. Deleted tasks are never
/// listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskScope {
    /// Active tasks, ordered by priority.
    #[default]
    Active,
    /// Completed tasks, ordered by priority.
    Completed,
    /// Active and completed tasks; active first, each group by priority.
    All,
}

/// Filter applied when listing an owner's tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    scope: TaskScope,
    title_contains: Option<String>,
    status: Option<TaskStatus>,
}

impl TaskQuery {
    /// Creates a query over the given scope with no further filters.
    #[must_use]
    pub const fn new(scope: TaskScope) -> Self {
        Self {
            scope,
            title_contains: None,
            status: None,
        }
    }

    /// Restricts results to titles containing `term`, ignoring case.
    #[must_use]
    pub fn with_title_containing(mut self, term: impl Into<String>) -> Self {
        let raw: String = term.into();
        let trimmed = raw.trim();
        self.title_contains = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    /// Restricts results to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the scope.
    #[must_use]
    pub const fn scope(&self) -> TaskScope {
        self.scope
    }

    /// Returns the lower-cased title search term, if any.
    #[must_use]
    pub fn title_contains(&self) -> Option<&str> {
        self.title_contains.as_deref()
    }

    /// Returns the status filter, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns `true` when `task` belongs in the result set.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if task.is_deleted() {
            return false;
        }
        let in_scope = match self.scope {
            TaskScope::Active => !task.is_completed(),
            TaskScope::Completed => task.is_completed(),
            TaskScope::All => true,
        };
        let title_matches = self.title_contains.as_deref().is_none_or(|term| {
            task.title().as_str().to_lowercase().contains(term)
        });
        let status_matches = self.status.is_none_or(|status| task.status() == status);
        in_scope && title_matches && status_matches
    }

    /// Listing order for this query's scope.
    #[must_use]
    pub fn compare(&self, left: &Task, right: &Task) -> Ordering {
        let by_priority = left
            .priority()
            .cmp(&right.priority())
            .then_with(|| left.created_at().cmp(&right.created_at()))
            .then_with(|| left.id().cmp(&right.id()));
        match self.scope {
            TaskScope::All => left
                .is_completed()
                .cmp(&right.is_completed())
                .then(by_priority),
            TaskScope::Active | TaskScope::Completed => by_priority,
        }
    }
}

/// Number of an owner's non-deleted tasks in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTally {
    /// Status being counted.
    pub status: TaskStatus,
    /// Number of tasks in the status.
    pub total: u64,
}

/// Headline counts over an owner's non-deleted tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    /// All non-deleted tasks.
    pub all: u64,
    /// Completed tasks.
    pub completed: u64,
    /// Active tasks.
    pub active: u64,
}
