//! Repository port for task persistence, priority ordering, and history.

use crate::task::domain::{
    OwnerId, Priority, PriorityShift, StatusChange, StatusTally, Task, TaskDomainError, TaskId,
    TaskQuery,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Options for writing an already stored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    reassign_priority: bool,
    changed_at: DateTime<Utc>,
}

impl UpdateOptions {
    /// Creates options stamped with the time of the change.
    ///
    /// `reassign_priority` should be `true` when the write moves the task to
    /// a different priority.
    #[must_use]
    pub const fn new(reassign_priority: bool, changed_at: DateTime<Utc>) -> Self {
        Self {
            reassign_priority,
            changed_at,
        }
    }

    /// Returns whether sibling priorities are reassigned before the write.
    #[must_use]
    pub const fn reassign_priority(&self) -> bool {
        self.reassign_priority
    }

    /// Returns the timestamp given to any recorded status transition.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }
}

/// Side effects of one create or update unit of work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistOutcome {
    priority: Priority,
    shift: Option<PriorityShift>,
    transition: Option<StatusChange>,
}

impl PersistOutcome {
    /// Creates an outcome from its parts.
    #[must_use]
    pub const fn new(
        priority: Priority,
        shift: Option<PriorityShift>,
        transition: Option<StatusChange>,
    ) -> Self {
        Self {
            priority,
            shift,
            transition,
        }
    }

    /// Returns the priority the task row was written with.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the sibling block moved to make room, if any.
    #[must_use]
    pub const fn shift(&self) -> Option<&PriorityShift> {
        self.shift.as_ref()
    }

    /// Returns the history record appended by the write, if any.
    #[must_use]
    pub const fn transition(&self) -> Option<&StatusChange> {
        self.transition.as_ref()
    }
}

/// Task persistence contract.
///
/// `create` and `update` are units of work: priority assignment, history
/// recording, and the task write either all become visible or none do, and
/// concurrent units of work for the same owner are serialised.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task at its requested priority, shifting the colliding
    /// block of the owner's active tasks up by one.
    ///
    /// Creating a task never records a status transition.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn create(&self, task: &Task) -> TaskRepositoryResult<PersistOutcome>;

    /// Persists changes to an existing task.
    ///
    /// Compares the incoming status with the status currently stored and
    /// appends a history record when they differ. When
    /// [`UpdateOptions::reassign_priority`] is set and the task is active,
    /// the colliding block of its siblings is shifted first. Otherwise the
    /// stored priority is kept, since sibling writes may have shifted it
    /// after `task` was read.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task, options: UpdateOptions)
    -> TaskRepositoryResult<PersistOutcome>;

    /// Finds a task by identifier, including deleted tasks.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists an owner's tasks matching `query`, in the query's order.
    async fn list(&self, owner: OwnerId, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns a task's history records, oldest first.
    async fn status_history(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<StatusChange>>;

    /// Counts an owner's non-deleted tasks per status, ordered by status
    /// name. Statuses with no tasks are omitted.
    async fn status_counts(&self, owner: OwnerId) -> TaskRepositoryResult<Vec<StatusTally>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Priority assignment could not find room for the task.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
