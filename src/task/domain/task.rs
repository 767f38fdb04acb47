//! Task aggregate root and its validated title.

use super::{OwnerId, Priority, TaskDomainError, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated, upper-cased task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Minimum title length in characters.
    pub const MIN_LEN: usize = 5;
    /// Maximum title length in characters.
    pub const MAX_LEN: usize = 100;

    /// Creates a validated title, trimming and upper-casing the input.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TitleTooShort`] or
    /// [`TaskDomainError::TitleTooLong`] when the trimmed length falls
    /// outside the accepted range.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let actual = trimmed.chars().count();
        if actual < Self::MIN_LEN {
            return Err(TaskDomainError::TitleTooShort {
                min: Self::MIN_LEN,
                actual,
            });
        }
        if actual > Self::MAX_LEN {
            return Err(TaskDomainError::TitleTooLong {
                max: Self::MAX_LEN,
                actual,
            });
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: OwnerId,
    title: TaskTitle,
    description: String,
    completed: bool,
    deleted: bool,
    priority: Priority,
    status: TaskStatus,
    created_at: DateTime<Utc>,
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Owner of the new task.
    pub owner: OwnerId,
    /// Validated title.
    pub title: TaskTitle,
    /// Free-text description.
    pub description: String,
    /// Requested priority.
    pub priority: Priority,
    /// Initial status.
    pub status: TaskStatus,
    /// Whether the task starts out completed.
    pub completed: bool,
}

impl TaskDraft {
    /// Creates a draft with default description, priority, and status.
    #[must_use]
    pub fn new(owner: OwnerId, title: TaskTitle) -> Self {
        Self {
            owner,
            title,
            description: String::new(),
            priority: Priority::FIRST,
            status: TaskStatus::Pending,
            completed: false,
        }
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub owner: OwnerId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted soft-delete flag.
    pub deleted: bool,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new, not yet stored task.
    #[must_use]
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Self {
        Self {
            id: TaskId::new(),
            owner: draft.owner,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            deleted: false,
            priority: draft.priority,
            status: draft.status,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            completed: data.completed,
            deleted: data.deleted,
            priority: data.priority,
            status: data.status,
            created_at: data.created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` once the task is marked complete.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns `true` once the task is soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns `true` while the task takes part in priority ordering.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.deleted && !self.completed
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the title.
    pub fn rename(&mut self, title: TaskTitle) {
        self.title = title;
    }

    /// Replaces the description.
    pub fn describe(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Moves the task to `priority`.
    ///
    /// Sibling collisions are resolved by the repository when the task is
    /// written.
    pub const fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Sets the status. The repository records the transition on write.
    pub const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Sets the completion flag.
    pub const fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Soft-deletes the task.
    pub const fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}
