//! Append-only status history records.

use super::{StatusChangeId, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded status transition of a task.
///
/// Records are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    id: StatusChangeId,
    task_id: TaskId,
    old_status: TaskStatus,
    new_status: TaskStatus,
    timestamp: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedStatusChange {
    /// Persisted record identifier.
    pub id: StatusChangeId,
    /// Task the record describes.
    pub task_id: TaskId,
    /// Status before the transition.
    pub old_status: TaskStatus,
    /// Status after the transition.
    pub new_status: TaskStatus,
    /// Time the transition was recorded.
    pub timestamp: DateTime<Utc>,
}

impl StatusChange {
    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedStatusChange) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            old_status: data.old_status,
            new_status: data.new_status,
            timestamp: data.timestamp,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> StatusChangeId {
        self.id
    }

    /// Returns the task the record describes.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the status before the transition.
    #[must_use]
    pub const fn old_status(&self) -> TaskStatus {
        self.old_status
    }

    /// Returns the status after the transition.
    #[must_use]
    pub const fn new_status(&self) -> TaskStatus {
        self.new_status
    }

    /// Returns when the transition was recorded.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Builds the history record for a task write, if the write is a genuine
/// transition.
///
/// `stored_status` must be read from storage inside the same unit of work
/// as the write; `None` means the task is not stored yet, so creating a task
/// never produces a record.
#[must_use]
pub fn record_transition(
    task_id: TaskId,
    stored_status: Option<TaskStatus>,
    incoming_status: TaskStatus,
    timestamp: DateTime<Utc>,
) -> Option<StatusChange> {
    let old_status = stored_status?;
    if old_status == incoming_status {
        return None;
    }
    Some(StatusChange {
        id: StatusChangeId::new(),
        task_id,
        old_status,
        new_status: incoming_status,
        timestamp,
    })
}
