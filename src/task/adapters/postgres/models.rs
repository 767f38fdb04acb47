//! Diesel row models for task persistence.

use super::schema::{task_status_changes, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Upper-cased title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Priority within the owner's active tasks.
    pub priority: i32,
    /// Task status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Upper-cased title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Priority within the owner's active tasks.
    pub priority: i32,
    /// Task status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Mutable task columns written on update. Owner and creation time are
/// fixed at insert.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// Upper-cased title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Priority within the owner's active tasks.
    pub priority: i32,
    /// Task status.
    pub status: String,
}

/// Query result row for status history records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_status_changes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusChangeRow {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Task the record describes.
    pub task_id: uuid::Uuid,
    /// Status before the transition.
    pub old_status: String,
    /// Status after the transition.
    pub new_status: String,
    /// Time the transition was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Insert model for status history records. `sequence` is assigned by the
/// database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_status_changes)]
pub struct NewStatusChangeRow {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Task the record describes.
    pub task_id: uuid::Uuid,
    /// Status before the transition.
    pub old_status: String,
    /// Status after the transition.
    pub new_status: String,
    /// Time the transition was recorded.
    pub recorded_at: DateTime<Utc>,
}
