//! Domain model for per-owner task ordering and status history.
//!
//! The domain holds the two pieces of load-bearing logic as pure functions:
//! [`plan_priority_shift`] decides which sibling priorities move when a task
//! is placed, and [`record_transition`] decides whether a write produces a
//! history record. Adapters run both inside one atomic unit of work.

mod error;
mod history;
mod ids;
mod priority;
mod query;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use history::{PersistedStatusChange, StatusChange, record_transition};
pub use ids::{OwnerId, StatusChangeId, TaskId};
pub use priority::{Priority, PriorityAssignment, PriorityShift, plan_priority_shift};
pub use query::{StatusTally, TaskCounts, TaskQuery, TaskScope};
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskDraft, TaskTitle};
