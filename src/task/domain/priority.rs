//! Priority values and the collision-shift planner.
//!
//! Among one owner's active tasks every priority is unique. Placing a task
//! at an occupied priority moves the contiguous occupied block that starts
//! at that priority up by one; tasks at or above the first free slot stay
//! where they are. Shifting is upward only: lowering a task's priority never
//! compacts the slots it leaves behind.

use super::{OwnerId, TaskDomainError, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Positive task priority. Lower values take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Priority(u32);

impl Priority {
    /// The highest-precedence priority.
    pub const FIRST: Self = Self(1);

    /// Creates a validated priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPriority`] when the value is zero.
    pub const fn new(value: u32) -> Result<Self, TaskDomainError> {
        if value == 0 {
            return Err(TaskDomainError::InvalidPriority(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the priority one slot lower in precedence.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PriorityOverflow`] at `u32::MAX`.
    pub const fn next(self) -> Result<Self, TaskDomainError> {
        match self.0.checked_add(1) {
            Some(value) => Ok(Self(value)),
            None => Err(TaskDomainError::PriorityOverflow(self)),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u32> for Priority {
    type Error = TaskDomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u32 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One request to place a task at a priority within its owner's ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityAssignment {
    owner: OwnerId,
    target: Priority,
    excluding: Option<TaskId>,
}

impl PriorityAssignment {
    /// Placement of a task that is not stored yet.
    #[must_use]
    pub const fn for_new_task(owner: OwnerId, target: Priority) -> Self {
        Self {
            owner,
            target,
            excluding: None,
        }
    }

    /// Placement of a stored task; the task itself never counts as a
    /// collision.
    #[must_use]
    pub const fn for_existing_task(owner: OwnerId, target: Priority, task_id: TaskId) -> Self {
        Self {
            owner,
            target,
            excluding: Some(task_id),
        }
    }

    /// Returns the owner whose ordering is affected.
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Returns the requested priority.
    #[must_use]
    pub const fn target(&self) -> Priority {
        self.target
    }

    /// Returns the task ignored while scanning for collisions, if any.
    #[must_use]
    pub const fn excluding(&self) -> Option<TaskId> {
        self.excluding
    }
}

/// Contiguous block of occupied priorities to move up by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityShift {
    start: Priority,
    end: Priority,
    gap: Priority,
}

impl PriorityShift {
    /// First priority in the block; always the requested target.
    #[must_use]
    pub const fn start(&self) -> Priority {
        self.start
    }

    /// Last occupied priority in the block (inclusive).
    #[must_use]
    pub const fn end(&self) -> Priority {
        self.end
    }

    /// First free priority above the block.
    #[must_use]
    pub const fn gap(&self) -> Priority {
        self.gap
    }

    /// Number of tasks moved by the shift.
    #[must_use]
    pub const fn moved_count(&self) -> u32 {
        self.end.0 - self.start.0 + 1
    }

    /// Returns `true` when `priority` lies inside the block.
    #[must_use]
    pub const fn contains(&self, priority: Priority) -> bool {
        self.start.0 <= priority.0 && priority.0 <= self.end.0
    }
}

/// Plans the shift needed to free `target`.
///
/// `occupied` holds the priorities of the owner's other active tasks.
/// Returns `Ok(None)` when `target` is free. Otherwise walks the run of
/// consecutive occupied values starting at `target`; the walk visits each
/// occupied value at most once.
///
/// # Errors
///
/// Returns [`TaskDomainError::PriorityOverflow`] when the block reaches
/// `u32::MAX` and no gap exists above it.
pub fn plan_priority_shift(
    occupied: &BTreeSet<Priority>,
    target: Priority,
) -> Result<Option<PriorityShift>, TaskDomainError> {
    if !occupied.contains(&target) {
        return Ok(None);
    }

    let mut end = target;
    for held in occupied.range(target..).skip(1) {
        if held.0 - end.0 != 1 {
            break;
        }
        end = *held;
    }

    let gap = end.next()?;
    Ok(Some(PriorityShift {
        start: target,
        end,
        gap,
    }))
}
