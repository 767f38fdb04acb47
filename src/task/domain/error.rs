//! Error types for task domain validation and parsing.

use super::Priority;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The title is shorter than the minimum length after trimming.
    #[error("task title must be at least {min} characters, got {actual}")]
    TitleTooShort {
        /// Minimum accepted length in characters.
        min: usize,
        /// Length of the rejected title in characters.
        actual: usize,
    },

    /// The title is longer than the maximum length after trimming.
    #[error("task title must be at most {max} characters, got {actual}")]
    TitleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
        /// Length of the rejected title in characters.
        actual: usize,
    },

    /// The priority is not a positive integer.
    #[error("invalid priority {0}, expected a positive integer")]
    InvalidPriority(u32),

    /// Shifting a priority block would move a task past the largest
    /// representable priority.
    #[error("priority {0} cannot be shifted any further")]
    PriorityOverflow(Priority),
}

/// Error returned while parsing task statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
