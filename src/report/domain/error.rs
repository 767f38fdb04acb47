//! Error types for report domain validation and rendering.

use thiserror::Error;

/// Errors returned while building report values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportDomainError {
    /// The recipient username is empty after trimming.
    #[error("recipient username must not be empty")]
    EmptyUsername,

    /// The recipient username exceeds the stored length.
    #[error("recipient username must be at most {max} characters, got {actual}")]
    UsernameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
        /// Length of the rejected username in characters.
        actual: usize,
    },

    /// The recipient email address is not plausible.
    #[error("invalid recipient email '{0}'")]
    InvalidEmail(String),

    /// Notification content exceeds the stored length.
    #[error("notification content must be at most {max} characters, got {actual}")]
    NotificationTooLong {
        /// Maximum accepted length in characters.
        max: usize,
        /// Length of the rejected content in characters.
        actual: usize,
    },

    /// The summary template failed to render.
    #[error("failed to render task summary: {0}")]
    Render(String),
}
