//! Outbound mail port.

use crate::report::domain::SummaryEmail;
use async_trait::async_trait;
use thiserror::Error;

/// Delivery failure reported by a mailer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("mail delivery failed: {0}")]
pub struct MailerError(pub String);

/// Sends summary emails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummaryMailer: Send + Sync {
    /// Delivers one email.
    async fn send(&self, email: &SummaryEmail) -> Result<(), MailerError>;
}
