//! Ports for summary persistence and delivery.

mod mailer;
mod repository;

#[cfg(test)]
pub use mailer::MockSummaryMailer;
pub use mailer::{MailerError, SummaryMailer};
pub use repository::{ReportRepository, ReportRepositoryError, ReportRepositoryResult};
