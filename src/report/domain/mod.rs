//! Domain model for scheduled task summaries.

mod error;
mod notification;
mod schedule;
mod summary;

pub use error::ReportDomainError;
pub use notification::{Notification, NotificationId};
pub use schedule::{DEFAULT_SEND_AFTER, Recipient, ReportSchedule};
pub use summary::{SUMMARY_SUBJECT, SummaryEmail, TaskSummary};
