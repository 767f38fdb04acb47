//! In-memory adapters for report storage and delivery.

mod mailer;
mod report;

pub use mailer::RecordingMailer;
pub use report::InMemoryReportRepository;
