//! Daily task summary dispatch.

use crate::config::ReportsConfig;
use crate::report::{
    domain::{
        DEFAULT_SEND_AFTER, Notification, Recipient, ReportDomainError, ReportSchedule,
        SUMMARY_SUBJECT, SummaryEmail, TaskSummary,
    },
    ports::{ReportRepository, ReportRepositoryError, SummaryMailer},
};
use crate::task::{
    domain::{OwnerId, StatusTally},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, NaiveTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Service-level errors for summary operations.
#[derive(Debug, Error)]
pub enum ReportServiceError {
    /// Report values failed validation or rendering.
    #[error(transparent)]
    Domain(#[from] ReportDomainError),

    /// Report persistence failed.
    #[error(transparent)]
    Repository(#[from] ReportRepositoryError),

    /// Task counts could not be read.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Result type for report service operations.
pub type ReportServiceResult<T> = Result<T, ReportServiceError>;

/// Sends each configured owner a daily summary of their task counts.
#[derive(Clone)]
pub struct ReportService<R, T, M>
where
    R: ReportRepository,
    T: TaskRepository,
    M: SummaryMailer,
{
    reports: Arc<R>,
    tasks: Arc<T>,
    mailer: Arc<M>,
    sender: String,
    default_send_after: NaiveTime,
}

impl<R, T, M> ReportService<R, T, M>
where
    R: ReportRepository,
    T: TaskRepository,
    M: SummaryMailer,
{
    /// Creates a service sending from `sender`. Schedules configured
    /// without a time of day use [`DEFAULT_SEND_AFTER`].
    #[must_use]
    pub fn new(reports: Arc<R>, tasks: Arc<T>, mailer: Arc<M>, sender: impl Into<String>) -> Self {
        Self {
            reports,
            tasks,
            mailer,
            sender: sender.into(),
            default_send_after: DEFAULT_SEND_AFTER,
        }
    }

    /// Creates a service using the sender address and default time of day
    /// from `config`.
    #[must_use]
    pub fn from_config(
        reports: Arc<R>,
        tasks: Arc<T>,
        mailer: Arc<M>,
        config: &ReportsConfig,
    ) -> Self {
        Self {
            reports,
            tasks,
            mailer,
            sender: config.sender.clone(),
            default_send_after: config.default_send_after,
        }
    }

    /// Creates or replaces the owner's schedule. An existing schedule keeps
    /// its last delivery time. Without `send_after` the service default
    /// time of day applies.
    ///
    /// # Errors
    ///
    /// Returns [`ReportServiceError::Repository`] when persistence fails.
    pub async fn configure(
        &self,
        owner: OwnerId,
        recipient: Recipient,
        send_after: Option<NaiveTime>,
    ) -> ReportServiceResult<ReportSchedule> {
        let time_of_day = send_after.unwrap_or(self.default_send_after);
        let mut schedule = self
            .reports
            .find_schedule(owner)
            .await?
            .unwrap_or_else(|| ReportSchedule::new(owner, recipient.clone(), time_of_day));
        schedule.reconfigure(recipient, time_of_day);
        self.reports.save_schedule(&schedule).await?;
        info!(owner = %owner, send_after = %time_of_day, "configured task summary");
        Ok(schedule)
    }

    /// Sends a summary to every owner whose schedule is due at `now`.
    ///
    /// The email and its notification are built before anything is sent.
    /// An owner whose summary cannot be built, or whose delivery fails, is
    /// logged and skipped, leaving that schedule due for the next run;
    /// other owners are still processed. Returns the addresses that were
    /// mailed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportServiceError`] when schedules or task counts cannot
    /// be read, or a delivery cannot be recorded.
    pub async fn dispatch_due(&self, now: DateTime<Utc>) -> ReportServiceResult<Vec<String>> {
        let schedules = self.reports.list_schedules().await?;
        let mut mailed = Vec::new();

        for schedule in schedules.iter().filter(|schedule| schedule.is_due(now)) {
            let owner = schedule.owner();
            let tallies = self.tasks.status_counts(owner).await?;
            let (email, notification) = match self.compose(schedule, tallies, now) {
                Ok(composed) => composed,
                Err(err) => {
                    warn!(owner = %owner, error = %err, "task summary could not be built");
                    continue;
                }
            };

            if let Err(err) = self.mailer.send(&email).await {
                warn!(
                    owner = %owner,
                    to = %email.to,
                    error = %err,
                    "task summary delivery failed"
                );
                continue;
            }

            self.reports.record_dispatch(&notification, now).await?;
            debug!(
                owner = %owner,
                notification_id = %notification.id().into_inner(),
                "stored summary notification"
            );
            info!(owner = %owner, to = %email.to, "sent task summary");
            mailed.push(email.to);
        }

        Ok(mailed)
    }

    fn compose(
        &self,
        schedule: &ReportSchedule,
        tallies: Vec<StatusTally>,
        now: DateTime<Utc>,
    ) -> Result<(SummaryEmail, Notification), ReportDomainError> {
        let body = TaskSummary::new(schedule.recipient().username(), tallies).render()?;
        let notification = Notification::new(schedule.owner(), body.clone(), now)?;
        let email = SummaryEmail {
            from: self.sender.clone(),
            to: schedule.recipient().email().to_owned(),
            subject: SUMMARY_SUBJECT.to_owned(),
            body,
        };
        Ok((email, notification))
    }
}
