//! Repository port for summary schedules and notifications.

use crate::report::domain::{Notification, ReportSchedule};
use crate::task::domain::OwnerId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for report repository operations.
pub type ReportRepositoryResult<T> = Result<T, ReportRepositoryError>;

/// Persistence contract for summary delivery state.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Inserts or replaces the schedule for its owner.
    async fn save_schedule(&self, schedule: &ReportSchedule) -> ReportRepositoryResult<()>;

    /// Returns the owner's schedule, if configured.
    async fn find_schedule(&self, owner: OwnerId) -> ReportRepositoryResult<Option<ReportSchedule>>;

    /// Returns every configured schedule.
    async fn list_schedules(&self) -> ReportRepositoryResult<Vec<ReportSchedule>>;

    /// Stores `notification` and marks its owner's schedule sent at
    /// `sent_at` as one unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRepositoryError::NotFound`] when the owner has no
    /// schedule; nothing is stored in that case.
    async fn record_dispatch(
        &self,
        notification: &Notification,
        sent_at: DateTime<Utc>,
    ) -> ReportRepositoryResult<()>;

    /// Returns the owner's notifications, oldest first.
    async fn notifications(&self, owner: OwnerId) -> ReportRepositoryResult<Vec<Notification>>;
}

/// Errors returned by report repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReportRepositoryError {
    /// The owner has no schedule.
    #[error("no report schedule for owner {0}")]
    NotFound(OwnerId),

    /// Persistence failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReportRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
