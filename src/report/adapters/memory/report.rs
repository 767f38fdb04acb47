//! In-memory report repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::report::{
    domain::{Notification, ReportSchedule},
    ports::{ReportRepository, ReportRepositoryError, ReportRepositoryResult},
};
use crate::task::domain::OwnerId;

/// Thread-safe in-memory report repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportRepository {
    state: Arc<RwLock<InMemoryReportState>>,
}

#[derive(Debug, Default)]
struct InMemoryReportState {
    schedules: BTreeMap<OwnerId, ReportSchedule>,
    notifications: Vec<Notification>,
}

impl InMemoryReportRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl ToString) -> ReportRepositoryError {
    ReportRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn save_schedule(&self, schedule: &ReportSchedule) -> ReportRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.schedules.insert(schedule.owner(), schedule.clone());
        Ok(())
    }

    async fn find_schedule(&self, owner: OwnerId) -> ReportRepositoryResult<Option<ReportSchedule>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.schedules.get(&owner).cloned())
    }

    async fn list_schedules(&self) -> ReportRepositoryResult<Vec<ReportSchedule>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.schedules.values().cloned().collect())
    }

    async fn record_dispatch(
        &self,
        notification: &Notification,
        sent_at: DateTime<Utc>,
    ) -> ReportRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let owner = notification.owner();
        let schedule = state
            .schedules
            .get_mut(&owner)
            .ok_or(ReportRepositoryError::NotFound(owner))?;
        schedule.mark_sent(sent_at);
        state.notifications.push(notification.clone());
        Ok(())
    }

    async fn notifications(&self, owner: OwnerId) -> ReportRepositoryResult<Vec<Notification>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut records: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|notification| notification.owner() == owner)
            .cloned()
            .collect();
        records.sort_by_key(Notification::created_at);
        Ok(records)
    }
}
