//! `PostgreSQL` repository implementation for report storage.

use super::{
    models::{NotificationRow, ScheduleChangeset, ScheduleRow},
    schema::{notifications, report_schedules},
};
use crate::report::{
    domain::{Notification, NotificationId, Recipient, ReportSchedule},
    ports::{ReportRepository, ReportRepositoryError, ReportRepositoryResult},
};
use crate::task::domain::OwnerId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;

/// `PostgreSQL` connection pool type used by report adapters.
pub type ReportPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed report repository.
#[derive(Debug, Clone)]
pub struct PostgresReportRepository {
    pool: ReportPgPool,
}

impl PostgresReportRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReportPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReportRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReportRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReportRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReportRepositoryError::persistence)?
    }
}

impl From<DieselError> for ReportRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn save_schedule(&self, schedule: &ReportSchedule) -> ReportRepositoryResult<()> {
        let row = to_schedule_row(schedule);
        let changeset = ScheduleChangeset {
            username: row.username.clone(),
            email: row.email.clone(),
            send_after: row.send_after,
            last_sent_at: row.last_sent_at,
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(report_schedules::table)
                .values(&row)
                .on_conflict(report_schedules::owner_id)
                .do_update()
                .set(&changeset)
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn find_schedule(&self, owner: OwnerId) -> ReportRepositoryResult<Option<ReportSchedule>> {
        self.run_blocking(move |connection| {
            let row = report_schedules::table
                .filter(report_schedules::owner_id.eq(owner.into_inner()))
                .select(ScheduleRow::as_select())
                .first::<ScheduleRow>(connection)
                .optional()?;
            row.map(row_to_schedule).transpose()
        })
        .await
    }

    async fn list_schedules(&self) -> ReportRepositoryResult<Vec<ReportSchedule>> {
        self.run_blocking(move |connection| {
            let rows = report_schedules::table
                .order(report_schedules::owner_id.asc())
                .select(ScheduleRow::as_select())
                .load::<ScheduleRow>(connection)?;
            rows.into_iter().map(row_to_schedule).collect()
        })
        .await
    }

    async fn record_dispatch(
        &self,
        notification: &Notification,
        sent_at: DateTime<Utc>,
    ) -> ReportRepositoryResult<()> {
        let owner = notification.owner();
        let row = to_notification_row(notification);
        self.run_blocking(move |connection| {
            connection.transaction::<_, ReportRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    report_schedules::table
                        .filter(report_schedules::owner_id.eq(owner.into_inner())),
                )
                .set(report_schedules::last_sent_at.eq(Some(sent_at)))
                .execute(tx)?;
                if updated == 0 {
                    return Err(ReportRepositoryError::NotFound(owner));
                }

                diesel::insert_into(notifications::table)
                    .values(&row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn notifications(&self, owner: OwnerId) -> ReportRepositoryResult<Vec<Notification>> {
        self.run_blocking(move |connection| {
            let rows = notifications::table
                .filter(notifications::owner_id.eq(owner.into_inner()))
                .order((notifications::created_at.asc(), notifications::id.asc()))
                .select(NotificationRow::as_select())
                .load::<NotificationRow>(connection)?;
            Ok(rows.into_iter().map(row_to_notification).collect())
        })
        .await
    }
}

fn to_schedule_row(schedule: &ReportSchedule) -> ScheduleRow {
    ScheduleRow {
        owner_id: schedule.owner().into_inner(),
        username: schedule.recipient().username().to_owned(),
        email: schedule.recipient().email().to_owned(),
        send_after: schedule.send_after(),
        last_sent_at: schedule.last_sent_at(),
    }
}

fn row_to_schedule(row: ScheduleRow) -> ReportRepositoryResult<ReportSchedule> {
    let recipient =
        Recipient::new(row.username, row.email).map_err(ReportRepositoryError::persistence)?;
    Ok(ReportSchedule::from_persisted(
        OwnerId::from_uuid(row.owner_id),
        recipient,
        row.send_after,
        row.last_sent_at,
    ))
}

fn to_notification_row(notification: &Notification) -> NotificationRow {
    NotificationRow {
        id: notification.id().into_inner(),
        owner_id: notification.owner().into_inner(),
        content: notification.content().to_owned(),
        created_at: notification.created_at(),
    }
}

fn row_to_notification(row: NotificationRow) -> Notification {
    Notification::from_persisted(
        NotificationId::from_uuid(row.id),
        OwnerId::from_uuid(row.owner_id),
        row.content,
        row.created_at,
    )
}
