//! Diesel row models for report persistence.

use super::schema::{notifications, report_schedules};
use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;

/// Row shape for schedule records, used for reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = report_schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScheduleRow {
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Username greeted in summaries.
    pub username: String,
    /// Delivery address.
    pub email: String,
    /// UTC time of day after which sending is allowed.
    pub send_after: NaiveTime,
    /// Time of the last delivery.
    pub last_sent_at: Option<DateTime<Utc>>,
}

/// Columns replaced when a schedule is reconfigured.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = report_schedules)]
#[diesel(treat_none_as_null = true)]
pub struct ScheduleChangeset {
    /// Username greeted in summaries.
    pub username: String,
    /// Delivery address.
    pub email: String,
    /// UTC time of day after which sending is allowed.
    pub send_after: NaiveTime,
    /// Time of the last delivery.
    pub last_sent_at: Option<DateTime<Utc>>,
}

/// Row shape for notification records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Rendered summary body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
