//! `PostgreSQL` report repository tests.

use chrono::{NaiveTime, TimeZone, Utc};
use taskdeck::report::{
    adapters::postgres::PostgresReportRepository,
    domain::{DEFAULT_SEND_AFTER, Notification, Recipient, ReportSchedule},
    ports::{ReportRepository, ReportRepositoryError},
};
use taskdeck::task::domain::OwnerId;

use super::helpers::TestDatabase;

fn new_owner() -> OwnerId {
    OwnerId::from_uuid(uuid::Uuid::new_v4())
}

#[tokio::test(flavor = "multi_thread")]
async fn schedule_upsert_replaces_existing_row() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::from_env()? else {
        return Ok(());
    };
    let repo = PostgresReportRepository::new(db.pool());
    let owner = new_owner();
    let original = ReportSchedule::new(
        owner,
        Recipient::new("erin", "erin@example.com")?,
        DEFAULT_SEND_AFTER,
    );
    repo.save_schedule(&original).await?;

    let morning = NaiveTime::from_hms_opt(6, 45, 0).ok_or_else(|| eyre::eyre!("bad time"))?;
    let replacement =
        ReportSchedule::new(owner, Recipient::new("erin", "erin@work.example")?, morning);
    repo.save_schedule(&replacement).await?;

    assert_eq!(repo.find_schedule(owner).await?, Some(replacement));
    assert_eq!(repo.list_schedules().await?.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn record_dispatch_marks_schedule_and_stores_notification() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::from_env()? else {
        return Ok(());
    };
    let repo = PostgresReportRepository::new(db.pool());
    let owner = new_owner();
    repo.save_schedule(&ReportSchedule::new(
        owner,
        Recipient::new("frank", "frank@example.com")?,
        DEFAULT_SEND_AFTER,
    ))
    .await?;
    let sent_at = Utc
        .with_ymd_and_hms(2024, 6, 1, 22, 5, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("ambiguous timestamp"))?;
    let notification = Notification::new(owner, "Hi frank", sent_at)?;

    repo.record_dispatch(&notification, sent_at).await?;

    let schedule = repo
        .find_schedule(owner)
        .await?
        .ok_or_else(|| eyre::eyre!("missing schedule"))?;
    assert_eq!(schedule.last_sent_at(), Some(sent_at));
    assert_eq!(repo.notifications(owner).await?, vec![notification]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn record_dispatch_without_schedule_stores_nothing() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::from_env()? else {
        return Ok(());
    };
    let repo = PostgresReportRepository::new(db.pool());
    let owner = new_owner();
    let notification = Notification::new(owner, "Hi nobody", Utc::now())?;

    let result = repo.record_dispatch(&notification, Utc::now()).await;

    assert!(matches!(result, Err(ReportRepositoryError::NotFound(missing)) if missing == owner));
    assert!(repo.notifications(owner).await?.is_empty());
    Ok(())
}
