//! End-to-end summary delivery with in-memory adapters.

use std::sync::Arc;

use super::helpers::{TestService, owner, repo};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::rstest;
use taskdeck::config::ReportsConfig;
use taskdeck::report::{
    adapters::memory::{InMemoryReportRepository, RecordingMailer},
    domain::{DEFAULT_SEND_AFTER, Recipient},
    ports::ReportRepository,
    services::ReportService,
};
use taskdeck::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::OwnerId,
    services::{CreateTaskRequest, TaskService},
};

type TestReportService =
    ReportService<InMemoryReportRepository, InMemoryTaskRepository, RecordingMailer>;

fn evening() -> Result<DateTime<Utc>, eyre::Report> {
    Utc.with_ymd_and_hms(2024, 5, 20, 22, 15, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("ambiguous timestamp"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn daily_summary_reaches_each_owner_once(
    repo: Arc<InMemoryTaskRepository>,
    owner: OwnerId,
) -> Result<(), eyre::Report> {
    let tasks: TestService = TaskService::new(Arc::clone(&repo), Arc::new(DefaultClock));
    let reports = Arc::new(InMemoryReportRepository::new());
    let mailer = Arc::new(RecordingMailer::new());
    let service: TestReportService = ReportService::from_config(
        Arc::clone(&reports),
        repo,
        Arc::clone(&mailer),
        &ReportsConfig::default(),
    );

    let rejected_owner = OwnerId::from_uuid(uuid::Uuid::new_v4());
    tasks
        .create_task(CreateTaskRequest::new(owner, "Water the plants"))
        .await?;
    tasks
        .create_task(CreateTaskRequest::new(owner, "File the taxes").with_status("CANCELLED"))
        .await?;
    service
        .configure(owner, Recipient::new("carol", "carol@example.com")?, None)
        .await?;
    service
        .configure(
            rejected_owner,
            Recipient::new("dave", "dave@example.com")?,
            Some(DEFAULT_SEND_AFTER),
        )
        .await?;
    mailer.reject("dave@example.com")?;

    let first_run = service.dispatch_due(evening()?).await?;
    let same_evening = service
        .dispatch_due(evening()? + TimeDelta::minutes(30))
        .await?;

    assert_eq!(first_run, vec!["carol@example.com".to_owned()]);
    assert!(same_evening.is_empty());

    let sent = mailer.sent()?;
    let email = sent
        .first()
        .ok_or_else(|| eyre::eyre!("expected one delivered email"))?;
    assert_eq!(sent.len(), 1);
    assert_eq!(email.from, "tasks@taskmanager.com");
    assert_eq!(
        email.body,
        "Hi carol\nPlease find the below task summary :\nCANCELLED : 1\nPENDING : 1\n"
    );

    let stored = reports.notifications(owner).await?;
    let notification = stored
        .first()
        .ok_or_else(|| eyre::eyre!("expected one stored notification"))?;
    assert_eq!(notification.content(), email.body);
    assert!(reports.notifications(rejected_owner).await?.is_empty());

    let rejected = reports
        .find_schedule(rejected_owner)
        .await?
        .ok_or_else(|| eyre::eyre!("missing schedule"))?;
    assert_eq!(rejected.last_sent_at(), None);
    Ok(())
}
