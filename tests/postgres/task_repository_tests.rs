//! `PostgreSQL` task repository tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::helpers::TestDatabase;
use mockable::DefaultClock;
use taskdeck::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{OwnerId, StatusTally, TaskQuery, TaskScope, TaskStatus},
    ports::{TaskRepository, UpdateOptions},
    services::{CreateTaskRequest, TaskService, UpdateTaskRequest},
};

type PgService = TaskService<PostgresTaskRepository, DefaultClock>;

fn service_for(db: &TestDatabase) -> (Arc<PostgresTaskRepository>, PgService) {
    let repo = Arc::new(PostgresTaskRepository::new(db.pool()));
    let service = TaskService::new(Arc::clone(&repo), Arc::new(DefaultClock));
    (repo, service)
}

fn new_owner() -> OwnerId {
    OwnerId::from_uuid(uuid::Uuid::new_v4())
}

async fn layout(service: &PgService, owner: OwnerId) -> Result<Vec<(String, u32)>, eyre::Report> {
    let tasks = service
        .list_tasks(owner, &TaskQuery::new(TaskScope::Active))
        .await?;
    Ok(tasks
        .iter()
        .map(|task| (task.title().as_str().to_owned(), task.priority().value()))
        .collect())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_shifts_block_up_to_first_gap() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::from_env()? else {
        return Ok(());
    };
    let (_, service) = service_for(&db);
    let owner = new_owner();
    for (title, priority) in [("First chore", 1), ("Second chore", 2), ("Fourth chore", 4)] {
        service
            .create_task(CreateTaskRequest::new(owner, title).with_priority(priority))
            .await?;
    }

    service
        .create_task(CreateTaskRequest::new(owner, "Newest chore").with_priority(1))
        .await?;

    assert_eq!(
        layout(&service, owner).await?,
        vec![
            ("NEWEST CHORE".to_owned(), 1),
            ("FIRST CHORE".to_owned(), 2),
            ("SECOND CHORE".to_owned(), 3),
            ("FOURTH CHORE".to_owned(), 4),
        ]
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_records_only_real_transitions() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::from_env()? else {
        return Ok(());
    };
    let (repo, service) = service_for(&db);
    let owner = new_owner();
    let task = service
        .create_task(CreateTaskRequest::new(owner, "Status tracked").with_status("IN_PROGRESS"))
        .await?;

    service
        .update_task(UpdateTaskRequest::new(owner, task.id()).with_title("Status still tracked"))
        .await?;
    service
        .update_task(UpdateTaskRequest::new(owner, task.id()).with_status("COMPLETED"))
        .await?;

    let history = repo.status_history(task.id()).await?;
    let pairs: Vec<(TaskStatus, TaskStatus)> = history
        .iter()
        .map(|change| (change.old_status(), change.new_status()))
        .collect();
    assert_eq!(pairs, vec![(TaskStatus::InProgress, TaskStatus::Completed)]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn completed_and_deleted_tasks_are_skipped_by_collisions() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::from_env()? else {
        return Ok(());
    };
    let (_, service) = service_for(&db);
    let owner = new_owner();
    let done = service
        .create_task(CreateTaskRequest::new(owner, "Done already").with_priority(1))
        .await?;
    service.complete_task(owner, done.id()).await?;
    let dropped = service
        .create_task(CreateTaskRequest::new(owner, "Dropped idea").with_priority(2))
        .await?;
    service.delete_task(owner, dropped.id()).await?;

    service
        .create_task(CreateTaskRequest::new(owner, "Fresh start").with_priority(1))
        .await?;
    service
        .create_task(CreateTaskRequest::new(owner, "Second fresh").with_priority(2))
        .await?;

    assert_eq!(
        layout(&service, owner).await?,
        vec![("FRESH START".to_owned(), 1), ("SECOND FRESH".to_owned(), 2)]
    );
    let completed = service
        .list_tasks(owner, &TaskQuery::new(TaskScope::Completed))
        .await?;
    assert_eq!(completed.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn title_search_treats_wildcards_literally() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::from_env()? else {
        return Ok(());
    };
    let (_, service) = service_for(&db);
    let owner = new_owner();
    service
        .create_task(CreateTaskRequest::new(owner, "Raise 100% coverage"))
        .await?;
    service
        .create_task(CreateTaskRequest::new(owner, "Raise 1000 funds"))
        .await?;

    let found = service
        .list_tasks(
            owner,
            &TaskQuery::new(TaskScope::Active).with_title_containing("100%"),
        )
        .await?;

    let titles: Vec<&str> = found.iter().map(|task| task.title().as_str()).collect();
    assert_eq!(titles, vec!["RAISE 100% COVERAGE"]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn status_counts_group_non_deleted_tasks() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::from_env()? else {
        return Ok(());
    };
    let (repo, service) = service_for(&db);
    let owner = new_owner();
    service
        .create_task(CreateTaskRequest::new(owner, "Pending one"))
        .await?;
    service
        .create_task(CreateTaskRequest::new(owner, "Pending two"))
        .await?;
    let removed = service
        .create_task(CreateTaskRequest::new(owner, "Cancelled one").with_status("CANCELLED"))
        .await?;
    service.delete_task(owner, removed.id()).await?;

    let counts = repo.status_counts(owner).await?;

    assert_eq!(
        counts,
        vec![StatusTally {
            status: TaskStatus::Pending,
            total: 2,
        }]
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_keep_priorities_distinct() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::from_env()? else {
        return Ok(());
    };
    let (_, service) = service_for(&db);
    let shared = Arc::new(service);
    let owner = new_owner();

    let handles: Vec<_> = (0..8_u32)
        .map(|index| {
            let writer = Arc::clone(&shared);
            tokio::spawn(async move {
                writer
                    .create_task(CreateTaskRequest::new(owner, format!("Concurrent {index}")))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    let priorities: BTreeSet<u32> = layout(&shared, owner)
        .await?
        .into_iter()
        .map(|(_, priority)| priority)
        .collect();
    assert_eq!(priorities, (1..=8).collect::<BTreeSet<u32>>());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_snapshot_update_keeps_stored_priority() -> Result<(), eyre::Report> {
    let Some(db) = TestDatabase::from_env()? else {
        return Ok(());
    };
    let (repo, service) = service_for(&db);
    let owner = new_owner();
    let snapshot = service
        .create_task(CreateTaskRequest::new(owner, "Read before shift"))
        .await?;
    service
        .create_task(CreateTaskRequest::new(owner, "Shifts the first"))
        .await?;

    let mut edited = snapshot.clone();
    edited.describe("written from a stale copy");
    let outcome = repo
        .update(&edited, UpdateOptions::new(false, chrono::Utc::now()))
        .await?;

    assert_eq!(outcome.priority().value(), 2);
    assert_eq!(
        layout(&service, owner).await?,
        vec![
            ("SHIFTS THE FIRST".to_owned(), 1),
            ("READ BEFORE SHIFT".to_owned(), 2),
        ]
    );
    Ok(())
}
