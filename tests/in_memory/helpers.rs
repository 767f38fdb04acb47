//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskdeck::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{OwnerId, TaskQuery, TaskScope},
    services::{CreateTaskRequest, TaskService},
};

/// Task service wired to an in-memory repository.
pub type TestService = TaskService<InMemoryTaskRepository, DefaultClock>;

/// Provides a fresh in-memory repository for each test.
#[fixture]
pub fn repo() -> Arc<InMemoryTaskRepository> {
    Arc::new(InMemoryTaskRepository::new())
}

/// Provides a task service over `repo`.
#[fixture]
pub fn service(repo: Arc<InMemoryTaskRepository>) -> TestService {
    TaskService::new(repo, Arc::new(DefaultClock))
}

/// Provides a fresh owner.
#[fixture]
pub fn owner() -> OwnerId {
    OwnerId::from_uuid(uuid::Uuid::new_v4())
}

/// Creates one task per `(title, priority)` pair, in order.
///
/// # Errors
///
/// Returns an error if any creation fails.
pub async fn seed(
    service: &TestService,
    owner: OwnerId,
    tasks: &[(&str, u32)],
) -> Result<(), eyre::Report> {
    for (title, priority) in tasks {
        service
            .create_task(CreateTaskRequest::new(owner, *title).with_priority(*priority))
            .await?;
    }
    Ok(())
}

/// Returns `(title, priority)` for the owner's active tasks in list order.
///
/// # Errors
///
/// Returns an error if listing fails.
pub async fn active_layout(
    service: &TestService,
    owner: OwnerId,
) -> Result<Vec<(String, u32)>, eyre::Report> {
    let tasks = service
        .list_tasks(owner, &TaskQuery::new(TaskScope::Active))
        .await?;
    Ok(tasks
        .iter()
        .map(|task| (task.title().as_str().to_owned(), task.priority().value()))
        .collect())
}
