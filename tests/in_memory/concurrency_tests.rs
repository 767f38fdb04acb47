//! Concurrent writers against one in-memory repository.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::helpers::{TestService, owner, service};
use rstest::rstest;
use taskdeck::task::{
    domain::{OwnerId, TaskQuery, TaskScope},
    services::CreateTaskRequest,
};

const WRITERS: u32 = 16;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_at_same_priority_stay_dense(
    service: TestService,
    owner: OwnerId,
) -> Result<(), eyre::Report> {
    let shared = Arc::new(service);
    let handles: Vec<_> = (0..WRITERS)
        .map(|index| {
            let writer = Arc::clone(&shared);
            tokio::spawn(async move {
                writer
                    .create_task(CreateTaskRequest::new(owner, format!("Parallel task {index}")))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    let tasks = shared
        .list_tasks(owner, &TaskQuery::new(TaskScope::Active))
        .await?;
    let priorities: BTreeSet<u32> = tasks.iter().map(|task| task.priority().value()).collect();

    assert_eq!(tasks.len(), priorities.len());
    assert_eq!(priorities, (1..=WRITERS).collect::<BTreeSet<u32>>());
    Ok(())
}
