//! Shared world state for task workflow BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskdeck::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{OwnerId, Task, TaskId},
    services::TaskService,
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskService<InMemoryTaskRepository, DefaultClock>;

/// Scenario world for task workflow behaviour tests.
pub struct TaskWorkflowWorld {
    pub service: TestTaskService,
    pub owner: OwnerId,
    tasks: HashMap<String, TaskId>,
}

impl TaskWorkflowWorld {
    /// Creates a world with a single owner and no tasks.
    #[must_use]
    pub fn new() -> Self {
        let service =
            TaskService::new(Arc::new(InMemoryTaskRepository::new()), Arc::new(DefaultClock));

        Self {
            service,
            owner: OwnerId::from_uuid(uuid::Uuid::new_v4()),
            tasks: HashMap::new(),
        }
    }

    /// Remembers `task` under the label used in the scenario text.
    pub fn remember(&mut self, label: &str, task: &Task) {
        self.tasks.insert(label.to_owned(), task.id());
    }

    /// Returns the id of the task labelled `label`.
    ///
    /// # Errors
    ///
    /// Returns an error when no task was created under `label`.
    pub fn task_id(&self, label: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(label)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task labelled '{label}' in scenario world"))
    }

    /// Loads the current state of the task labelled `label`.
    ///
    /// # Errors
    ///
    /// Returns an error when the label is unknown or the lookup fails.
    pub fn load(&self, label: &str) -> Result<Task, eyre::Report> {
        let task_id = self.task_id(label)?;
        run_async(self.service.find_task(self.owner, task_id))?
            .ok_or_else(|| eyre::eyre!("task '{label}' is no longer visible"))
    }
}

impl Default for TaskWorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskWorkflowWorld {
    TaskWorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
