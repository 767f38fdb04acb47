//! Service layer for creating, editing, and listing an owner's tasks.

use crate::task::{
    domain::{
        OwnerId, ParseTaskStatusError, Priority, StatusChange, Task, TaskCounts, TaskDomainError,
        TaskDraft, TaskId, TaskQuery, TaskScope, TaskStatus, TaskTitle,
    },
    ports::{PersistOutcome, TaskRepository, TaskRepositoryError, UpdateOptions},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    owner: OwnerId,
    title: String,
    description: String,
    priority: u32,
    status: Option<String>,
    completed: bool,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields; the task starts at
    /// priority 1 with status `PENDING`.
    #[must_use]
    pub fn new(owner: OwnerId, title: impl Into<String>) -> Self {
        Self {
            owner,
            title: title.into(),
            description: String::new(),
            priority: Priority::FIRST.value(),
            status: None,
            completed: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the requested priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the initial status by name, e.g. `"IN_PROGRESS"`.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Creates the task already completed.
    #[must_use]
    pub const fn completed(mut self) -> Self {
        self.completed = true;
        self
    }
}

/// Request payload for editing a task. Unset fields keep their stored
/// values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    owner: OwnerId,
    task_id: TaskId,
    title: Option<String>,
    description: Option<String>,
    priority: Option<u32>,
    status: Option<String>,
    completed: Option<bool>,
}

impl UpdateTaskRequest {
    /// Creates an edit of `task_id` on behalf of `owner`.
    #[must_use]
    pub const fn new(owner: OwnerId, task_id: TaskId) -> Self {
        Self {
            owner,
            task_id,
            title: None,
            description: None,
            priority: None,
            status: None,
            completed: None,
        }
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a new priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets a new status by name.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The status name is not recognised.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// The task does not exist, is deleted, or belongs to another owner.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
#[derive(Clone)]
pub struct TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task at its requested priority.
    ///
    /// Active siblings holding the priority are shifted up to make room.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when input validation fails or the
    /// repository rejects persistence.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let status = request
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()?
            .unwrap_or_default();
        let draft = TaskDraft {
            owner: request.owner,
            title: TaskTitle::new(request.title)?,
            description: request.description,
            priority: Priority::new(request.priority)?,
            status,
            completed: request.completed,
        };

        let task = Task::new(draft, &*self.clock);
        let outcome = self.repository.create(&task).await?;
        log_outcome(&task, &outcome);
        info!(
            task_id = %task.id(),
            owner = %task.owner(),
            priority = %task.priority(),
            "created task"
        );
        Ok(task)
    }

    /// Applies an edit to an owner's task.
    ///
    /// Sibling priorities are reassigned only when the edit moves the task
    /// to a different priority or reopens a completed task; otherwise the
    /// task keeps whatever priority is stored when the write runs. A status
    /// change is recorded in the task's history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the owner has no such
    /// task, or another [`TaskServiceError`] when validation or persistence
    /// fails.
    pub async fn update_task(&self, request: UpdateTaskRequest) -> TaskServiceResult<Task> {
        let mut task = self.owned_task(request.owner, request.task_id).await?;
        let was_active = task.is_active();
        let previous_priority = task.priority();

        if let Some(title) = request.title {
            task.rename(TaskTitle::new(title)?);
        }
        if let Some(description) = request.description {
            task.describe(description);
        }
        if let Some(priority) = request.priority {
            task.set_priority(Priority::new(priority)?);
        }
        if let Some(status) = request.status.as_deref() {
            task.set_status(TaskStatus::try_from(status)?);
        }
        if let Some(completed) = request.completed {
            task.set_completed(completed);
        }

        let reassign =
            task.priority() != previous_priority || (!was_active && task.is_active());
        let options = UpdateOptions::new(reassign, self.clock.utc());
        let outcome = self.repository.update(&task, options).await?;
        task.set_priority(outcome.priority());
        log_outcome(&task, &outcome);
        info!(task_id = %task.id(), owner = %task.owner(), "updated task");
        Ok(task)
    }

    /// Marks an owner's task complete. The status is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the owner has no such
    /// task, or [`TaskServiceError::Repository`] when persistence fails.
    pub async fn complete_task(&self, owner: OwnerId, task_id: TaskId) -> TaskServiceResult<Task> {
        let mut task = self.owned_task(owner, task_id).await?;
        task.set_completed(true);
        let outcome = self
            .repository
            .update(&task, UpdateOptions::new(false, self.clock.utc()))
            .await?;
        task.set_priority(outcome.priority());
        info!(task_id = %task_id, owner = %owner, "completed task");
        Ok(task)
    }

    /// Soft-deletes an owner's task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the owner has no such
    /// task, or [`TaskServiceError::Repository`] when persistence fails.
    pub async fn delete_task(&self, owner: OwnerId, task_id: TaskId) -> TaskServiceResult<()> {
        let mut task = self.owned_task(owner, task_id).await?;
        task.mark_deleted();
        self.repository
            .update(&task, UpdateOptions::new(false, self.clock.utc()))
            .await?;
        info!(task_id = %task_id, owner = %owner, "deleted task");
        Ok(())
    }

    /// Retrieves an owner's task.
    ///
    /// Returns `Ok(None)` when the task does not exist, is deleted, or
    /// belongs to another owner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_task(
        &self,
        owner: OwnerId,
        task_id: TaskId,
    ) -> TaskServiceResult<Option<Task>> {
        let task = self.repository.find_by_id(task_id).await?;
        Ok(task.filter(|found| found.owner() == owner && !found.is_deleted()))
    }

    /// Lists an owner's tasks matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_tasks(
        &self,
        owner: OwnerId,
        query: &TaskQuery,
    ) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repository.list(owner, query).await?)
    }

    /// Counts an owner's non-deleted tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn task_counts(&self, owner: OwnerId) -> TaskServiceResult<TaskCounts> {
        let tasks = self
            .repository
            .list(owner, &TaskQuery::new(TaskScope::All))
            .await?;
        let completed = tasks.iter().filter(|task| task.is_completed()).count();
        let all = tasks.len();
        Ok(TaskCounts {
            all: all as u64,
            completed: completed as u64,
            active: (all - completed) as u64,
        })
    }

    /// Returns an owner's task history, oldest first, optionally limited to
    /// transitions into `new_status`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the owner has no such
    /// task, or [`TaskServiceError::Repository`] when persistence fails.
    pub async fn status_history(
        &self,
        owner: OwnerId,
        task_id: TaskId,
        new_status: Option<TaskStatus>,
    ) -> TaskServiceResult<Vec<StatusChange>> {
        self.owned_task(owner, task_id).await?;
        let mut records = self.repository.status_history(task_id).await?;
        if let Some(status) = new_status {
            records.retain(|change| change.new_status() == status);
        }
        Ok(records)
    }

    async fn owned_task(&self, owner: OwnerId, task_id: TaskId) -> TaskServiceResult<Task> {
        self.find_task(owner, task_id)
            .await?
            .ok_or(TaskServiceError::NotFound(task_id))
    }
}

fn log_outcome(task: &Task, outcome: &PersistOutcome) {
    if let Some(shift) = outcome.shift() {
        debug!(
            task_id = %task.id(),
            start = %shift.start(),
            end = %shift.end(),
            moved = shift.moved_count(),
            "made room for task priority"
        );
    }
    if let Some(change) = outcome.transition() {
        debug!(
            task_id = %task.id(),
            from = %change.old_status(),
            to = %change.new_status(),
            "task status changed"
        );
    }
}
