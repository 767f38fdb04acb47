//! In-memory task repository.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{
        OwnerId, Priority, PriorityAssignment, PriorityShift, StatusChange, StatusTally, Task,
        TaskId, TaskQuery, plan_priority_shift, record_transition,
    },
    ports::{
        PersistOutcome, TaskRepository, TaskRepositoryError, TaskRepositoryResult, UpdateOptions,
    },
};

/// Thread-safe in-memory task repository.
///
/// Each unit of work runs under a single write guard, which serialises
/// priority assignment across all owners.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    history: Vec<StatusChange>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Shifts the owner's colliding block so `assignment.target()` is free.
///
/// New priorities are computed before any task is touched so a failure
/// leaves the state unchanged.
fn assign_priority(
    state: &mut InMemoryTaskState,
    assignment: &PriorityAssignment,
) -> TaskRepositoryResult<Option<PriorityShift>> {
    let is_sibling = |task: &Task| {
        task.owner() == assignment.owner()
            && task.is_active()
            && Some(task.id()) != assignment.excluding()
    };

    let occupied: BTreeSet<Priority> = state
        .tasks
        .values()
        .filter(|task| is_sibling(task))
        .map(Task::priority)
        .collect();
    let Some(shift) = plan_priority_shift(&occupied, assignment.target())? else {
        return Ok(None);
    };

    let moves = state
        .tasks
        .values()
        .filter(|task| is_sibling(task) && shift.contains(task.priority()))
        .map(|task| Ok((task.id(), task.priority().next()?)))
        .collect::<TaskRepositoryResult<Vec<_>>>()?;
    for (id, priority) in moves {
        if let Some(task) = state.tasks.get_mut(&id) {
            task.set_priority(priority);
        }
    }
    Ok(Some(shift))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: &Task) -> TaskRepositoryResult<PersistOutcome> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        let shift = if task.is_active() {
            let assignment = PriorityAssignment::for_new_task(task.owner(), task.priority());
            assign_priority(&mut state, &assignment)?
        } else {
            None
        };
        state.tasks.insert(task.id(), task.clone());
        Ok(PersistOutcome::new(task.priority(), shift, None))
    }

    async fn update(
        &self,
        task: &Task,
        options: UpdateOptions,
    ) -> TaskRepositoryResult<PersistOutcome> {
        let mut state = self.state.write().map_err(lock_poisoned)?;

        let (stored_status, stored_priority) = state
            .tasks
            .get(&task.id())
            .map(|stored| (stored.status(), stored.priority()))
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;

        let reassign = options.reassign_priority() && task.is_active();
        let shift = if reassign {
            let assignment =
                PriorityAssignment::for_existing_task(task.owner(), task.priority(), task.id());
            assign_priority(&mut state, &assignment)?
        } else {
            None
        };
        let mut written = task.clone();
        if !reassign {
            written.set_priority(stored_priority);
        }

        let transition = record_transition(
            task.id(),
            Some(stored_status),
            task.status(),
            options.changed_at(),
        );
        if let Some(change) = &transition {
            state.history.push(change.clone());
        }
        let priority = written.priority();
        state.tasks.insert(task.id(), written);
        Ok(PersistOutcome::new(priority, shift, transition))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, owner: OwnerId, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.owner() == owner && query.matches(task))
            .cloned()
            .collect();
        tasks.sort_by(|left, right| query.compare(left, right));
        Ok(tasks)
    }

    async fn status_history(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<StatusChange>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut records: Vec<StatusChange> = state
            .history
            .iter()
            .filter(|change| change.task_id() == task_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        records.sort_by_key(StatusChange::timestamp);
        Ok(records)
    }

    async fn status_counts(&self, owner: OwnerId) -> TaskRepositoryResult<Vec<StatusTally>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut totals: BTreeMap<&'static str, StatusTally> = BTreeMap::new();
        for task in state
            .tasks
            .values()
            .filter(|task| task.owner() == owner && !task.is_deleted())
        {
            totals
                .entry(task.status().as_str())
                .or_insert(StatusTally {
                    status: task.status(),
                    total: 0,
                })
                .total += 1;
        }
        Ok(totals.into_values().collect())
    }
}
