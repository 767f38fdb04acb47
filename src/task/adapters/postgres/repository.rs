//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewStatusChangeRow, NewTaskRow, StatusChangeRow, TaskChangeset, TaskRow},
    schema::{task_status_changes, tasks},
};
use crate::task::{
    domain::{
        OwnerId, PersistedStatusChange, PersistedTaskData, Priority, PriorityAssignment,
        PriorityShift, StatusChange, StatusChangeId, StatusTally, Task, TaskId, TaskQuery,
        TaskScope, TaskStatus, TaskTitle, plan_priority_shift, record_transition,
    },
    ports::{
        PersistOutcome, TaskRepository, TaskRepositoryError, TaskRepositoryResult, UpdateOptions,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::BTreeSet;
use tracing::debug;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Every create and update runs in one transaction that first takes a
/// transaction-scoped advisory lock on the owner, so two writers for the
/// same owner can never observe the same free priority.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: &Task) -> TaskRepositoryResult<PersistOutcome> {
        let task_id = task.id();
        let owner = task.owner();
        let new_row = to_new_row(task)?;
        let priority = task.priority();
        let assignment = task
            .is_active()
            .then(|| PriorityAssignment::for_new_task(owner, task.priority()));

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                lock_owner(tx, owner)?;

                // Semantic pre-check; the primary key still guards the insert.
                let exists: i64 = tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .count()
                    .get_result(tx)?;
                if exists > 0 {
                    return Err(TaskRepositoryError::DuplicateTask(task_id));
                }

                let shift = assignment
                    .map(|placement| assign_priority(tx, &placement))
                    .transpose()?
                    .flatten();

                diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskRepositoryError::DuplicateTask(task_id)
                        }
                        _ => TaskRepositoryError::persistence(err),
                    })?;

                Ok(PersistOutcome::new(priority, shift, None))
            })
        })
        .await
    }

    async fn update(
        &self,
        task: &Task,
        options: UpdateOptions,
    ) -> TaskRepositoryResult<PersistOutcome> {
        let task_id = task.id();
        let owner = task.owner();
        let incoming_status = task.status();
        let mut changeset = to_changeset(task)?;
        let reassign = options.reassign_priority() && task.is_active();
        let assignment = reassign
            .then(|| PriorityAssignment::for_existing_task(owner, task.priority(), task_id));
        let changed_at = options.changed_at();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                lock_owner(tx, owner)?;

                let (stored_status, stored_priority) = stored_state_for_update(tx, task_id)?
                    .ok_or(TaskRepositoryError::NotFound(task_id))?;
                if !reassign {
                    changeset.priority = to_db_priority(stored_priority)?;
                }

                let shift = assignment
                    .map(|placement| assign_priority(tx, &placement))
                    .transpose()?
                    .flatten();

                let transition =
                    record_transition(task_id, Some(stored_status), incoming_status, changed_at);
                if let Some(change) = &transition {
                    diesel::insert_into(task_status_changes::table)
                        .values(&to_new_status_change_row(change))
                        .execute(tx)?;
                    debug!(
                        task_id = %task_id,
                        from = %change.old_status(),
                        to = %change.new_status(),
                        "recorded status transition"
                    );
                }

                diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                    .set(&changeset)
                    .execute(tx)?;

                let written = from_db_priority(changeset.priority)?;
                Ok(PersistOutcome::new(written, shift, transition))
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, owner: OwnerId, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let filter = query.clone();
        self.run_blocking(move |connection| {
            let mut statement = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .filter(tasks::deleted.eq(false))
                .select(TaskRow::as_select())
                .into_boxed();

            statement = match filter.scope() {
                TaskScope::Active => statement.filter(tasks::completed.eq(false)).order((
                    tasks::priority.asc(),
                    tasks::created_at.asc(),
                    tasks::id.asc(),
                )),
                TaskScope::Completed => statement.filter(tasks::completed.eq(true)).order((
                    tasks::priority.asc(),
                    tasks::created_at.asc(),
                    tasks::id.asc(),
                )),
                TaskScope::All => statement.order((
                    tasks::completed.asc(),
                    tasks::priority.asc(),
                    tasks::created_at.asc(),
                    tasks::id.asc(),
                )),
            };
            if let Some(term) = filter.title_contains() {
                statement = statement.filter(tasks::title.ilike(contains_pattern(term)));
            }
            if let Some(status) = filter.status() {
                statement = statement.filter(tasks::status.eq(status.as_str()));
            }

            let rows = statement.load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn status_history(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<StatusChange>> {
        self.run_blocking(move |connection| {
            let rows = task_status_changes::table
                .filter(task_status_changes::task_id.eq(task_id.into_inner()))
                .order((
                    task_status_changes::recorded_at.asc(),
                    task_status_changes::sequence.asc(),
                ))
                .select(StatusChangeRow::as_select())
                .load::<StatusChangeRow>(connection)?;
            rows.into_iter().map(row_to_status_change).collect()
        })
        .await
    }

    async fn status_counts(&self, owner: OwnerId) -> TaskRepositoryResult<Vec<StatusTally>> {
        self.run_blocking(move |connection| {
            let rows: Vec<(String, i64)> = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .filter(tasks::deleted.eq(false))
                .group_by(tasks::status)
                .select((tasks::status, diesel::dsl::count(tasks::id)))
                .order_by(tasks::status.asc())
                .load(connection)?;

            rows.into_iter()
                .map(|(status, total)| {
                    Ok(StatusTally {
                        status: parse_status(&status)?,
                        total: u64::try_from(total).map_err(TaskRepositoryError::persistence)?,
                    })
                })
                .collect()
        })
        .await
    }
}

/// Serialises units of work per owner until the transaction ends.
fn lock_owner(connection: &mut PgConnection, owner: OwnerId) -> TaskRepositoryResult<()> {
    diesel::sql_query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind::<diesel::sql_types::Uuid, _>(owner.into_inner())
        .execute(connection)?;
    Ok(())
}

/// Reads and row-locks the stored status and priority of `task_id`.
fn stored_state_for_update(
    connection: &mut PgConnection,
    task_id: TaskId,
) -> TaskRepositoryResult<Option<(TaskStatus, Priority)>> {
    let stored = tasks::table
        .filter(tasks::id.eq(task_id.into_inner()))
        .select((tasks::status, tasks::priority))
        .for_update()
        .first::<(String, i32)>(connection)
        .optional()?;
    stored
        .map(|(status, priority)| Ok((parse_status(&status)?, from_db_priority(priority)?)))
        .transpose()
}

/// Shifts the owner's colliding block so `assignment.target()` is free.
fn assign_priority(
    connection: &mut PgConnection,
    assignment: &PriorityAssignment,
) -> TaskRepositoryResult<Option<PriorityShift>> {
    let owner = assignment.owner().into_inner();
    let excluded: Vec<uuid::Uuid> = assignment
        .excluding()
        .map(TaskId::into_inner)
        .into_iter()
        .collect();

    let held: Vec<i32> = tasks::table
        .filter(tasks::owner_id.eq(owner))
        .filter(tasks::deleted.eq(false))
        .filter(tasks::completed.eq(false))
        .filter(tasks::id.ne_all(excluded.clone()))
        .filter(tasks::priority.ge(to_db_priority(assignment.target())?))
        .select(tasks::priority)
        .load(connection)?;
    let occupied = held
        .into_iter()
        .map(from_db_priority)
        .collect::<TaskRepositoryResult<BTreeSet<Priority>>>()?;

    let Some(shift) = plan_priority_shift(&occupied, assignment.target())? else {
        return Ok(None);
    };
    // The top of the shifted block must still fit the column.
    to_db_priority(shift.gap())?;

    let moved = diesel::update(
        tasks::table
            .filter(tasks::owner_id.eq(owner))
            .filter(tasks::deleted.eq(false))
            .filter(tasks::completed.eq(false))
            .filter(tasks::id.ne_all(excluded))
            .filter(
                tasks::priority
                    .between(to_db_priority(shift.start())?, to_db_priority(shift.end())?),
            ),
    )
    .set(tasks::priority.eq(tasks::priority + 1))
    .execute(connection)?;

    debug!(
        owner = %assignment.owner(),
        start = %shift.start(),
        gap = %shift.gap(),
        moved,
        "shifted colliding priorities"
    );
    Ok(Some(shift))
}

/// Builds an `ILIKE` pattern matching `term` anywhere, with wildcards in
/// the term escaped.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn to_db_priority(priority: Priority) -> TaskRepositoryResult<i32> {
    i32::try_from(priority.value()).map_err(TaskRepositoryError::persistence)
}

fn from_db_priority(value: i32) -> TaskRepositoryResult<Priority> {
    let raw = u32::try_from(value).map_err(TaskRepositoryError::persistence)?;
    Priority::new(raw).map_err(TaskRepositoryError::persistence)
}

fn parse_status(value: &str) -> TaskRepositoryResult<TaskStatus> {
    TaskStatus::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        completed: task.is_completed(),
        deleted: task.is_deleted(),
        priority: to_db_priority(task.priority())?,
        status: task.status().as_str().to_owned(),
        created_at: task.created_at(),
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    Ok(TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        completed: task.is_completed(),
        deleted: task.is_deleted(),
        priority: to_db_priority(task.priority())?,
        status: task.status().as_str().to_owned(),
    })
}

fn to_new_status_change_row(change: &StatusChange) -> NewStatusChangeRow {
    NewStatusChangeRow {
        id: change.id().into_inner(),
        task_id: change.task_id().into_inner(),
        old_status: change.old_status().as_str().to_owned(),
        new_status: change.new_status().as_str().to_owned(),
        recorded_at: change.timestamp(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        title,
        description,
        completed,
        deleted,
        priority,
        status,
        created_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner: OwnerId::from_uuid(owner_id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        completed,
        deleted,
        priority: from_db_priority(priority)?,
        status: parse_status(&status)?,
        created_at,
    };
    Ok(Task::from_persisted(data))
}

fn row_to_status_change(row: StatusChangeRow) -> TaskRepositoryResult<StatusChange> {
    Ok(StatusChange::from_persisted(PersistedStatusChange {
        id: StatusChangeId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        old_status: parse_status(&row.old_status)?,
        new_status: parse_status(&row.new_status)?,
        timestamp: row.recorded_at,
    }))
}
