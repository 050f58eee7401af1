//! `PostgreSQL` repository implementation for task and comment storage.

use super::{
    models::{CommentRow, NewCommentRow, NewTaskRow, PriorityCountRow, StatusCountRow, TaskRow},
    schema::{task_comments, tasks},
};
use crate::identity::domain::UserId;
use crate::task::{
    domain::{
        CommentId, PersistedCommentData, PersistedTaskData, Task, TaskComment, TaskId,
        TaskPriority, TaskStatus,
    },
    ports::{
        CommentRepository, CommentRepositoryError, CommentRepositoryResult, PriorityCount,
        StatusCount, TaskListFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        TaskScope,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task and comment store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
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

    async fn run_comment_blocking<F, T>(&self, f: F) -> CommentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CommentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CommentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CommentRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskStore {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_new_row(task);

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            // Comment rows go with the task via ON DELETE CASCADE.
            let removed = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if removed == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: &TaskListFilter) -> TaskRepositoryResult<Vec<Task>> {
        let TaskListFilter {
            scope,
            status,
            priority,
            search,
        } = filter.clone();

        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let TaskScope::Participant(participant) = scope {
                let uuid = participant.into_inner();
                query =
                    query.filter(tasks::assigned_to.eq(uuid).or(tasks::created_by.eq(uuid)));
            }
            if let Some(wanted_status) = status {
                query = query.filter(tasks::status.eq(wanted_status.as_str()));
            }
            if let Some(wanted_priority) = priority {
                query = query.filter(tasks::priority.eq(wanted_priority.as_str()));
            }
            if let Some(term) = search {
                let pattern = like_pattern(&term);
                query = query.filter(
                    tasks::title
                        .ilike(pattern.clone())
                        .or(tasks::description.ilike(pattern)),
                );
            }

            let rows = query
                .order(tasks::created_at.desc())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn count_by_status(&self, scope: TaskScope) -> TaskRepositoryResult<Vec<StatusCount>> {
        self.run_blocking(move |connection| {
            let rows = match scope {
                TaskScope::All => diesel::sql_query(
                    "SELECT status, COUNT(*) AS tally FROM tasks GROUP BY status",
                )
                .load::<StatusCountRow>(connection),
                TaskScope::Participant(participant) => diesel::sql_query(
                    "SELECT status, COUNT(*) AS tally FROM tasks \
                     WHERE assigned_to = $1 OR created_by = $1 GROUP BY status",
                )
                .bind::<diesel::sql_types::Uuid, _>(participant.into_inner())
                .load::<StatusCountRow>(connection),
            }
            .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(status_count_from_row).collect()
        })
        .await
    }

    async fn count_by_priority(
        &self,
        scope: TaskScope,
    ) -> TaskRepositoryResult<Vec<PriorityCount>> {
        self.run_blocking(move |connection| {
            let rows = match scope {
                TaskScope::All => diesel::sql_query(
                    "SELECT priority, COUNT(*) AS tally FROM tasks GROUP BY priority",
                )
                .load::<PriorityCountRow>(connection),
                TaskScope::Participant(participant) => diesel::sql_query(
                    "SELECT priority, COUNT(*) AS tally FROM tasks \
                     WHERE assigned_to = $1 OR created_by = $1 GROUP BY priority",
                )
                .bind::<diesel::sql_types::Uuid, _>(participant.into_inner())
                .load::<PriorityCountRow>(connection),
            }
            .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(priority_count_from_row).collect()
        })
        .await
    }

    async fn count_overdue(
        &self,
        scope: TaskScope,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let completed = TaskStatus::Completed.as_str();
            let total = match scope {
                TaskScope::All => tasks::table
                    .filter(tasks::status.ne(completed))
                    .filter(tasks::due_date.lt(now))
                    .count()
                    .get_result::<i64>(connection),
                TaskScope::Participant(participant) => {
                    let uuid = participant.into_inner();
                    tasks::table
                        .filter(tasks::assigned_to.eq(uuid).or(tasks::created_by.eq(uuid)))
                        .filter(tasks::status.ne(completed))
                        .filter(tasks::due_date.lt(now))
                        .count()
                        .get_result::<i64>(connection)
                }
            }
            .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(total).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn count_active_for_assignee(&self, assignee: UserId) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let active = [
                TaskStatus::Pending.as_str(),
                TaskStatus::InProgress.as_str(),
            ];
            let total = tasks::table
                .filter(tasks::assigned_to.eq(assignee.into_inner()))
                .filter(tasks::status.eq_any(active))
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(total).map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

#[async_trait]
impl CommentRepository for PostgresTaskStore {
    async fn store(&self, comment: &TaskComment) -> CommentRepositoryResult<()> {
        let comment_id = comment.id();
        let task_id = comment.task_id();
        let new_row = to_new_comment_row(comment);

        self.run_comment_blocking(move |connection| {
            diesel::insert_into(task_comments::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CommentRepositoryError::DuplicateComment(comment_id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
                        if is_task_reference_violation(info.as_ref()) =>
                    {
                        CommentRepositoryError::MissingTask(task_id)
                    }
                    _ => CommentRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> CommentRepositoryResult<Vec<TaskComment>> {
        self.run_comment_blocking(move |connection| {
            let rows = task_comments::table
                .filter(task_comments::task_id.eq(task_id.into_inner()))
                .order(task_comments::created_at.desc())
                .select(CommentRow::as_select())
                .load::<CommentRow>(connection)
                .map_err(CommentRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_comment).collect())
        })
        .await
    }
}

fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        assigned_to: task.assignee().into_inner(),
        created_by: task.creator().into_inner(),
        due_date: task.due_date(),
        estimated_hours: task.estimated_hours(),
        notes: task.notes().map(str::to_owned),
        completed_at: task.completed_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status: persisted_status,
        priority: persisted_priority,
        assigned_to,
        created_by,
        due_date,
        estimated_hours,
        notes,
        completed_at,
        created_at,
        updated_at,
    } = row;

    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        status,
        priority,
        assignee: UserId::from_uuid(assigned_to),
        creator: UserId::from_uuid(created_by),
        due_date,
        estimated_hours,
        notes,
        completed_at,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn status_count_from_row(row: StatusCountRow) -> TaskRepositoryResult<StatusCount> {
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let tally = u64::try_from(row.tally).map_err(TaskRepositoryError::persistence)?;
    Ok(StatusCount { status, tally })
}

fn priority_count_from_row(row: PriorityCountRow) -> TaskRepositoryResult<PriorityCount> {
    let priority =
        TaskPriority::try_from(row.priority.as_str()).map_err(TaskRepositoryError::persistence)?;
    let tally = u64::try_from(row.tally).map_err(TaskRepositoryError::persistence)?;
    Ok(PriorityCount { priority, tally })
}

fn to_new_comment_row(comment: &TaskComment) -> NewCommentRow {
    NewCommentRow {
        id: comment.id().into_inner(),
        task_id: comment.task_id().into_inner(),
        author_id: comment.author().into_inner(),
        body: comment.body().to_owned(),
        created_at: comment.created_at(),
    }
}

fn row_to_comment(row: CommentRow) -> TaskComment {
    TaskComment::from_persisted(PersistedCommentData {
        id: CommentId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        author: UserId::from_uuid(row.author_id),
        body: row.body,
        created_at: row.created_at,
    })
}

fn is_task_reference_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "task_comments_task_id_fkey")
}
