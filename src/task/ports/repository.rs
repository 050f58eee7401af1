//! Repository port for task persistence, listing and aggregate counts.

use crate::identity::domain::UserId;
use crate::task::domain::{Task, TaskId, TaskPriority, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Visibility scope applied to listing and aggregate queries.
///
/// Managers query [`TaskScope::All`]; everyone else is limited to tasks
/// they participate in as assignee or creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Every task in the store.
    All,
    /// Tasks where the given user is the assignee or the creator.
    Participant(UserId),
}

/// Filter applied when listing tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListFilter {
    /// Visibility scope for the listing.
    pub scope: TaskScope,
    /// Restrict to tasks holding this status.
    pub status: Option<TaskStatus>,
    /// Restrict to tasks holding this priority.
    pub priority: Option<TaskPriority>,
    /// Restrict to tasks whose title or description contains this text,
    /// matched case-insensitively.
    pub search: Option<String>,
}

impl TaskListFilter {
    /// Creates an unrestricted filter for the given scope.
    #[must_use]
    pub const fn scoped(scope: TaskScope) -> Self {
        Self {
            scope,
            status: None,
            priority: None,
            search: None,
        }
    }

    /// Restricts the listing to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the listing to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts the listing to tasks matching a search term.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// Number of tasks holding one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    /// The status being counted.
    pub status: TaskStatus,
    /// How many tasks hold it.
    pub tally: u64,
}

/// Number of tasks holding one priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityCount {
    /// The priority being counted.
    pub priority: TaskPriority,
    /// How many tasks hold it.
    pub tally: u64,
}

/// Task persistence contract.
///
/// The aggregate count operations exist so dashboards stay at one store
/// round trip per category instead of loading and iterating task rows in
/// application memory.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// The whole row is written; the most recent update wins under
    /// concurrent changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task together with its comments.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching the filter, newest created first.
    async fn list(&self, filter: &TaskListFilter) -> TaskRepositoryResult<Vec<Task>>;

    /// Counts tasks per status within the scope.
    ///
    /// Statuses with no tasks are omitted from the result.
    async fn count_by_status(&self, scope: TaskScope) -> TaskRepositoryResult<Vec<StatusCount>>;

    /// Counts tasks per priority within the scope.
    ///
    /// Priorities with no tasks are omitted from the result.
    async fn count_by_priority(&self, scope: TaskScope)
    -> TaskRepositoryResult<Vec<PriorityCount>>;

    /// Counts non-completed tasks within the scope whose deadline has
    /// passed.
    async fn count_overdue(
        &self,
        scope: TaskScope,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<u64>;

    /// Counts tasks assigned to the user that are neither completed nor
    /// cancelled.
    async fn count_active_for_assignee(&self, assignee: UserId) -> TaskRepositoryResult<u64>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
