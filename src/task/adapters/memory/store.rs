//! In-memory store for task lifecycle and comment tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::task::{
    domain::{CommentId, Task, TaskComment, TaskId, TaskPriority, TaskStatus},
    ports::{
        CommentRepository, CommentRepositoryError, CommentRepositoryResult, PriorityCount,
        StatusCount, TaskListFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        TaskScope,
    },
};

/// Thread-safe in-memory task and comment store.
///
/// Implements both repository ports over one state so deleting a task can
/// drop its comments the way the relational cascade does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    comments: HashMap<CommentId, TaskComment>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_scope(task: &Task, scope: TaskScope) -> bool {
    match scope {
        TaskScope::All => true,
        TaskScope::Participant(user_id) => {
            task.assignee() == user_id || task.creator() == user_id
        }
    }
}

fn matches_search(task: &Task, search: &str) -> bool {
    let needle = search.to_lowercase();
    task.title().to_lowercase().contains(&needle)
        || task.description().to_lowercase().contains(&needle)
}

fn matches_filter(task: &Task, filter: &TaskListFilter) -> bool {
    if !matches_scope(task, filter.scope) {
        return false;
    }
    if let Some(status) = filter.status
        && task.status() != status
    {
        return false;
    }
    if let Some(priority) = filter.priority
        && task.priority() != priority
    {
        return false;
    }
    if let Some(search) = filter.search.as_deref()
        && !matches_search(task, search)
    {
        return false;
    }
    true
}

fn tally_matching(
    state: &InMemoryTaskState,
    predicate: impl Fn(&Task) -> bool,
) -> TaskRepositoryResult<u64> {
    let count = state.tasks.values().filter(|task| predicate(task)).count();
    u64::try_from(count).map_err(TaskRepositoryError::persistence)
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.comments.retain(|_, comment| comment.task_id() != id);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, filter: &TaskListFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| matches_filter(task, filter))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(tasks)
    }

    async fn count_by_status(&self, scope: TaskScope) -> TaskRepositoryResult<Vec<StatusCount>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let statuses = [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
        ];
        let mut counts = Vec::new();
        for status in statuses {
            let tally = tally_matching(&state, |task| {
                matches_scope(task, scope) && task.status() == status
            })?;
            if tally > 0 {
                counts.push(StatusCount { status, tally });
            }
        }
        Ok(counts)
    }

    async fn count_by_priority(
        &self,
        scope: TaskScope,
    ) -> TaskRepositoryResult<Vec<PriorityCount>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let priorities = [
            TaskPriority::Low,
            TaskPriority::Medium,
            TaskPriority::High,
            TaskPriority::Urgent,
        ];
        let mut counts = Vec::new();
        for priority in priorities {
            let tally = tally_matching(&state, |task| {
                matches_scope(task, scope) && task.priority() == priority
            })?;
            if tally > 0 {
                counts.push(PriorityCount { priority, tally });
            }
        }
        Ok(counts)
    }

    async fn count_overdue(
        &self,
        scope: TaskScope,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<u64> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        tally_matching(&state, |task| {
            matches_scope(task, scope) && task.is_overdue(now)
        })
    }

    async fn count_active_for_assignee(&self, assignee: UserId) -> TaskRepositoryResult<u64> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        tally_matching(&state, |task| {
            task.assignee() == assignee
                && matches!(task.status(), TaskStatus::Pending | TaskStatus::InProgress)
        })
    }
}

#[async_trait]
impl CommentRepository for InMemoryTaskStore {
    async fn store(&self, comment: &TaskComment) -> CommentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CommentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.comments.contains_key(&comment.id()) {
            return Err(CommentRepositoryError::DuplicateComment(comment.id()));
        }
        if !state.tasks.contains_key(&comment.task_id()) {
            return Err(CommentRepositoryError::MissingTask(comment.task_id()));
        }
        state.comments.insert(comment.id(), comment.clone());
        Ok(())
    }

    async fn list_for_task(&self, task_id: TaskId) -> CommentRepositoryResult<Vec<TaskComment>> {
        let state = self.state.read().map_err(|err| {
            CommentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut comments: Vec<TaskComment> = state
            .comments
            .values()
            .filter(|comment| comment.task_id() == task_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(comments)
    }
}
