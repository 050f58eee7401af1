//! Service layer for task comment threads.

use super::error::{TaskWorkflowError, TaskWorkflowResult};
use crate::identity::{
    domain::{User, UserId},
    ports::UserRepository,
};
use crate::task::{
    domain::{policy, PermissionError, Task, TaskComment, TaskId},
    ports::{CommentRepository, TaskRepository},
    validation::rules,
};
use mockable::Clock;
use std::sync::Arc;

/// Task comment orchestration service.
///
/// Comments are append-only; there is no edit or removal operation, and
/// comment rows disappear only when their task is deleted.
#[derive(Clone)]
pub struct TaskCommentService<T, CO, U, C>
where
    T: TaskRepository,
    CO: CommentRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    comments: Arc<CO>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<T, CO, U, C> TaskCommentService<T, CO, U, C>
where
    T: TaskRepository,
    CO: CommentRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new comment service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, comments: Arc<CO>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            comments,
            users,
            clock,
        }
    }

    /// Appends a comment to a task the actor may view.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Forbidden`] when the actor may not view
    /// the task, [`TaskWorkflowError::Validation`] when the body is outside
    /// the accepted length, [`TaskWorkflowError::TaskNotFound`],
    /// [`TaskWorkflowError::UnknownActor`], or a repository error.
    pub async fn add_comment(
        &self,
        actor: UserId,
        task_id: TaskId,
        body: &str,
    ) -> TaskWorkflowResult<TaskComment> {
        let (acting_user, task) = self.resolve_access(actor, task_id).await?;
        let normalized = rules::validate_comment_body(body)?;
        let comment = TaskComment::new(task.id(), acting_user.id(), normalized, &*self.clock);
        self.comments.store(&comment).await?;
        Ok(comment)
    }

    /// Lists a task's comments, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Forbidden`] when the actor may not view
    /// the task, [`TaskWorkflowError::TaskNotFound`],
    /// [`TaskWorkflowError::UnknownActor`], or a repository error.
    pub async fn list_comments(
        &self,
        actor: UserId,
        task_id: TaskId,
    ) -> TaskWorkflowResult<Vec<TaskComment>> {
        let (_, task) = self.resolve_access(actor, task_id).await?;
        Ok(self.comments.list_for_task(task.id()).await?)
    }

    async fn resolve_access(
        &self,
        actor: UserId,
        task_id: TaskId,
    ) -> TaskWorkflowResult<(User, Task)> {
        let acting_user = self
            .users
            .find_by_id(actor)
            .await
            .map_err(TaskWorkflowError::Users)?
            .ok_or(TaskWorkflowError::UnknownActor(actor))?;
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskWorkflowError::TaskNotFound(task_id))?;
        if !policy::can_access_task(&acting_user, &task) {
            return Err(PermissionError::AccessDenied.into());
        }
        Ok((acting_user, task))
    }
}
