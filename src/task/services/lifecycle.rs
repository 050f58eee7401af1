//! Service layer for task creation, retrieval, update and deletion.
//!
//! Every operation resolves the acting user first and applies the
//! authorization policy before touching task state, so permission
//! refusals always win over validation errors.

use super::error::{TaskWorkflowError, TaskWorkflowResult};
use crate::identity::{
    domain::{User, UserId},
    ports::UserRepository,
};
use crate::task::{
    domain::{policy, NewTaskData, PermissionError, Task, TaskId, TaskPriority, TaskStatus},
    ports::{TaskListFilter, TaskRepository, TaskRepositoryError, TaskScope},
    validation::{
        rules::{self, NewTaskInput, TaskUpdateInput},
        TaskValidationConfig, ValidationError,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    actor: UserId,
    assignee: UserId,
    title: String,
    description: String,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    due_date: Option<DateTime<Utc>>,
    estimated_hours: Option<f64>,
    notes: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with required task fields.
    #[must_use]
    pub fn new(
        actor: UserId,
        assignee: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            actor,
            assignee,
            title: title.into(),
            description: description.into(),
            status: None,
            priority: None,
            due_date: None,
            estimated_hours: None,
            notes: None,
        }
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the effort estimate in hours.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Sets free-form notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Request payload for updating task fields.
///
/// Absent fields are left untouched. The nested options on
/// `estimated_hours` and `notes` distinguish "leave alone" from "clear".
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTaskRequest {
    actor: UserId,
    task_id: TaskId,
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    assignee: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
    estimated_hours: Option<Option<f64>>,
    notes: Option<Option<String>>,
}

impl UpdateTaskRequest {
    /// Creates an empty update for the given task.
    #[must_use]
    pub const fn new(actor: UserId, task_id: TaskId) -> Self {
        Self {
            actor,
            task_id,
            title: None,
            description: None,
            status: None,
            priority: None,
            assignee: None,
            due_date: None,
            estimated_hours: None,
            notes: None,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Requests a status change.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Reassigns the task.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Replaces the deadline.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Replaces or clears the effort estimate.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: Option<f64>) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Replaces or clears the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    const fn is_status_only(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.due_date.is_none()
            && self.estimated_hours.is_none()
            && self.notes.is_none()
    }
}

/// Request payload for listing tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListRequest {
    actor: UserId,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    search: Option<String>,
}

impl TaskListRequest {
    /// Creates an unrestricted listing request.
    #[must_use]
    pub const fn new(actor: UserId) -> Self {
        Self {
            actor,
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

/// Task lifecycle orchestration service.
pub struct TaskLifecycleService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    clock: Arc<C>,
    config: TaskValidationConfig,
}

impl<T, U, C> Clone for TaskLifecycleService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<T, U, C> TaskLifecycleService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        users: Arc<U>,
        clock: Arc<C>,
        config: TaskValidationConfig,
    ) -> Self {
        Self {
            tasks,
            users,
            clock,
            config,
        }
    }

    /// Creates a new task.
    ///
    /// The new task starts in the requested status, or pending by default,
    /// and may never start completed. An absent due date defaults to a week
    /// out.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Forbidden`] when the actor is not a
    /// manager, [`TaskWorkflowError::Validation`] carrying every failed
    /// field rule, [`TaskWorkflowError::UnknownActor`] when the actor does
    /// not exist, or a repository error.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskWorkflowResult<Task> {
        let acting_user = self.resolve_actor(request.actor).await?;
        if !policy::can_create_task(&acting_user) {
            return Err(PermissionError::CreateRequiresManager.into());
        }

        let assignee_missing = self
            .users
            .find_by_id(request.assignee)
            .await
            .map_err(TaskWorkflowError::Users)?
            .is_none();

        let input = NewTaskInput {
            title: request.title,
            description: request.description,
            status: request.status,
            priority: request.priority,
            due_date: request.due_date,
            estimated_hours: request.estimated_hours,
            notes: request.notes,
        };
        let validated = match (
            rules::validate_new_task(input, self.clock.utc(), &self.config),
            assignee_missing,
        ) {
            (Ok(valid), false) => valid,
            (Ok(_), true) => return Err(ValidationError::UnknownAssignee.into()),
            (Err(error), false) => return Err(error.into()),
            (Err(error), true) => {
                let mut failures = error.into_vec();
                failures.push(ValidationError::UnknownAssignee);
                return Err(ValidationError::multiple(failures).into());
            }
        };

        let task = Task::new(
            NewTaskData {
                title: validated.title,
                description: validated.description,
                status: validated.status,
                priority: validated.priority,
                assignee: request.assignee,
                creator: acting_user.id(),
                due_date: validated.due_date,
                estimated_hours: validated.estimated_hours,
                notes: validated.notes,
            },
            &*self.clock,
        );
        self.tasks.store(&task).await?;
        Ok(task)
    }

    /// Lists tasks visible to the actor, newest created first.
    ///
    /// Managers see every task; everyone else sees tasks they are assigned
    /// to or created. The optional status, priority and search filters
    /// narrow the listing further.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::UnknownActor`] when the actor does not
    /// exist, or a repository error.
    pub async fn list_tasks(&self, request: TaskListRequest) -> TaskWorkflowResult<Vec<Task>> {
        let acting_user = self.resolve_actor(request.actor).await?;
        let mut filter = TaskListFilter::scoped(visibility_scope(&acting_user));
        if let Some(status) = request.status {
            filter = filter.with_status(status);
        }
        if let Some(priority) = request.priority {
            filter = filter.with_priority(priority);
        }
        if let Some(search) = request.search {
            filter = filter.with_search(search);
        }
        Ok(self.tasks.list(&filter).await?)
    }

    /// Retrieves a task the actor may view.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Forbidden`] when the actor is neither a
    /// manager nor a participant in the task, so existence is not revealed
    /// through listing refusals. Returns [`TaskWorkflowError::TaskNotFound`]
    /// when the task does not exist.
    pub async fn get_task(&self, actor: UserId, task_id: TaskId) -> TaskWorkflowResult<Task> {
        let acting_user = self.resolve_actor(actor).await?;
        let task = self.find_task(task_id).await?;
        if !policy::can_access_task(&acting_user, &task) {
            return Err(PermissionError::AccessDenied.into());
        }
        Ok(task)
    }

    /// Retrieves a task for editing.
    ///
    /// Editing is open to managers and the current assignee; a creator
    /// without either standing may view the task but not edit it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Forbidden`],
    /// [`TaskWorkflowError::TaskNotFound`] or
    /// [`TaskWorkflowError::UnknownActor`].
    pub async fn get_task_for_edit(
        &self,
        actor: UserId,
        task_id: TaskId,
    ) -> TaskWorkflowResult<Task> {
        let acting_user = self.resolve_actor(actor).await?;
        let task = self.find_task(task_id).await?;
        if !policy::can_update_status(&acting_user, &task) {
            return Err(PermissionError::StatusChangeDenied.into());
        }
        Ok(task)
    }

    /// Applies a field update to a task.
    ///
    /// Managers may change any field; the assignee may submit a
    /// status-only update. A requested status equal to the current one is
    /// treated as unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Forbidden`] when the actor lacks the
    /// required standing, [`TaskWorkflowError::Validation`] carrying every
    /// failed field rule, [`TaskWorkflowError::Domain`] when a requested
    /// status change is illegal, [`TaskWorkflowError::TaskNotFound`],
    /// [`TaskWorkflowError::UnknownActor`], or a repository error.
    pub async fn update_task(&self, request: UpdateTaskRequest) -> TaskWorkflowResult<Task> {
        let acting_user = self.resolve_actor(request.actor).await?;
        let mut task = self.find_task(request.task_id).await?;
        let manager = policy::is_manager(&acting_user);

        if !manager && !request.is_status_only() {
            return Err(PermissionError::EditRequiresManager.into());
        }
        if !policy::can_update_status(&acting_user, &task) {
            return Err(PermissionError::StatusChangeDenied.into());
        }

        let assignee_missing = match request.assignee {
            Some(assignee) => self
                .users
                .find_by_id(assignee)
                .await
                .map_err(TaskWorkflowError::Users)?
                .is_none(),
            None => false,
        };

        let input = TaskUpdateInput {
            title: request.title,
            description: request.description,
            status: request.status,
            priority: request.priority,
            due_date: request.due_date,
            estimated_hours: request.estimated_hours,
            notes: request.notes,
        };
        let update = match (
            rules::validate_task_update(input, task.priority(), self.clock.utc(), &self.config),
            assignee_missing,
        ) {
            (Ok(mut update), false) => {
                update.assignee = request.assignee;
                update
            }
            (Ok(_), true) => return Err(ValidationError::UnknownAssignee.into()),
            (Err(error), false) => return Err(error.into()),
            (Err(error), true) => {
                let mut failures = error.into_vec();
                failures.push(ValidationError::UnknownAssignee);
                return Err(ValidationError::multiple(failures).into());
            }
        };

        task.apply_update(update, manager, &*self.clock)?;
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Moves a task to a new lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Forbidden`] when the actor is neither a
    /// manager nor the assignee, [`TaskWorkflowError::Domain`] when the
    /// transition is outside the table or reserved for managers,
    /// [`TaskWorkflowError::TaskNotFound`],
    /// [`TaskWorkflowError::UnknownActor`], or a repository error.
    pub async fn update_status(
        &self,
        actor: UserId,
        task_id: TaskId,
        to: TaskStatus,
    ) -> TaskWorkflowResult<Task> {
        let acting_user = self.resolve_actor(actor).await?;
        let mut task = self.find_task(task_id).await?;
        if !policy::can_update_status(&acting_user, &task) {
            return Err(PermissionError::StatusChangeDenied.into());
        }
        task.transition_status(to, policy::is_manager(&acting_user), &*self.clock)?;
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Deletes a task together with its comments.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Forbidden`] when the actor is not a
    /// manager, [`TaskWorkflowError::TaskNotFound`],
    /// [`TaskWorkflowError::UnknownActor`], or a repository error.
    pub async fn delete_task(&self, actor: UserId, task_id: TaskId) -> TaskWorkflowResult<()> {
        let acting_user = self.resolve_actor(actor).await?;
        if !policy::can_delete_task(&acting_user) {
            return Err(PermissionError::DeleteRequiresManager.into());
        }
        match self.tasks.delete(task_id).await {
            Ok(()) => Ok(()),
            Err(TaskRepositoryError::NotFound(id)) => Err(TaskWorkflowError::TaskNotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    async fn resolve_actor(&self, actor: UserId) -> TaskWorkflowResult<User> {
        self.users
            .find_by_id(actor)
            .await
            .map_err(TaskWorkflowError::Users)?
            .ok_or(TaskWorkflowError::UnknownActor(actor))
    }

    async fn find_task(&self, id: TaskId) -> TaskWorkflowResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskWorkflowError::TaskNotFound(id))
    }
}

pub(super) fn visibility_scope(user: &User) -> TaskScope {
    if policy::is_manager(user) {
        TaskScope::All
    } else {
        TaskScope::Participant(user.id())
    }
}
