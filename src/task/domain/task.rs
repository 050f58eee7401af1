//! Task aggregate root and lifecycle bookkeeping.

use super::{TaskDomainError, TaskId, TaskPriority, TaskStatus};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated field values for creating a task.
///
/// Values are expected to have passed the validation layer already; the
/// aggregate applies no further normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskData {
    /// Validated task title.
    pub title: String,
    /// Validated task description.
    pub description: String,
    /// Initial lifecycle status.
    pub status: TaskStatus,
    /// Priority of the work.
    pub priority: TaskPriority,
    /// User the work is assigned to.
    pub assignee: UserId,
    /// User who created the task.
    pub creator: UserId,
    /// Deadline for the work.
    pub due_date: DateTime<Utc>,
    /// Estimated effort in hours, if supplied.
    pub estimated_hours: Option<f64>,
    /// Free-form notes, if supplied.
    pub notes: Option<String>,
}

/// Field changes applied to an existing task.
///
/// `None` leaves a field untouched. The nested options on
/// `estimated_hours` and `notes` distinguish "leave alone" from "clear".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskUpdate {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Requested status, validated against the transition table.
    pub status: Option<TaskStatus>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Replacement assignee.
    pub assignee: Option<UserId>,
    /// Replacement deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Replacement or cleared effort estimate.
    pub estimated_hours: Option<Option<f64>>,
    /// Replacement or cleared notes.
    pub notes: Option<Option<String>>,
}

impl TaskUpdate {
    /// Returns whether the update changes nothing beyond the status field.
    #[must_use]
    pub const fn is_status_only(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.due_date.is_none()
            && self.estimated_hours.is_none()
            && self.notes.is_none()
    }

    /// Returns whether the update changes nothing at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_status_only() && self.status.is_none()
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    assignee: UserId,
    creator: UserId,
    due_date: DateTime<Utc>,
    estimated_hours: Option<f64>,
    notes: Option<String>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted assignee reference.
    pub assignee: UserId,
    /// Persisted creator reference.
    pub creator: UserId,
    /// Persisted deadline.
    pub due_date: DateTime<Utc>,
    /// Persisted effort estimate, if any.
    pub estimated_hours: Option<f64>,
    /// Persisted notes, if any.
    pub notes: Option<String>,
    /// Persisted completion timestamp, non-null exactly when the status is
    /// completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task from validated field values.
    #[must_use]
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            assignee: data.assignee,
            creator: data.creator,
            due_date: data.due_date,
            estimated_hours: data.estimated_hours,
            notes: data.notes,
            completed_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            assignee: data.assignee,
            creator: data.creator,
            due_date: data.due_date,
            estimated_hours: data.estimated_hours,
            notes: data.notes,
            completed_at: data.completed_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the user the work is assigned to.
    #[must_use]
    pub const fn assignee(&self) -> UserId {
        self.assignee
    }

    /// Returns the user who created the task.
    #[must_use]
    pub const fn creator(&self) -> UserId {
        self.creator
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the effort estimate in hours, if any.
    #[must_use]
    pub const fn estimated_hours(&self) -> Option<f64> {
        self.estimated_hours
    }

    /// Returns the free-form notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the completion timestamp, non-null exactly when the status
    /// is completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the deadline has passed.
    ///
    /// Completed tasks are never overdue, whatever their deadline.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if self.status == TaskStatus::Completed {
            return false;
        }
        self.due_date < now
    }

    /// Returns the number of whole days until the deadline.
    ///
    /// Returns zero for completed tasks and for deadlines already passed.
    #[must_use]
    pub fn days_until_due(&self, now: DateTime<Utc>) -> i64 {
        if self.status == TaskStatus::Completed {
            return 0;
        }
        (self.due_date - now).num_days().max(0)
    }

    /// Returns the presentation colour token for the priority.
    #[must_use]
    pub const fn priority_color(&self) -> &'static str {
        self.priority.color_token()
    }

    /// Returns the presentation colour token for the status.
    #[must_use]
    pub const fn status_color(&self) -> &'static str {
        self.status.color_token()
    }

    /// Moves the task to a new status.
    ///
    /// Entering completed records the completion instant; every other
    /// status clears it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the change
    /// is outside the transition table, or
    /// [`TaskDomainError::RestrictedStatusTransition`] when a non-manager
    /// tries to return started work to pending.
    pub fn transition_status(
        &mut self,
        to: TaskStatus,
        actor_is_manager: bool,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.check_transition(to, actor_is_manager)?;
        self.apply_status(to, clock);
        self.touch(clock);
        Ok(())
    }

    /// Applies a validated field update.
    ///
    /// A status equal to the current one is treated as unchanged. When the
    /// status does change, transition legality is checked before any field
    /// is written, so a refused update leaves the task untouched.
    ///
    /// # Errors
    ///
    /// Returns the same transition errors as
    /// [`transition_status`](Self::transition_status).
    pub fn apply_update(
        &mut self,
        update: TaskUpdate,
        actor_is_manager: bool,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let status_change = update.status.filter(|next| *next != self.status);
        if let Some(next) = status_change {
            self.check_transition(next, actor_is_manager)?;
        }

        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(assignee) = update.assignee {
            self.assignee = assignee;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(estimated_hours) = update.estimated_hours {
            self.estimated_hours = estimated_hours;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(next) = status_change {
            self.apply_status(next, clock);
        }
        self.touch(clock);
        Ok(())
    }

    fn check_transition(
        &self,
        to: TaskStatus,
        actor_is_manager: bool,
    ) -> Result<(), TaskDomainError> {
        let from = self.status;
        if !from.can_transition_to(to) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from,
                to,
            });
        }
        let reverts_started_work = from == TaskStatus::InProgress && to == TaskStatus::Pending;
        if reverts_started_work && !actor_is_manager {
            return Err(TaskDomainError::RestrictedStatusTransition {
                task_id: self.id,
                from,
                to,
            });
        }
        Ok(())
    }

    fn apply_status(&mut self, to: TaskStatus, clock: &impl Clock) {
        if to == TaskStatus::Completed {
            if self.completed_at.is_none() {
                self.completed_at = Some(clock.utc());
            }
        } else {
            self.completed_at = None;
        }
        self.status = to;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
