//! Request and response bodies for the HTTP surface.
//!
//! The wire layer tolerates a handful of legacy input shapes — an
//! `assignee` alias for `assigned_to`, a `new_status` alias for `status`,
//! and three due-date formats — and converts everything to the canonical
//! service request types before it crosses into the core. Responses carry
//! derived presentation fields (overdue flag, colour tokens) alongside the
//! stored data so clients do not re-implement the domain rules.

use super::error::{ApiError, FieldErrors};
use crate::identity::{
    domain::{Role, User, UserId},
    services::CreateUserRequest,
};
use crate::task::{
    domain::{CommentId, Task, TaskComment, TaskId, TaskPriority, TaskStatus},
    services::{CreateTaskRequest, TaskListRequest, UpdateTaskRequest},
};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a due date from any of the accepted wire formats.
///
/// RFC 3339 values carry their own offset; the two naive formats are
/// interpreted as local time and converted to UTC, matching how the forms
/// that originally fed this API treated user input.
///
/// # Errors
///
/// Returns a field-attributed [`ApiError::Invalid`] when the value matches
/// none of the accepted formats.
pub(crate) fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(absolute) = DateTime::parse_from_rfc3339(raw) {
        return Ok(absolute.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT).map(|date| date.and_time(NaiveTime::MIN))
        })
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| {
            ApiError::Invalid(FieldErrors::single(
                "due_date",
                format!(
                    "unrecognised due date '{raw}'; use RFC 3339, \
                     'YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD'"
                ),
            ))
        })
}

pub(crate) fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    Uuid::parse_str(raw.trim())
        .map(TaskId::from_uuid)
        .map_err(|_| ApiError::Invalid(FieldErrors::single("id", "not a valid task id")))
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    Uuid::parse_str(raw.trim())
        .map(UserId::from_uuid)
        .map_err(|_| ApiError::Invalid(FieldErrors::single("id", "not a valid user id")))
}

fn parse_status(raw: &str) -> Result<TaskStatus, ApiError> {
    TaskStatus::try_from(raw)
        .map_err(|error| ApiError::Invalid(FieldErrors::single("status", error.to_string())))
}

fn parse_priority(raw: &str) -> Result<TaskPriority, ApiError> {
    TaskPriority::try_from(raw)
        .map_err(|error| ApiError::Invalid(FieldErrors::single("priority", error.to_string())))
}

fn parse_role(raw: &str) -> Result<Role, ApiError> {
    Role::try_from(raw)
        .map_err(|error| ApiError::Invalid(FieldErrors::single("role", error.to_string())))
}

/// Collapses blank optional strings to absent, the way HTML forms submit
/// untouched fields.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

/// Distinguishes an absent key from an explicit `null`: absent leaves the
/// stored value untouched, `null` clears it.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

/// Body of `POST /tasks/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskBody {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// User the work is assigned to.
    #[serde(alias = "assignee")]
    pub assigned_to: Uuid,
    /// Initial status; defaults to pending.
    pub status: Option<String>,
    /// Priority; defaults to medium.
    pub priority: Option<String>,
    /// Deadline in any accepted format; defaults to a week out.
    pub due_date: Option<String>,
    /// Effort estimate in hours.
    pub estimated_hours: Option<f64>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl CreateTaskBody {
    pub(crate) fn into_request(self, actor: UserId) -> Result<CreateTaskRequest, ApiError> {
        let mut request = CreateTaskRequest::new(
            actor,
            UserId::from_uuid(self.assigned_to),
            self.title,
            self.description,
        );
        if let Some(status) = non_blank(self.status.as_deref()) {
            request = request.with_status(parse_status(status)?);
        }
        if let Some(priority) = non_blank(self.priority.as_deref()) {
            request = request.with_priority(parse_priority(priority)?);
        }
        if let Some(due_date) = non_blank(self.due_date.as_deref()) {
            request = request.with_due_date(parse_due_date(due_date)?);
        }
        if let Some(hours) = self.estimated_hours {
            request = request.with_estimated_hours(hours);
        }
        if let Some(notes) = self.notes {
            request = request.with_notes(notes);
        }
        Ok(request)
    }
}

/// Body of `POST /tasks/{id}/edit`.
///
/// Absent fields are left untouched. For `estimated_hours` and `notes` an
/// explicit `null` clears the stored value instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskBody {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement status.
    pub status: Option<String>,
    /// Replacement priority.
    pub priority: Option<String>,
    /// Replacement assignee.
    #[serde(alias = "assignee")]
    pub assigned_to: Option<Uuid>,
    /// Replacement deadline in any accepted format.
    pub due_date: Option<String>,
    /// Replacement effort estimate; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub estimated_hours: Option<Option<f64>>,
    /// Replacement notes; `null` clears them.
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl UpdateTaskBody {
    pub(crate) fn into_request(
        self,
        actor: UserId,
        task_id: TaskId,
    ) -> Result<UpdateTaskRequest, ApiError> {
        let mut request = UpdateTaskRequest::new(actor, task_id);
        if let Some(title) = self.title {
            request = request.with_title(title);
        }
        if let Some(description) = self.description {
            request = request.with_description(description);
        }
        if let Some(status) = non_blank(self.status.as_deref()) {
            request = request.with_status(parse_status(status)?);
        }
        if let Some(priority) = non_blank(self.priority.as_deref()) {
            request = request.with_priority(parse_priority(priority)?);
        }
        if let Some(assignee) = self.assigned_to {
            request = request.with_assignee(UserId::from_uuid(assignee));
        }
        if let Some(due_date) = non_blank(self.due_date.as_deref()) {
            request = request.with_due_date(parse_due_date(due_date)?);
        }
        if let Some(hours) = self.estimated_hours {
            request = request.with_estimated_hours(hours);
        }
        if let Some(notes) = self.notes {
            request = request.with_notes(notes);
        }
        Ok(request)
    }
}

/// Body of `POST /tasks/{id}/update-status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChangeBody {
    /// Target status; the legacy `new_status` key is accepted as an alias.
    #[serde(alias = "new_status")]
    pub status: String,
}

impl StatusChangeBody {
    pub(crate) fn parse(&self) -> Result<TaskStatus, ApiError> {
        parse_status(&self.status)
    }
}

/// Body of `POST /tasks/{id}` (comment submission).
#[derive(Debug, Clone, Deserialize)]
pub struct CommentBody {
    /// Comment text.
    pub body: String,
}

/// Query parameters of `GET /tasks/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListQuery {
    /// Restrict the listing to one status.
    pub status: Option<String>,
    /// Restrict the listing to one priority.
    pub priority: Option<String>,
    /// Restrict the listing to titles or descriptions containing this term.
    pub search: Option<String>,
}

impl TaskListQuery {
    pub(crate) fn into_request(self, actor: UserId) -> Result<TaskListRequest, ApiError> {
        let mut request = TaskListRequest::new(actor);
        if let Some(status) = non_blank(self.status.as_deref()) {
            request = request.with_status(parse_status(status)?);
        }
        if let Some(priority) = non_blank(self.priority.as_deref()) {
            request = request.with_priority(parse_priority(priority)?);
        }
        if let Some(search) = non_blank(self.search.as_deref()) {
            request = request.with_search(search);
        }
        Ok(request)
    }
}

/// Body of `POST /users/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserBody {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Profile role, `manager` or `employee`.
    pub role: String,
    /// Staff flag; defaults to off.
    pub is_staff: Option<bool>,
}

impl CreateUserBody {
    pub(crate) fn into_request(self) -> Result<CreateUserRequest, ApiError> {
        let role = parse_role(&self.role)?;
        let mut request = CreateUserRequest::new(self.username, self.email, role);
        if let Some(staff) = self.is_staff {
            request = request.with_staff(staff);
        }
        Ok(request)
    }
}

/// Task representation returned by every task endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Priority of the work.
    pub priority: TaskPriority,
    /// User the work is assigned to.
    pub assigned_to: UserId,
    /// User who created the task.
    pub created_by: UserId,
    /// Deadline for the work.
    pub due_date: DateTime<Utc>,
    /// Effort estimate in hours.
    pub estimated_hours: Option<f64>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Completion timestamp, present exactly when status is completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Whether the deadline has passed without the task finishing.
    pub is_overdue: bool,
    /// Whole days until the deadline; zero once it has passed.
    pub days_until_due: i64,
    /// Presentation colour token for the status.
    pub status_color: &'static str,
    /// Presentation colour token for the priority.
    pub priority_color: &'static str,
}

impl TaskView {
    /// Renders a task with its derived presentation fields as of `now`.
    #[must_use]
    pub fn from_task(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_owned(),
            description: task.description().to_owned(),
            status: task.status(),
            priority: task.priority(),
            assigned_to: task.assignee(),
            created_by: task.creator(),
            due_date: task.due_date(),
            estimated_hours: task.estimated_hours(),
            notes: task.notes().map(str::to_owned),
            completed_at: task.completed_at(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            is_overdue: task.is_overdue(now),
            days_until_due: task.days_until_due(now),
            status_color: task.status_color(),
            priority_color: task.priority_color(),
        }
    }
}

/// Comment representation returned by the detail and comment endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    /// Comment identifier.
    pub id: CommentId,
    /// Task the comment belongs to.
    pub task_id: TaskId,
    /// User who wrote the comment.
    pub author: UserId,
    /// Comment text.
    pub body: String,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    /// Renders a stored comment.
    #[must_use]
    pub fn from_comment(comment: &TaskComment) -> Self {
        Self {
            id: comment.id(),
            task_id: comment.task_id(),
            author: comment.author(),
            body: comment.body().to_owned(),
            created_at: comment.created_at(),
        }
    }
}

/// Response body of `GET /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDetailView {
    /// The task itself.
    pub task: TaskView,
    /// Comment thread, newest first.
    pub comments: Vec<CommentView>,
}

/// User representation returned by the identity endpoints.
///
/// Credential material never appears here; the auth collaborator owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    /// User identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Profile role.
    pub role: Role,
    /// Staff flag.
    pub is_staff: bool,
    /// Group memberships.
    pub groups: Vec<String>,
    /// Provisioning timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserView {
    /// Renders a stored user account.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id(),
            username: user.username().as_str().to_owned(),
            email: user.email().as_str().to_owned(),
            role: user.role(),
            is_staff: user.is_staff(),
            groups: user.groups().to_vec(),
            created_at: user.created_at(),
        }
    }
}

/// Response body of `POST /tasks/{id}/update-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChangeResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// Status the task now holds.
    pub new_status: TaskStatus,
}

/// Acknowledgement body for operations with no resource to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    /// Always `true` on the success path.
    pub success: bool,
}
