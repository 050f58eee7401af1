//! Diesel row models for task and comment persistence.

use super::schema::{task_comments, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Task title.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub title: String,
    /// Task description.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub description: String,
    /// Lifecycle status token.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Priority token.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub priority: String,
    /// Assignee identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub assigned_to: uuid::Uuid,
    /// Creator identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub created_by: uuid::Uuid,
    /// Deadline for the work.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub due_date: DateTime<Utc>,
    /// Effort estimate in hours, when recorded.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Double>)]
    pub estimated_hours: Option<f64>,
    /// Free-form notes, when recorded.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub notes: Option<String>,
    /// Completion timestamp, set exactly while the task is completed.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Timestamptz>)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert and whole-row update model for task records.
///
/// Optional columns are written as NULL when absent so updates replace
/// the stored row rather than merging into it.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status token.
    pub status: String,
    /// Priority token.
    pub priority: String,
    /// Assignee identifier.
    pub assigned_to: uuid::Uuid,
    /// Creator identifier.
    pub created_by: uuid::Uuid,
    /// Deadline for the work.
    pub due_date: DateTime<Utc>,
    /// Effort estimate in hours, when recorded.
    pub estimated_hours: Option<f64>,
    /// Free-form notes, when recorded.
    pub notes: Option<String>,
    /// Completion timestamp, set exactly while the task is completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for comment records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = task_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    /// Comment identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Owning task identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub task_id: uuid::Uuid,
    /// Author identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub author_id: uuid::Uuid,
    /// Comment body.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub body: String,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
}

/// Insert model for comment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_comments)]
pub struct NewCommentRow {
    /// Comment identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Author identifier.
    pub author_id: uuid::Uuid,
    /// Comment body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Grouped tally row keyed by status token.
#[derive(Debug, QueryableByName)]
pub struct StatusCountRow {
    /// Status token for the group.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Number of tasks in the group.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub tally: i64,
}

/// Grouped tally row keyed by priority token.
#[derive(Debug, QueryableByName)]
pub struct PriorityCountRow {
    /// Priority token for the group.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub priority: String,
    /// Number of tasks in the group.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub tally: i64,
}
