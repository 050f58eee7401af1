//! Error types for task domain transitions and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The requested status change is outside the legal transition table.
    #[error("Cannot change status from {from} to {to}")]
    InvalidStatusTransition {
        /// Task whose status change was refused.
        task_id: TaskId,
        /// Status the task currently holds.
        from: TaskStatus,
        /// Status the caller asked for.
        to: TaskStatus,
    },

    /// The status change is legal in general but reserved for managers.
    #[error("Cannot change status from {from} to {to}")]
    RestrictedStatusTransition {
        /// Task whose status change was refused.
        task_id: TaskId,
        /// Status the task currently holds.
        from: TaskStatus,
        /// Status the caller asked for.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
