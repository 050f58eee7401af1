//! Shared error type for task workflow services.

use crate::identity::{domain::UserId, ports::UserRepositoryError};
use crate::task::{
    domain::{PermissionError, TaskDomainError, TaskId},
    ports::{CommentRepositoryError, TaskRepositoryError},
    validation::ValidationError,
};
use thiserror::Error;

/// Service-level errors for task workflow operations.
#[derive(Debug, Error)]
pub enum TaskWorkflowError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A domain rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The authorization policy denied the operation.
    #[error(transparent)]
    Forbidden(#[from] PermissionError),
    /// The acting user does not exist.
    #[error("acting user {0} does not exist")]
    UnknownActor(UserId),
    /// The task does not exist.
    #[error("task {0} does not exist")]
    TaskNotFound(TaskId),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Comment repository operation failed.
    #[error(transparent)]
    Comments(#[from] CommentRepositoryError),
    /// User repository operation failed.
    #[error(transparent)]
    Users(UserRepositoryError),
}

/// Result type for task workflow operations.
pub type TaskWorkflowResult<T> = Result<T, TaskWorkflowError>;
