//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod comments;
pub mod repository;

pub use comments::{CommentRepository, CommentRepositoryError, CommentRepositoryResult};
pub use repository::{
    PriorityCount, StatusCount, TaskListFilter, TaskRepository, TaskRepositoryError,
    TaskRepositoryResult, TaskScope,
};
