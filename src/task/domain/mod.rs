//! Domain model for task lifecycle management.
//!
//! The task domain models the status state machine, the authorization
//! policy, task field bookkeeping and append-only comments while keeping
//! all infrastructure concerns outside of the domain boundary.

mod comment;
mod error;
mod ids;
pub mod policy;
mod status;
mod task;

pub use comment::{PersistedCommentData, TaskComment};
pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{CommentId, TaskId};
pub use policy::PermissionError;
pub use status::{TaskPriority, TaskStatus};
pub use task::{NewTaskData, PersistedTaskData, Task, TaskUpdate};
