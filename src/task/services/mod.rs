//! Application services orchestrating task workflows.

mod comments;
mod error;
mod lifecycle;
mod stats;

pub use comments::TaskCommentService;
pub use error::{TaskWorkflowError, TaskWorkflowResult};
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleService, TaskListRequest, UpdateTaskRequest,
};
pub use stats::{PriorityBreakdown, TaskStatistics, TaskStatsService};
