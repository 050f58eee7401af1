//! Service layer for aggregate task statistics.

use super::error::{TaskWorkflowError, TaskWorkflowResult};
use super::lifecycle::visibility_scope;
use crate::identity::{domain::UserId, ports::UserRepository};
use crate::task::{
    domain::{TaskPriority, TaskStatus},
    ports::{PriorityCount, StatusCount, TaskRepository},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;

/// Task tallies per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    /// Number of low-priority tasks.
    pub low: u64,
    /// Number of medium-priority tasks.
    pub medium: u64,
    /// Number of high-priority tasks.
    pub high: u64,
    /// Number of urgent tasks.
    pub urgent: u64,
}

/// Aggregate task counts visible to one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStatistics {
    /// Total number of visible tasks.
    pub total: u64,
    /// Number of pending tasks.
    pub pending: u64,
    /// Number of in-progress tasks.
    pub in_progress: u64,
    /// Number of completed tasks.
    pub completed: u64,
    /// Number of cancelled tasks.
    pub cancelled: u64,
    /// Number of non-completed tasks whose deadline has passed.
    pub overdue: u64,
    /// Tallies per priority.
    pub priority: PriorityBreakdown,
}

/// Aggregate statistics service.
///
/// Each statistics request costs one store round trip per aggregate
/// category rather than loading task rows into application memory.
#[derive(Clone)]
pub struct TaskStatsService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<T, U, C> TaskStatsService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new statistics service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            users,
            clock,
        }
    }

    /// Computes aggregate counts over the tasks visible to the actor.
    ///
    /// Managers aggregate over every task; everyone else aggregates over
    /// tasks they are assigned to or created.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::UnknownActor`] when the actor does not
    /// exist, or a repository error.
    pub async fn statistics_for(&self, actor: UserId) -> TaskWorkflowResult<TaskStatistics> {
        let acting_user = self
            .users
            .find_by_id(actor)
            .await
            .map_err(TaskWorkflowError::Users)?
            .ok_or(TaskWorkflowError::UnknownActor(actor))?;
        let scope = visibility_scope(&acting_user);

        let status_counts = self.tasks.count_by_status(scope).await?;
        let priority_counts = self.tasks.count_by_priority(scope).await?;
        let overdue = self.tasks.count_overdue(scope, self.clock.utc()).await?;

        let mut stats = TaskStatistics {
            overdue,
            ..TaskStatistics::default()
        };
        for StatusCount { status, tally } in status_counts {
            stats.total += tally;
            match status {
                TaskStatus::Pending => stats.pending = tally,
                TaskStatus::InProgress => stats.in_progress = tally,
                TaskStatus::Completed => stats.completed = tally,
                TaskStatus::Cancelled => stats.cancelled = tally,
            }
        }
        for PriorityCount { priority, tally } in priority_counts {
            match priority {
                TaskPriority::Low => stats.priority.low = tally,
                TaskPriority::Medium => stats.priority.medium = tally,
                TaskPriority::High => stats.priority.high = tally,
                TaskPriority::Urgent => stats.priority.urgent = tally,
            }
        }
        Ok(stats)
    }
}
