//! Shared test helpers for in-memory store integration tests.

use chrono::{DateTime, Duration, Utc};
use gantt::identity::{
    adapters::InMemoryUserRepository,
    domain::{Role, User},
    services::{CreateUserRequest, ProvisioningConfig, ProvisioningService},
};
use gantt::task::{
    adapters::InMemoryTaskStore,
    domain::{Task, TaskPriority},
    services::{CreateTaskRequest, TaskCommentService, TaskLifecycleService, TaskStatsService},
    validation::TaskValidationConfig,
};
use mockable::DefaultClock;
use std::sync::Arc;

/// Lifecycle service wired to the shared in-memory stores.
pub type MemoryLifecycle =
    TaskLifecycleService<InMemoryTaskStore, InMemoryUserRepository, DefaultClock>;

/// Comment service wired to the shared in-memory stores.
pub type MemoryComments =
    TaskCommentService<InMemoryTaskStore, InMemoryTaskStore, InMemoryUserRepository, DefaultClock>;

/// Statistics service wired to the shared in-memory stores.
pub type MemoryStats = TaskStatsService<InMemoryTaskStore, InMemoryUserRepository, DefaultClock>;

/// Provisioning service wired to the shared in-memory stores.
pub type MemoryProvisioning =
    ProvisioningService<InMemoryUserRepository, InMemoryTaskStore, DefaultClock>;

/// Full service stack over shared in-memory stores, with a provisioned
/// cast: a manager, an employee the test work is assigned to, and a
/// second employee with no part in it.
pub struct Workspace {
    /// Shared task and comment store.
    pub tasks: Arc<InMemoryTaskStore>,
    /// Shared user store.
    pub users: Arc<InMemoryUserRepository>,
    /// Clock the services run on.
    pub clock: Arc<DefaultClock>,
    /// Task lifecycle service.
    pub lifecycle: MemoryLifecycle,
    /// Task comment service.
    pub comments: MemoryComments,
    /// Aggregate statistics service.
    pub stats: MemoryStats,
    /// Account provisioning service.
    pub provisioning: MemoryProvisioning,
    /// Provisioned manager account.
    pub manager: User,
    /// Provisioned employee the test work is assigned to.
    pub assignee: User,
    /// Provisioned employee uninvolved in the test work.
    pub outsider: User,
}

/// Builds the service stack and provisions the standing cast through the
/// provisioning service, the same path production accounts take.
///
/// # Errors
///
/// Returns an error if any account cannot be provisioned.
pub async fn workspace() -> eyre::Result<Workspace> {
    let tasks = Arc::new(InMemoryTaskStore::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(DefaultClock);

    let lifecycle = TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&users),
        Arc::clone(&clock),
        TaskValidationConfig::default(),
    );
    let comments = TaskCommentService::new(
        Arc::clone(&tasks),
        Arc::clone(&tasks),
        Arc::clone(&users),
        Arc::clone(&clock),
    );
    let stats = TaskStatsService::new(Arc::clone(&tasks), Arc::clone(&users), Arc::clone(&clock));
    let provisioning = ProvisioningService::new(
        Arc::clone(&users),
        Arc::clone(&tasks),
        Arc::clone(&clock),
        ProvisioningConfig::default(),
    );

    let manager = provisioning
        .create_user(CreateUserRequest::new(
            "margaret",
            "margaret@example.com",
            Role::Manager,
        ))
        .await?;
    let assignee = provisioning
        .create_user(CreateUserRequest::new(
            "edward",
            "edward@example.com",
            Role::Employee,
        ))
        .await?;
    let outsider = provisioning
        .create_user(CreateUserRequest::new(
            "olive",
            "olive@example.com",
            Role::Employee,
        ))
        .await?;

    Ok(Workspace {
        tasks,
        users,
        clock,
        lifecycle,
        comments,
        stats,
        provisioning,
        manager,
        assignee,
        outsider,
    })
}

/// Creates a task from the manager to the standing assignee, due a week
/// out at medium priority.
///
/// # Errors
///
/// Returns an error if the creation is refused.
pub async fn create_assigned_task(ws: &Workspace, title: &str) -> eyre::Result<Task> {
    let request = CreateTaskRequest::new(
        ws.manager.id(),
        ws.assignee.id(),
        title,
        "Collect the open items and confirm an owner for each.",
    )
    .with_priority(TaskPriority::Medium)
    .with_due_date(days_from_now(7));
    Ok(ws.lifecycle.create_task(request).await?)
}

/// Returns an instant the given number of days from now.
pub fn days_from_now(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}
