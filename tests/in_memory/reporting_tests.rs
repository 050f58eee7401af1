//! Aggregate statistics: role scoping and overdue tallies.

use crate::in_memory::helpers::{create_assigned_task, days_from_now, workspace};
use chrono::{Duration, Utc};
use eyre::bail;
use gantt::identity::domain::UserId;
use gantt::task::{
    domain::{NewTaskData, PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus},
    ports::TaskRepository,
    services::{CreateTaskRequest, PriorityBreakdown, TaskStatistics, TaskWorkflowError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn statistics_follow_role_visibility() -> eyre::Result<()> {
    let ws = workspace().await?;
    create_assigned_task(&ws, "Prepare the quarterly review").await?;

    let hardened = ws
        .lifecycle
        .create_task(
            CreateTaskRequest::new(
                ws.manager.id(),
                ws.assignee.id(),
                "Harden the backup jobs",
                "Move the nightly dumps onto the replicated volume.",
            )
            .with_priority(TaskPriority::High),
        )
        .await?;
    ws.lifecycle
        .update_status(ws.assignee.id(), hardened.id(), TaskStatus::InProgress)
        .await?;
    ws.lifecycle
        .update_status(ws.assignee.id(), hardened.id(), TaskStatus::Completed)
        .await?;

    let survey = ws
        .lifecycle
        .create_task(
            CreateTaskRequest::new(
                ws.manager.id(),
                ws.outsider.id(),
                "Survey the branch offices",
                "Ask each office what equipment they are short of.",
            )
            .with_priority(TaskPriority::Low),
        )
        .await?;
    ws.lifecycle
        .update_status(ws.outsider.id(), survey.id(), TaskStatus::InProgress)
        .await?;

    let rush = ws
        .lifecycle
        .create_task(
            CreateTaskRequest::new(
                ws.manager.id(),
                ws.outsider.id(),
                "Patch the exposed gateway",
                "Apply the vendor hotfix before the weekend change freeze.",
            )
            .with_priority(TaskPriority::Urgent)
            .with_due_date(days_from_now(2)),
        )
        .await?;
    ws.lifecycle
        .update_status(ws.outsider.id(), rush.id(), TaskStatus::Cancelled)
        .await?;

    assert_eq!(
        ws.stats.statistics_for(ws.manager.id()).await?,
        TaskStatistics {
            total: 4,
            pending: 1,
            in_progress: 1,
            completed: 1,
            cancelled: 1,
            overdue: 0,
            priority: PriorityBreakdown {
                low: 1,
                medium: 1,
                high: 1,
                urgent: 1,
            },
        }
    );

    assert_eq!(
        ws.stats.statistics_for(ws.assignee.id()).await?,
        TaskStatistics {
            total: 2,
            pending: 1,
            completed: 1,
            priority: PriorityBreakdown {
                medium: 1,
                high: 1,
                ..PriorityBreakdown::default()
            },
            ..TaskStatistics::default()
        }
    );

    assert_eq!(
        ws.stats.statistics_for(ws.outsider.id()).await?,
        TaskStatistics {
            total: 2,
            in_progress: 1,
            cancelled: 1,
            priority: PriorityBreakdown {
                low: 1,
                urgent: 1,
                ..PriorityBreakdown::default()
            },
            ..TaskStatistics::default()
        }
    );
    Ok(())
}

/// Deadline slippage counts started and cancelled work, but a finished
/// task is never overdue however late it ran.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_counts_skip_completed_work() -> eyre::Result<()> {
    let ws = workspace().await?;
    let past = Utc::now() - Duration::days(2);

    let slipped = Task::new(
        NewTaskData {
            title: "Replace the staging certificates".to_owned(),
            description: "Rotate the expired staging TLS certificates.".to_owned(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::Medium,
            assignee: ws.assignee.id(),
            creator: ws.manager.id(),
            due_date: past,
            estimated_hours: None,
            notes: None,
        },
        &*ws.clock,
    );
    TaskRepository::store(ws.tasks.as_ref(), &slipped).await?;

    let shelved = Task::new(
        NewTaskData {
            title: "Print the office floor plans".to_owned(),
            description: "Superseded by the office move, kept for the record.".to_owned(),
            status: TaskStatus::Cancelled,
            priority: TaskPriority::Low,
            assignee: ws.outsider.id(),
            creator: ws.manager.id(),
            due_date: past,
            estimated_hours: None,
            notes: None,
        },
        &*ws.clock,
    );
    TaskRepository::store(ws.tasks.as_ref(), &shelved).await?;

    let archived = Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: "Archive the previous sprint board".to_owned(),
        description: "Export the finished sprint and archive the board.".to_owned(),
        status: TaskStatus::Completed,
        priority: TaskPriority::High,
        assignee: ws.assignee.id(),
        creator: ws.manager.id(),
        due_date: past,
        estimated_hours: Some(6.0),
        notes: None,
        completed_at: Some(past + Duration::hours(12)),
        created_at: past - Duration::days(5),
        updated_at: past + Duration::hours(12),
    });
    TaskRepository::store(ws.tasks.as_ref(), &archived).await?;

    assert_eq!(
        ws.stats.statistics_for(ws.manager.id()).await?,
        TaskStatistics {
            total: 3,
            in_progress: 1,
            completed: 1,
            cancelled: 1,
            overdue: 2,
            priority: PriorityBreakdown {
                low: 1,
                medium: 1,
                high: 1,
                ..PriorityBreakdown::default()
            },
            ..TaskStatistics::default()
        }
    );

    assert_eq!(
        ws.stats.statistics_for(ws.assignee.id()).await?,
        TaskStatistics {
            total: 2,
            in_progress: 1,
            completed: 1,
            overdue: 1,
            priority: PriorityBreakdown {
                medium: 1,
                high: 1,
                ..PriorityBreakdown::default()
            },
            ..TaskStatistics::default()
        }
    );

    assert_eq!(
        ws.stats.statistics_for(ws.outsider.id()).await?,
        TaskStatistics {
            total: 1,
            cancelled: 1,
            overdue: 1,
            priority: PriorityBreakdown {
                low: 1,
                ..PriorityBreakdown::default()
            },
            ..TaskStatistics::default()
        }
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn an_empty_tracker_reports_zeroes() -> eyre::Result<()> {
    let ws = workspace().await?;

    assert_eq!(
        ws.stats.statistics_for(ws.manager.id()).await?,
        TaskStatistics::default()
    );
    assert_eq!(
        ws.stats.statistics_for(ws.assignee.id()).await?,
        TaskStatistics::default()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn statistics_require_a_known_viewer() -> eyre::Result<()> {
    let ws = workspace().await?;
    let stranger = UserId::new();

    let result = ws.stats.statistics_for(stranger).await;

    let Err(TaskWorkflowError::UnknownActor(reported)) = result else {
        bail!("expected the unknown viewer to be refused, got {result:?}");
    };
    assert_eq!(reported, stranger);
    Ok(())
}
