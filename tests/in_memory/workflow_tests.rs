//! Assignment lifecycle scenarios over the full service stack.
//!
//! Every actor here is provisioned through the provisioning service, so
//! the scenarios exercise the same account records production requests
//! are authorized against.

use crate::in_memory::helpers::{create_assigned_task, days_from_now, workspace};
use eyre::{bail, ensure};
use gantt::task::{
    domain::{PermissionError, TaskDomainError, TaskPriority, TaskStatus},
    services::{
        PriorityBreakdown, TaskListRequest, TaskStatistics, TaskWorkflowError, UpdateTaskRequest,
    },
};
use rstest::rstest;

/// Walks one assignment from creation through completion to removal,
/// checking the thread and the dashboard tallies along the way.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn an_assignment_runs_from_creation_to_removal() -> eyre::Result<()> {
    let ws = workspace().await?;
    let task = create_assigned_task(&ws, "Prepare the quarterly review").await?;
    assert_eq!(task.status(), TaskStatus::Pending);
    assert_eq!(task.creator(), ws.manager.id());
    assert_eq!(task.assignee(), ws.assignee.id());
    ensure!(
        task.completed_at().is_none(),
        "fresh work must not carry a completion instant"
    );

    let started = ws
        .lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::InProgress)
        .await?;
    assert_eq!(started.status(), TaskStatus::InProgress);
    ensure!(
        started.completed_at().is_none(),
        "started work must not carry a completion instant"
    );

    ws.comments
        .add_comment(
            ws.assignee.id(),
            task.id(),
            "Draft is up, review when convenient.",
        )
        .await?;

    let done = ws
        .lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::Completed)
        .await?;
    assert_eq!(done.status(), TaskStatus::Completed);
    ensure!(
        done.completed_at().is_some(),
        "completed work must record when it finished"
    );

    let expected = TaskStatistics {
        total: 1,
        completed: 1,
        priority: PriorityBreakdown {
            medium: 1,
            ..PriorityBreakdown::default()
        },
        ..TaskStatistics::default()
    };
    assert_eq!(ws.stats.statistics_for(ws.manager.id()).await?, expected);

    ws.lifecycle
        .delete_task(ws.manager.id(), task.id())
        .await?;

    let listing = ws
        .lifecycle
        .list_tasks(TaskListRequest::new(ws.manager.id()))
        .await?;
    ensure!(listing.is_empty(), "removed work must leave the listing");
    let thread = ws.comments.list_comments(ws.manager.id(), task.id()).await;
    let Err(TaskWorkflowError::TaskNotFound(missing)) = thread else {
        bail!("expected the thread to go with the task, got {thread:?}");
    };
    assert_eq!(missing, task.id());
    assert_eq!(
        ws.stats.statistics_for(ws.manager.id()).await?,
        TaskStatistics::default()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn started_work_returns_to_pending_only_through_a_manager() -> eyre::Result<()> {
    let ws = workspace().await?;
    let task = create_assigned_task(&ws, "Rework the onboarding checklist").await?;
    ws.lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::InProgress)
        .await?;

    let result = ws
        .lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::Pending)
        .await;
    let Err(TaskWorkflowError::Domain(TaskDomainError::RestrictedStatusTransition {
        from,
        to,
        ..
    })) = result
    else {
        bail!("expected the rewind to stay with managers, got {result:?}");
    };
    assert_eq!((from, to), (TaskStatus::InProgress, TaskStatus::Pending));

    let rewound = ws
        .lifecycle
        .update_status(ws.manager.id(), task.id(), TaskStatus::Pending)
        .await?;
    assert_eq!(rewound.status(), TaskStatus::Pending);
    ensure!(
        rewound.completed_at().is_none(),
        "rewound work must not carry a completion instant"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_completed_assignment_is_frozen() -> eyre::Result<()> {
    let ws = workspace().await?;
    let task = create_assigned_task(&ws, "Close out the supplier audit").await?;
    ws.lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::InProgress)
        .await?;
    ws.lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::Completed)
        .await?;

    for actor in [ws.manager.id(), ws.assignee.id()] {
        for next in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Cancelled,
        ] {
            let result = ws.lifecycle.update_status(actor, task.id(), next).await;
            let Err(TaskWorkflowError::Domain(TaskDomainError::InvalidStatusTransition {
                from,
                ..
            })) = result
            else {
                bail!("expected completed work to be frozen, got {result:?}");
            };
            assert_eq!(from, TaskStatus::Completed);
        }
    }

    let fetched = ws.lifecycle.get_task(ws.manager.id(), task.id()).await?;
    assert_eq!(fetched.status(), TaskStatus::Completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_work_can_be_picked_back_up() -> eyre::Result<()> {
    let ws = workspace().await?;
    let task = create_assigned_task(&ws, "Draft the winter rota").await?;
    let shelved = ws
        .lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::Cancelled)
        .await?;
    assert_eq!(shelved.status(), TaskStatus::Cancelled);

    let revived = ws
        .lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::Pending)
        .await?;
    assert_eq!(revived.status(), TaskStatus::Pending);

    ws.lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::InProgress)
        .await?;
    let done = ws
        .lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::Completed)
        .await?;
    assert_eq!(done.status(), TaskStatus::Completed);
    Ok(())
}

/// Reassignment is a manager edit, and it moves task access with it: the
/// new assignee can see the task, the previous one no longer can.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_moves_access_to_the_new_assignee() -> eyre::Result<()> {
    let ws = workspace().await?;
    let task = create_assigned_task(&ws, "Tidy the asset register").await?;

    let result = ws
        .lifecycle
        .update_task(
            UpdateTaskRequest::new(ws.assignee.id(), task.id())
                .with_title("Tidy and relabel the asset register"),
        )
        .await;
    let Err(TaskWorkflowError::Forbidden(refusal)) = result else {
        bail!("expected field edits to stay with managers, got {result:?}");
    };
    assert_eq!(refusal, PermissionError::EditRequiresManager);
    let untouched = ws.lifecycle.get_task(ws.assignee.id(), task.id()).await?;
    assert_eq!(untouched, task);

    let updated = ws
        .lifecycle
        .update_task(
            UpdateTaskRequest::new(ws.manager.id(), task.id())
                .with_title("Tidy and relabel the asset register")
                .with_priority(TaskPriority::High)
                .with_assignee(ws.outsider.id())
                .with_due_date(days_from_now(14)),
        )
        .await?;
    assert_eq!(updated.title(), "Tidy and relabel the asset register");
    assert_eq!(updated.priority(), TaskPriority::High);
    assert_eq!(updated.assignee(), ws.outsider.id());

    ws.lifecycle.get_task(ws.outsider.id(), task.id()).await?;
    let barred = ws.lifecycle.get_task(ws.assignee.id(), task.id()).await;
    ensure!(
        matches!(barred, Err(TaskWorkflowError::Forbidden(_))),
        "the previous assignee must lose access"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uninvolved_employees_are_shut_out() -> eyre::Result<()> {
    let ws = workspace().await?;
    let task = create_assigned_task(&ws, "Refresh the escalation contacts").await?;

    let seen = ws.lifecycle.get_task(ws.outsider.id(), task.id()).await;
    let Err(TaskWorkflowError::Forbidden(view_refusal)) = seen else {
        bail!("expected the task to stay hidden, got {seen:?}");
    };
    assert_eq!(view_refusal, PermissionError::AccessDenied);

    let moved = ws
        .lifecycle
        .update_status(ws.outsider.id(), task.id(), TaskStatus::InProgress)
        .await;
    let Err(TaskWorkflowError::Forbidden(move_refusal)) = moved else {
        bail!("expected the status to be out of reach, got {moved:?}");
    };
    assert_eq!(move_refusal, PermissionError::StatusChangeDenied);

    let removed = ws.lifecycle.delete_task(ws.outsider.id(), task.id()).await;
    let Err(TaskWorkflowError::Forbidden(delete_refusal)) = removed else {
        bail!("expected removal to stay with managers, got {removed:?}");
    };
    assert_eq!(delete_refusal, PermissionError::DeleteRequiresManager);

    let listing = ws
        .lifecycle
        .list_tasks(TaskListRequest::new(ws.outsider.id()))
        .await?;
    ensure!(
        listing.is_empty(),
        "uninvolved employees must see an empty listing"
    );
    Ok(())
}
