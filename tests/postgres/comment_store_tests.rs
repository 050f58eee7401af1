//! Comment persistence and thread listing against a real `PostgreSQL`
//! database.

use crate::postgres::helpers::{comment_record, harness, task_record, user_record};
use gantt::identity::domain::Role;
use gantt::task::domain::TaskId;
use gantt::task::ports::{CommentRepository, CommentRepositoryError};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn threads_come_back_newest_first() -> eyre::Result<()> {
    let Some(harness) = harness().await? else {
        return Ok(());
    };

    let task = harness
        .seed_task(task_record(0, &harness.assignee, &harness.manager))
        .await?;
    let opener = comment_record(
        1,
        task.id(),
        &harness.assignee,
        "Start with the oldest renewal.",
    );
    let reply = comment_record(2, task.id(), &harness.manager, "Agreed, queue it for Monday.");
    harness.tasks.store(&opener).await?;
    harness.tasks.store(&reply).await?;

    let thread = harness.tasks.list_for_task(task.id()).await?;
    assert_eq!(thread, vec![reply, opener]);

    let untouched = harness
        .seed_task(task_record(3, &harness.assignee, &harness.manager))
        .await?;
    assert!(harness.tasks.list_for_task(untouched.id()).await?.is_empty());

    harness.cleanup().await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_need_an_existing_task() -> eyre::Result<()> {
    let Some(harness) = harness().await? else {
        return Ok(());
    };

    let stray = comment_record(0, TaskId::new(), &harness.assignee, "Filed against nothing.");
    let err = harness
        .tasks
        .store(&stray)
        .await
        .expect_err("comments on missing tasks should be rejected");
    assert!(matches!(err, CommentRepositoryError::MissingTask(id) if id == stray.task_id()));

    harness.cleanup().await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reinserting_a_comment_is_a_duplicate() -> eyre::Result<()> {
    let Some(harness) = harness().await? else {
        return Ok(());
    };

    let task = harness
        .seed_task(task_record(0, &harness.assignee, &harness.manager))
        .await?;
    let comment = comment_record(
        1,
        task.id(),
        &harness.manager,
        "Keep the original quote attached.",
    );
    harness.tasks.store(&comment).await?;

    let err = harness
        .tasks
        .store(&comment)
        .await
        .expect_err("reinserting a comment should be rejected");
    assert!(matches!(err, CommentRepositoryError::DuplicateComment(id) if id == comment.id()));

    harness.cleanup().await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_authors_surface_as_persistence_errors() -> eyre::Result<()> {
    let Some(harness) = harness().await? else {
        return Ok(());
    };

    let task = harness
        .seed_task(task_record(0, &harness.assignee, &harness.manager))
        .await?;
    let ghost = user_record("walter", Role::Employee)?;
    let unattributed = comment_record(1, task.id(), &ghost, "From an account never stored.");

    let err = harness
        .tasks
        .store(&unattributed)
        .await
        .expect_err("comments by unknown authors should be rejected");
    assert!(matches!(err, CommentRepositoryError::Persistence(_)));

    harness.cleanup().await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn threads_go_with_their_task() -> eyre::Result<()> {
    let Some(harness) = harness().await? else {
        return Ok(());
    };

    let task = harness
        .seed_task(task_record(0, &harness.assignee, &harness.manager))
        .await?;
    for (slot, body) in [(1, "Opening note."), (2, "Follow-up note.")] {
        let comment = comment_record(slot, task.id(), &harness.assignee, body);
        harness.tasks.store(&comment).await?;
    }

    harness.remove_task(task.id()).await?;
    assert!(harness.tasks.list_for_task(task.id()).await?.is_empty());

    harness.cleanup().await
}
