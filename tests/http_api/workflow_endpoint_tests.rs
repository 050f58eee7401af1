//! Status moves, comment threads and statistics over the wire.

use crate::http_api::helpers::{api, get, post_json};
use actix_web::{http::StatusCode, test};
use eyre::{bail, ensure};
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

/// The assignee walks their work through the lifecycle; the legacy status
/// key is still understood.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignees_move_their_work_through_statuses() -> eyre::Result<()> {
    let api = api().await?;
    let service = test::init_service(api.app()).await;
    let task = api
        .seed_task(&api.assignee, "Audit the vendor contracts")
        .await?;
    let uri = format!("/tasks/{}/update-status", task.id());

    let started: serde_json::Value = test::call_and_read_body_json(
        &service,
        post_json(&uri, &api.assignee, json!({ "new_status": "in_progress" })).to_request(),
    )
    .await;
    assert_eq!(started, json!({ "success": true, "new_status": "in_progress" }));

    let finished: serde_json::Value = test::call_and_read_body_json(
        &service,
        post_json(&uri, &api.assignee, json!({ "status": "completed" })).to_request(),
    )
    .await;
    assert_eq!(finished, json!({ "success": true, "new_status": "completed" }));

    let detail: serde_json::Value = test::call_and_read_body_json(
        &service,
        get(&format!("/tasks/{}", task.id()), &api.assignee).to_request(),
    )
    .await;
    assert_eq!(detail["task"]["status"], "completed");
    ensure!(
        detail["task"]["completed_at"].is_string(),
        "finished work must carry a completion instant: {detail}"
    );
    Ok(())
}

/// A move the lifecycle table does not allow comes back attributed to
/// the status field.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn illegal_moves_are_attributed_to_the_status_field() -> eyre::Result<()> {
    let api = api().await?;
    let service = test::init_service(api.app()).await;
    let task = api
        .seed_task(&api.assignee, "Audit the vendor contracts")
        .await?;

    let response = test::call_service(
        &service,
        post_json(
            &format!("/tasks/{}/update-status", task.id()),
            &api.assignee,
            json!({ "status": "completed" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(
        body["fields"]["status"][0],
        "Cannot change status from pending to completed"
    );
    Ok(())
}

/// Pulling started work back to pending is a manager move.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rewinding_started_work_needs_a_manager() -> eyre::Result<()> {
    let api = api().await?;
    let service = test::init_service(api.app()).await;
    let task = api
        .seed_task(&api.assignee, "Audit the vendor contracts")
        .await?;
    let uri = format!("/tasks/{}/update-status", task.id());

    let started = test::call_service(
        &service,
        post_json(&uri, &api.assignee, json!({ "status": "in_progress" })).to_request(),
    )
    .await;
    assert_eq!(started.status(), StatusCode::OK);

    let refused = test::call_service(
        &service,
        post_json(&uri, &api.assignee, json!({ "status": "pending" })).to_request(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let rewound: serde_json::Value = test::call_and_read_body_json(
        &service,
        post_json(&uri, &api.manager, json!({ "status": "pending" })).to_request(),
    )
    .await;
    assert_eq!(rewound, json!({ "success": true, "new_status": "pending" }));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_cannot_move_work() -> eyre::Result<()> {
    let api = api().await?;
    let service = test::init_service(api.app()).await;
    let task = api
        .seed_task(&api.assignee, "Audit the vendor contracts")
        .await?;

    let response = test::call_service(
        &service,
        post_json(
            &format!("/tasks/{}/update-status", task.id()),
            &api.outsider,
            json!({ "status": "in_progress" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(
        body["error"],
        "only the assignee or a manager may change task status"
    );
    Ok(())
}

/// Participants build the thread through the comment endpoint and read it
/// back from the detail view.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn participants_build_the_thread_over_the_wire() -> eyre::Result<()> {
    let api = api().await?;
    let service = test::init_service(api.app()).await;
    let task = api
        .seed_task(&api.assignee, "Audit the vendor contracts")
        .await?;
    let uri = format!("/tasks/{}", task.id());

    let posted: serde_json::Value = test::call_and_read_body_json(
        &service,
        post_json(
            &uri,
            &api.manager,
            json!({ "body": "  Start with the oldest renewal.  " }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(posted["body"], "Start with the oldest renewal.");
    assert_eq!(posted["author"], json!(api.manager.id()));
    assert_eq!(posted["task_id"], json!(task.id()));

    let reply = test::call_service(
        &service,
        post_json(
            &uri,
            &api.assignee,
            json!({ "body": "Two renewals flagged already." }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(reply.status(), StatusCode::CREATED);

    let detail: serde_json::Value =
        test::call_and_read_body_json(&service, get(&uri, &api.manager).to_request()).await;
    let Some(thread) = detail["comments"].as_array() else {
        bail!("detail view did not carry a thread: {detail}");
    };
    assert_eq!(thread.len(), 2);
    let bodies: Vec<&str> = thread
        .iter()
        .filter_map(|comment| comment["body"].as_str())
        .collect();
    ensure!(
        bodies.contains(&"Two renewals flagged already."),
        "thread is missing the reply: {bodies:?}"
    );
    Ok(())
}

/// Comment submissions meet the same refusals the service layer hands out.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_rules_carry_through_the_wire() -> eyre::Result<()> {
    let api = api().await?;
    let service = test::init_service(api.app()).await;
    let task = api
        .seed_task(&api.assignee, "Audit the vendor contracts")
        .await?;
    let uri = format!("/tasks/{}", task.id());

    let short = test::call_service(
        &service,
        post_json(&uri, &api.assignee, json!({ "body": "Hm." })).to_request(),
    )
    .await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    let short_body: serde_json::Value = test::read_body_json(short).await;
    assert_eq!(
        short_body["fields"]["body"][0],
        "comment must be between 5 and 1000 characters"
    );

    let refused = test::call_service(
        &service,
        post_json(&uri, &api.outsider, json!({ "body": "Let me weigh in here." })).to_request(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let ghost = Uuid::new_v4();
    let missing = test::call_service(
        &service,
        post_json(
            &format!("/tasks/{ghost}"),
            &api.manager,
            json!({ "body": "Anyone following this up?" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    Ok(())
}

/// The statistics endpoint renders the caller's dashboard tallies.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn statistics_render_the_callers_view() -> eyre::Result<()> {
    let api = api().await?;
    let service = test::init_service(api.app()).await;
    let task = api
        .seed_task(&api.assignee, "Audit the vendor contracts")
        .await?;
    api.seed_task(&api.outsider, "Renew the storage leases")
        .await?;

    let started = test::call_service(
        &service,
        post_json(
            &format!("/tasks/{}/update-status", task.id()),
            &api.assignee,
            json!({ "status": "in_progress" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(started.status(), StatusCode::OK);

    let everything: serde_json::Value =
        test::call_and_read_body_json(&service, get("/tasks/api/stats", &api.manager).to_request())
            .await;
    assert_eq!(
        everything,
        json!({
            "total": 2,
            "pending": 1,
            "in_progress": 1,
            "completed": 0,
            "cancelled": 0,
            "overdue": 0,
            "priority": { "low": 0, "medium": 2, "high": 0, "urgent": 0 },
        })
    );

    let own: serde_json::Value = test::call_and_read_body_json(
        &service,
        get("/tasks/api/stats", &api.assignee).to_request(),
    )
    .await;
    assert_eq!(own["total"], 1);
    assert_eq!(own["in_progress"], 1);
    Ok(())
}
