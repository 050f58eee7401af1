//! Handlers for the task endpoints.
//!
//! Each handler converts the wire payload into a service request, lets the
//! service enforce policy and validation, and renders the outcome. No
//! authorization or business rule lives here.

use super::auth::AuthenticatedUser;
use super::dto::{
    parse_task_id, CommentBody, CommentView, CreateTaskBody, StatusChangeBody,
    StatusChangeResponse, SuccessResponse, TaskDetailView, TaskListQuery, TaskView,
    UpdateTaskBody,
};
use super::error::ApiError;
use crate::identity::ports::UserRepository;
use crate::task::{
    ports::{CommentRepository, TaskRepository},
    services::{TaskCommentService, TaskLifecycleService, TaskStatsService},
};
use actix_web::{web, HttpResponse};
use mockable::Clock;

#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn list_tasks<T, U, C>(
    lifecycle: web::Data<TaskLifecycleService<T, U, C>>,
    clock: web::Data<C>,
    actor: AuthenticatedUser,
    query: web::Query<TaskListQuery>,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let request = query.into_inner().into_request(actor.id())?;
    let tasks = lifecycle.list_tasks(request).await?;
    let now = clock.utc();
    let views: Vec<TaskView> = tasks
        .iter()
        .map(|task| TaskView::from_task(task, now))
        .collect();
    Ok(HttpResponse::Ok().json(views))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn create_task<T, U, C>(
    lifecycle: web::Data<TaskLifecycleService<T, U, C>>,
    clock: web::Data<C>,
    actor: AuthenticatedUser,
    body: web::Json<CreateTaskBody>,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let request = body.into_inner().into_request(actor.id())?;
    let task = lifecycle.create_task(request).await?;
    log::debug!("task {} created by {}", task.id(), actor.id());
    Ok(HttpResponse::Created().json(TaskView::from_task(&task, clock.utc())))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn task_detail<T, U, C>(
    lifecycle: web::Data<TaskLifecycleService<T, U, C>>,
    comments: web::Data<TaskCommentService<T, T, U, C>>,
    clock: web::Data<C>,
    actor: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + CommentRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&path.into_inner())?;
    let task = lifecycle.get_task(actor.id(), task_id).await?;
    let thread = comments.list_comments(actor.id(), task_id).await?;
    Ok(HttpResponse::Ok().json(TaskDetailView {
        task: TaskView::from_task(&task, clock.utc()),
        comments: thread.iter().map(CommentView::from_comment).collect(),
    }))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn add_comment<T, U, C>(
    comments: web::Data<TaskCommentService<T, T, U, C>>,
    actor: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<CommentBody>,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + CommentRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&path.into_inner())?;
    let submission = body.into_inner();
    let comment = comments
        .add_comment(actor.id(), task_id, &submission.body)
        .await?;
    Ok(HttpResponse::Created().json(CommentView::from_comment(&comment)))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn edit_form<T, U, C>(
    lifecycle: web::Data<TaskLifecycleService<T, U, C>>,
    clock: web::Data<C>,
    actor: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&path.into_inner())?;
    let task = lifecycle.get_task_for_edit(actor.id(), task_id).await?;
    Ok(HttpResponse::Ok().json(TaskView::from_task(&task, clock.utc())))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn edit_task<T, U, C>(
    lifecycle: web::Data<TaskLifecycleService<T, U, C>>,
    clock: web::Data<C>,
    actor: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateTaskBody>,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&path.into_inner())?;
    let request = body.into_inner().into_request(actor.id(), task_id)?;
    let task = lifecycle.update_task(request).await?;
    Ok(HttpResponse::Ok().json(TaskView::from_task(&task, clock.utc())))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn delete_task<T, U, C>(
    lifecycle: web::Data<TaskLifecycleService<T, U, C>>,
    actor: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&path.into_inner())?;
    lifecycle.delete_task(actor.id(), task_id).await?;
    log::debug!("task {task_id} deleted by {}", actor.id());
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn update_status<T, U, C>(
    lifecycle: web::Data<TaskLifecycleService<T, U, C>>,
    actor: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<StatusChangeBody>,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&path.into_inner())?;
    let to = body.parse()?;
    let task = lifecycle.update_status(actor.id(), task_id, to).await?;
    log::debug!("task {} moved to {} by {}", task.id(), task.status(), actor.id());
    Ok(HttpResponse::Ok().json(StatusChangeResponse {
        success: true,
        new_status: task.status(),
    }))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn task_stats<T, U, C>(
    stats: web::Data<TaskStatsService<T, U, C>>,
    actor: AuthenticatedUser,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let statistics = stats.statistics_for(actor.id()).await?;
    Ok(HttpResponse::Ok().json(statistics))
}
