//! Route tables for the HTTP surface.
//!
//! The configure functions are generic over the repository and clock types
//! so the same tables serve the production PostgreSQL wiring and the
//! in-memory wiring the HTTP tests run against. Literal segments are
//! registered before the `{id}` captures so `POST /tasks/create` never
//! lands in the detail routes.

use super::{tasks, users};
use crate::identity::ports::UserRepository;
use crate::task::ports::{CommentRepository, TaskRepository};
use actix_web::web;
use mockable::Clock;

/// Registers the task endpoints under `/tasks`.
pub fn task_routes<T, U, C>(cfg: &mut web::ServiceConfig)
where
    T: TaskRepository + CommentRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    cfg.service(
        web::scope("/tasks")
            .route("", web::get().to(tasks::list_tasks::<T, U, C>))
            .route("/", web::get().to(tasks::list_tasks::<T, U, C>))
            .route("/create", web::post().to(tasks::create_task::<T, U, C>))
            .route("/api/stats", web::get().to(tasks::task_stats::<T, U, C>))
            .route("/{id}", web::get().to(tasks::task_detail::<T, U, C>))
            .route("/{id}", web::post().to(tasks::add_comment::<T, U, C>))
            .route("/{id}/edit", web::get().to(tasks::edit_form::<T, U, C>))
            .route("/{id}/edit", web::post().to(tasks::edit_task::<T, U, C>))
            .route("/{id}/delete", web::post().to(tasks::delete_task::<T, U, C>))
            .route(
                "/{id}/update-status",
                web::post().to(tasks::update_status::<T, U, C>),
            ),
    );
}

/// Registers the identity endpoints under `/users`.
pub fn user_routes<T, U, C>(cfg: &mut web::ServiceConfig)
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(users::list_users::<T, U, C>))
            .route("/", web::get().to(users::list_users::<T, U, C>))
            .route("/create", web::post().to(users::create_user::<T, U, C>))
            .route(
                "/{id}/delete",
                web::post().to(users::delete_user::<T, U, C>),
            ),
    );
}
