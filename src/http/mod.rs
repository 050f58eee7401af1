//! HTTP adapter exposing the task and identity services.
//!
//! The adapter owns three concerns and nothing else: resolving the acting
//! user from the upstream auth header, converting wire payloads to and
//! from the service request types, and mapping workflow errors to status
//! codes. Policy and validation always run inside the services, so no
//! route can reach the store without passing them.

mod auth;
mod dto;
mod error;
pub mod routes;
mod tasks;
mod users;

pub use auth::{AuthenticatedUser, USER_ID_HEADER};
pub use dto::{
    CommentBody, CommentView, CreateTaskBody, CreateUserBody, StatusChangeBody,
    StatusChangeResponse, SuccessResponse, TaskDetailView, TaskListQuery, TaskView,
    UpdateTaskBody, UserView,
};
pub use error::{ApiError, FieldErrors};
