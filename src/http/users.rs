//! Handlers for the identity endpoints.

use super::auth::AuthenticatedUser;
use super::dto::{parse_user_id, CreateUserBody, SuccessResponse, UserView};
use super::error::ApiError;
use crate::identity::{ports::UserRepository, services::ProvisioningService};
use crate::task::ports::TaskRepository;
use actix_web::{web, HttpResponse};
use mockable::Clock;

#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn list_users<T, U, C>(
    provisioning: web::Data<ProvisioningService<U, T, C>>,
    actor: AuthenticatedUser,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let users = provisioning.list_users(actor.id()).await?;
    let views: Vec<UserView> = users.iter().map(UserView::from_user).collect();
    Ok(HttpResponse::Ok().json(views))
}

/// Provisions a new account.
///
/// Registration is the step the upstream auth boundary fronts, so this is
/// the one endpoint that does not require an `X-User-Id` header.
#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn create_user<T, U, C>(
    provisioning: web::Data<ProvisioningService<U, T, C>>,
    body: web::Json<CreateUserBody>,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let request = body.into_inner().into_request()?;
    let user = provisioning.create_user(request).await?;
    log::debug!("user {} provisioned as {}", user.id(), user.role());
    Ok(HttpResponse::Created().json(UserView::from_user(&user)))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor arguments arrive by value"
)]
pub(super) async fn delete_user<T, U, C>(
    provisioning: web::Data<ProvisioningService<U, T, C>>,
    actor: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let target = parse_user_id(&path.into_inner())?;
    provisioning.delete_user(actor.id(), target).await?;
    log::debug!("user {target} removed by {}", actor.id());
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}
