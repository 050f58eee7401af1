//! Acting-user extraction from the upstream auth boundary.
//!
//! Authentication itself is owned by a fronting identity provider; by the
//! time a request reaches this service the provider has placed the caller's
//! user id in the `X-User-Id` header. The extractor only parses that id —
//! role and permissions are always re-derived from the user store, so a
//! stale or forged header cannot grant more than the stored account allows.

use super::error::ApiError;
use crate::identity::domain::UserId;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

/// Name of the header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Identity of the caller, as asserted by the upstream auth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    /// Returns the caller's user id.
    #[must_use]
    pub const fn id(self) -> UserId {
        self.0
    }

    fn resolve(req: &HttpRequest) -> Result<Self, ApiError> {
        req.headers()
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .map(|uuid| Self(UserId::from_uuid(uuid)))
            .ok_or(ApiError::Unauthenticated)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, ApiError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::resolve(req))
    }
}
