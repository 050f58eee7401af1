//! Domain model for users and roles.
//!
//! The identity domain models the user aggregate, its validated scalar
//! values, and the role vocabulary the authorization policy is built on.
//! Credential material is owned by the upstream authentication provider and
//! never appears here.

mod error;
mod ids;
mod user;

pub use error::{IdentityDomainError, ParseRoleError};
pub use ids::UserId;
pub use user::{
    EMPLOYEES_GROUP, EmailAddress, MANAGERS_GROUP, NewUserProfile, PersistedUserData, Role, User,
    Username,
};
