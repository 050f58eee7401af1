//! Service layer for user account provisioning and removal.

use crate::identity::{
    domain::{EmailAddress, IdentityDomainError, NewUserProfile, Role, User, UserId, Username},
    ports::{UserRepository, UserRepositoryError},
};
use crate::task::domain::policy;
use crate::task::ports::TaskRepository;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Configuration for account provisioning checks.
#[derive(Debug, Clone, Default)]
pub struct ProvisioningConfig {
    /// Email domains accepted for new accounts. An empty list accepts any
    /// domain.
    pub allowed_email_domains: Vec<String>,
}

impl ProvisioningConfig {
    /// Creates a configuration restricted to the given email domains.
    #[must_use]
    pub fn with_allowed_email_domains(domains: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed_email_domains: domains.into_iter().collect(),
        }
    }

    fn accepts_domain(&self, domain: &str) -> bool {
        self.allowed_email_domains.is_empty()
            || self
                .allowed_email_domains
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(domain))
    }
}

/// Request payload for provisioning a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    username: String,
    email: String,
    role: Role,
    staff: bool,
}

impl CreateUserRequest {
    /// Creates a request with required account fields.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            role,
            staff: false,
        }
    }

    /// Marks the account as staff.
    #[must_use]
    pub const fn with_staff(mut self, staff: bool) -> Self {
        self.staff = staff;
        self
    }
}

/// Service-level errors for account provisioning operations.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// Username or email failed domain validation.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// The email domain is outside the configured allowlist.
    #[error("email domain '{domain}' is not accepted for new accounts")]
    EmailDomainNotAllowed {
        /// Domain portion of the rejected email address.
        domain: String,
    },
    /// Another account already uses the requested username.
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
    /// The acting user does not exist.
    #[error("acting user {0} does not exist")]
    UnknownActor(UserId),
    /// The target user does not exist.
    #[error("user {0} does not exist")]
    UserNotFound(UserId),
    /// Only managers may list accounts.
    #[error("only managers may list user accounts")]
    ListRequiresManager,
    /// Only managers may remove accounts other than their own.
    #[error("only managers may remove other user accounts")]
    DeleteDenied,
    /// The target user still holds unfinished assigned tasks.
    #[error("user still has {count} active assigned tasks")]
    ActiveTasksRemain {
        /// Number of assigned tasks that are neither completed nor cancelled.
        count: u64,
    },
    /// User repository operation failed.
    #[error(transparent)]
    Users(UserRepositoryError),
    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] crate::task::ports::TaskRepositoryError),
}

/// Result type for account provisioning operations.
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;

/// User account provisioning service.
#[derive(Clone)]
pub struct ProvisioningService<U, T, C>
where
    U: UserRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    tasks: Arc<T>,
    clock: Arc<C>,
    config: ProvisioningConfig,
}

impl<U, T, C> ProvisioningService<U, T, C>
where
    U: UserRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new provisioning service.
    #[must_use]
    pub const fn new(users: Arc<U>, tasks: Arc<T>, clock: Arc<C>, config: ProvisioningConfig) -> Self {
        Self {
            users,
            tasks,
            clock,
            config,
        }
    }

    /// Provisions a new user account.
    ///
    /// The account joins the group matching its role and starts with no
    /// assigned tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError`] when the username or email is invalid,
    /// the email domain is not accepted, the username is already taken, or
    /// persistence fails.
    pub async fn create_user(&self, request: CreateUserRequest) -> ProvisioningResult<User> {
        let username = Username::new(request.username)?;
        let email = EmailAddress::new(request.email)?;
        if !self.config.accepts_domain(email.domain()) {
            return Err(ProvisioningError::EmailDomainNotAllowed {
                domain: email.domain().to_owned(),
            });
        }

        let profile = NewUserProfile::new(username, email, request.role).with_staff(request.staff);
        let user = User::provision(profile, &*self.clock);
        match self.users.store(&user).await {
            Ok(()) => Ok(user),
            Err(UserRepositoryError::DuplicateUsername(name)) => {
                Err(ProvisioningError::UsernameTaken(name))
            }
            Err(err) => Err(ProvisioningError::Users(err)),
        }
    }

    /// Lists every provisioned account, ordered by login name.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::UnknownActor`] when the acting user does
    /// not exist, [`ProvisioningError::ListRequiresManager`] when the actor
    /// lacks manager authority, or a persistence error.
    pub async fn list_users(&self, actor: UserId) -> ProvisioningResult<Vec<User>> {
        let acting_user = self.resolve_actor(actor).await?;
        if !policy::is_manager(&acting_user) {
            return Err(ProvisioningError::ListRequiresManager);
        }
        self.users.list_all().await.map_err(ProvisioningError::Users)
    }

    /// Removes a user account.
    ///
    /// A user may remove their own account; removing another account
    /// requires manager authority. Removal is refused while the target still
    /// holds assigned tasks that are neither completed nor cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError`] when the actor or target does not
    /// exist, the actor lacks authority, active assigned tasks remain, or
    /// persistence fails.
    pub async fn delete_user(&self, actor: UserId, target: UserId) -> ProvisioningResult<()> {
        let acting_user = self.resolve_actor(actor).await?;
        if acting_user.id() != target && !policy::is_manager(&acting_user) {
            return Err(ProvisioningError::DeleteDenied);
        }

        let target_user = self
            .users
            .find_by_id(target)
            .await
            .map_err(ProvisioningError::Users)?
            .ok_or(ProvisioningError::UserNotFound(target))?;

        let active = self.tasks.count_active_for_assignee(target_user.id()).await?;
        if active > 0 {
            return Err(ProvisioningError::ActiveTasksRemain { count: active });
        }

        match self.users.delete(target).await {
            Ok(()) => Ok(()),
            Err(UserRepositoryError::NotFound(id)) => Err(ProvisioningError::UserNotFound(id)),
            Err(err) => Err(ProvisioningError::Users(err)),
        }
    }

    async fn resolve_actor(&self, actor: UserId) -> ProvisioningResult<User> {
        self.users
            .find_by_id(actor)
            .await
            .map_err(ProvisioningError::Users)?
            .ok_or(ProvisioningError::UnknownActor(actor))
    }
}
