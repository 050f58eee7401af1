//! User aggregate and role model.
//!
//! A user's elevated standing is carried by three coexisting signals — the
//! staff flag, the profile role, and membership of a managers group. The
//! aggregate stores all three; the authorization policy treats any one of
//! them as sufficient.

use super::{IdentityDomainError, ParseRoleError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Group name attached to users provisioned as managers.
pub const MANAGERS_GROUP: &str = "Managers";

/// Group name attached to users provisioned as employees.
pub const EMPLOYEES_GROUP: &str = "Employees";

/// Profile role recorded for each user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Elevated role: creates, edits and deletes any task.
    Manager,
    /// Restricted role: works tasks assigned to them.
    Employee,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }

    /// Returns the group name attached at provisioning time.
    #[must_use]
    pub const fn provisioned_group(self) -> &'static str {
        match self {
            Self::Manager => MANAGERS_GROUP,
            Self::Employee => EMPLOYEES_GROUP,
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "manager" => Ok(Self::Manager),
            "employee" => Ok(Self::Employee),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Smallest accepted username length.
    pub const MIN_LENGTH: usize = 3;

    /// Largest accepted username length.
    pub const MAX_LENGTH: usize = 150;

    /// Creates a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidUsernameLength`] when the
    /// trimmed value is outside the accepted range, or
    /// [`IdentityDomainError::InvalidUsernameCharacters`] when it contains
    /// characters outside letters, digits and `@.+-_`.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let length = normalized.chars().count();
        if length < Self::MIN_LENGTH || length > Self::MAX_LENGTH {
            return Err(IdentityDomainError::InvalidUsernameLength {
                actual: length,
                minimum: Self::MIN_LENGTH,
                maximum: Self::MAX_LENGTH,
            });
        }
        let accepted = normalized
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c));
        if !accepted {
            return Err(IdentityDomainError::InvalidUsernameCharacters(
                normalized.to_owned(),
            ));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the username as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidEmail`] when the value lacks a
    /// local part, a domain, or a dot within the domain.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(IdentityDomainError::InvalidEmail(raw));
        };
        let domain_is_valid =
            !domain.is_empty() && domain.contains('.') && !domain.chars().any(char::is_whitespace);
        if local.is_empty() || !domain_is_valid {
            return Err(IdentityDomainError::InvalidEmail(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the email address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the domain part after the `@` separator.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated profile values for provisioning a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserProfile {
    username: Username,
    email: EmailAddress,
    role: Role,
    staff: bool,
}

impl NewUserProfile {
    /// Creates a profile from validated components.
    #[must_use]
    pub const fn new(username: Username, email: EmailAddress, role: Role) -> Self {
        Self {
            username,
            email,
            role,
            staff: false,
        }
    }

    /// Marks the profile as belonging to a staff account.
    #[must_use]
    pub const fn with_staff(mut self, staff: bool) -> Self {
        self.staff = staff;
        self
    }
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    role: Role,
    staff: bool,
    groups: Vec<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted login name.
    pub username: Username,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted profile role.
    pub role: Role,
    /// Persisted staff flag.
    pub staff: bool,
    /// Persisted group memberships.
    pub groups: Vec<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Provisions a new user with profile role and role group.
    ///
    /// The group matching the profile role is attached so the role signals
    /// start out consistent.
    #[must_use]
    pub fn provision(profile: NewUserProfile, clock: &impl Clock) -> Self {
        Self {
            id: UserId::new(),
            username: profile.username,
            email: profile.email,
            role: profile.role,
            staff: profile.staff,
            groups: vec![profile.role.provisioned_group().to_owned()],
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            email: data.email,
            role: data.role,
            staff: data.staff,
            groups: data.groups,
            created_at: data.created_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the profile role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns whether the account carries the staff flag.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.staff
    }

    /// Returns the group memberships.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Returns whether the user belongs to the named group.
    #[must_use]
    pub fn in_group(&self, name: &str) -> bool {
        self.groups.iter().any(|group| group == name)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
