//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The username length is outside the accepted range.
    #[error("username must be between {minimum} and {maximum} characters, got {actual}")]
    InvalidUsernameLength {
        /// Character count of the trimmed username.
        actual: usize,
        /// Smallest accepted length.
        minimum: usize,
        /// Largest accepted length.
        maximum: usize,
    },

    /// The username contains characters outside the accepted set.
    #[error("username '{0}' may only contain letters, digits and @.+-_")]
    InvalidUsernameCharacters(String),

    /// The email address is structurally invalid.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
}

impl IdentityDomainError {
    /// Returns the input field this error is attributed to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidUsernameLength { .. } | Self::InvalidUsernameCharacters(_) => "username",
            Self::InvalidEmail(_) => "email",
        }
    }
}

/// Error returned while parsing roles from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
