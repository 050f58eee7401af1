//! Error type returned by HTTP handlers.
//!
//! Workflow errors from the service layer are folded into a small set of
//! transport-level categories, each tied to one status code. Validation
//! failures keep their field attribution so clients can render messages
//! next to the offending form field; persistence failures are logged and
//! surfaced as an opaque 500 body.

use crate::identity::{domain::IdentityDomainError, services::ProvisioningError};
use crate::task::{
    domain::TaskDomainError,
    ports::{CommentRepositoryError, TaskRepositoryError},
    services::TaskWorkflowError,
    validation::ValidationError,
};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Validation messages grouped by the form field they belong to.
///
/// Cross-field failures land under the `non_field_errors` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    /// Creates a map holding a single message for one field.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut fields = Self::default();
        fields.push(field, message);
        fields
    }

    /// Appends a message under the given field.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Returns the messages recorded for one field.
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` when no messages have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(error: ValidationError) -> Self {
        let mut fields = Self::default();
        for failure in error.into_vec() {
            fields.push(failure.field(), failure.to_string());
        }
        fields
    }
}

impl From<IdentityDomainError> for FieldErrors {
    fn from(error: IdentityDomainError) -> Self {
        Self::single(error.field(), error.to_string())
    }
}

/// Transport-level error rendered as a JSON response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request carried no usable identity.
    #[error("authentication required")]
    Unauthenticated,
    /// Input failed validation; messages are attributed to fields.
    #[error("validation failed")]
    Invalid(FieldErrors),
    /// The authorization policy denied the operation.
    #[error("{0}")]
    Forbidden(String),
    /// The referenced resource does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The operation conflicts with existing state.
    #[error("{0}")]
    Conflict(String),
    /// An unexpected failure; details are logged, never returned.
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn internal(context: &str, error: &dyn std::error::Error) -> Self {
        log::error!("{context} failure: {error}");
        Self::Internal
    }

    fn forbidden(error: &dyn std::error::Error) -> Self {
        log::warn!("request denied: {error}");
        Self::Forbidden(error.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let fields = match self {
            Self::Invalid(fields) => Some(fields),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            fields,
        })
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::Invalid(error.into())
    }
}

impl From<TaskWorkflowError> for ApiError {
    fn from(error: TaskWorkflowError) -> Self {
        match error {
            TaskWorkflowError::Validation(inner) => Self::Invalid(inner.into()),
            TaskWorkflowError::Domain(inner @ TaskDomainError::InvalidStatusTransition { .. }) => {
                Self::Invalid(FieldErrors::single("status", inner.to_string()))
            }
            TaskWorkflowError::Domain(
                inner @ TaskDomainError::RestrictedStatusTransition { .. },
            ) => Self::forbidden(&inner),
            TaskWorkflowError::Forbidden(inner) => Self::forbidden(&inner),
            TaskWorkflowError::UnknownActor(actor) => {
                log::warn!("request from unknown user {actor}");
                Self::Unauthenticated
            }
            TaskWorkflowError::TaskNotFound(id) => Self::NotFound(format!("task {id} not found")),
            TaskWorkflowError::Repository(TaskRepositoryError::NotFound(id)) => {
                Self::NotFound(format!("task {id} not found"))
            }
            TaskWorkflowError::Repository(inner) => Self::internal("task store", &inner),
            TaskWorkflowError::Comments(CommentRepositoryError::MissingTask(id)) => {
                Self::NotFound(format!("task {id} not found"))
            }
            TaskWorkflowError::Comments(inner) => Self::internal("comment store", &inner),
            TaskWorkflowError::Users(inner) => Self::internal("user store", &inner),
        }
    }
}

impl From<ProvisioningError> for ApiError {
    fn from(error: ProvisioningError) -> Self {
        match error {
            ProvisioningError::Domain(inner) => Self::Invalid(inner.into()),
            ProvisioningError::EmailDomainNotAllowed { .. } => {
                Self::Invalid(FieldErrors::single("email", error.to_string()))
            }
            ProvisioningError::UsernameTaken(_) => Self::Conflict(error.to_string()),
            ProvisioningError::UnknownActor(actor) => {
                log::warn!("request from unknown user {actor}");
                Self::Unauthenticated
            }
            ProvisioningError::UserNotFound(id) => Self::NotFound(format!("user {id} not found")),
            ProvisioningError::ListRequiresManager | ProvisioningError::DeleteDenied => {
                Self::forbidden(&error)
            }
            ProvisioningError::ActiveTasksRemain { .. } => Self::Conflict(error.to_string()),
            ProvisioningError::Users(inner) => Self::internal("user store", &inner),
            ProvisioningError::Tasks(inner) => Self::internal("task store", &inner),
        }
    }
}
