//! Error types for task input validation.

use thiserror::Error;

/// Field-attributed failures produced by the validation layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The title is outside the accepted length range after trimming.
    #[error("title must be between {minimum} and {maximum} characters")]
    TitleLength {
        /// Character count of the trimmed title.
        actual: usize,
        /// Smallest accepted length.
        minimum: usize,
        /// Largest accepted length.
        maximum: usize,
    },

    /// The title contains a word from the disallowed list.
    #[error("title contains a disallowed word: {0}")]
    TitleDisallowedWord(String),

    /// The description is outside the accepted length range after trimming.
    #[error("description must be between {minimum} and {maximum} characters")]
    DescriptionLength {
        /// Character count of the trimmed description.
        actual: usize,
        /// Smallest accepted length.
        minimum: usize,
        /// Largest accepted length.
        maximum: usize,
    },

    /// The comment body is outside the accepted length range after trimming.
    #[error("comment must be between {minimum} and {maximum} characters")]
    CommentLength {
        /// Character count of the trimmed body.
        actual: usize,
        /// Smallest accepted length.
        minimum: usize,
        /// Largest accepted length.
        maximum: usize,
    },

    /// The due date is not strictly in the future.
    #[error("due date must be in the future")]
    DueDateNotFuture,

    /// The due date is beyond the furthest accepted deadline.
    #[error("due date cannot be more than {maximum_days} days in the future")]
    DueDateTooFar {
        /// Widest accepted deadline window in days.
        maximum_days: i64,
    },

    /// The due date is outside the tighter window urgent work is held to.
    #[error("urgent tasks must be due within {maximum_days} days")]
    UrgentDueDateTooFar {
        /// Accepted deadline window for urgent tasks in days.
        maximum_days: i64,
    },

    /// A new task asked for completed as its initial status.
    #[error("new tasks cannot be created as completed")]
    CreatedCompleted,

    /// The effort estimate is negative or not a finite number.
    #[error("estimated hours must be a non-negative number")]
    InvalidEstimatedHours,

    /// The assigned user does not exist.
    #[error("assigned user does not exist")]
    UnknownAssignee,

    /// A required input field is absent.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Cross-field failure that does not map to a single field.
    #[error("{0}")]
    Invalid(String),

    /// Multiple validation errors occurred.
    #[error("multiple validation errors: {}", format_errors(.0))]
    Multiple(Vec<Self>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Combines multiple validation errors into a single error.
    ///
    /// If only one error is provided, returns it directly rather than
    /// wrapping.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if called with an empty vector, as this
    /// indicates a logic error in the caller. In release builds, returns a
    /// generic error.
    #[must_use]
    pub fn multiple(errors: Vec<Self>) -> Self {
        match errors.len() {
            0 => {
                debug_assert!(false, "multiple() called with empty errors vector");
                Self::Invalid("internal error: no validation errors".to_owned())
            }
            1 => errors.into_iter().next().unwrap_or_else(|| {
                Self::Invalid("internal error: no validation errors".to_owned())
            }),
            _ => Self::Multiple(errors),
        }
    }

    /// Returns the form field this error is attributed to.
    ///
    /// [`Multiple`](Self::Multiple) and [`Invalid`](Self::Invalid) do not
    /// belong to a single field and map to `non_field_errors`.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::TitleLength { .. } | Self::TitleDisallowedWord(_) => "title",
            Self::DescriptionLength { .. } => "description",
            Self::CommentLength { .. } => "body",
            Self::DueDateNotFuture
            | Self::DueDateTooFar { .. }
            | Self::UrgentDueDateTooFar { .. } => "due_date",
            Self::CreatedCompleted => "status",
            Self::InvalidEstimatedHours => "estimated_hours",
            Self::UnknownAssignee => "assigned_to",
            Self::MissingField(name) => *name,
            Self::Invalid(_) | Self::Multiple(_) => "non_field_errors",
        }
    }

    /// Flattens this error into its individual failures.
    #[must_use]
    pub fn into_vec(self) -> Vec<Self> {
        match self {
            Self::Multiple(errors) => errors,
            other => vec![other],
        }
    }

    /// Returns `true` if this error represents multiple validation failures.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }
}
