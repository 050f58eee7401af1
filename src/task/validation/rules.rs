//! Individual validation rule implementations.
//!
//! Each rule is a pure function taking the evaluation instant as an
//! argument, so rules can be exercised at any point in time without a
//! clock. Rules return the normalised value on success or a specific
//! [`ValidationError`] on failure; the aggregate functions at the bottom
//! run every rule and collect all failures rather than stopping at the
//! first.

use super::{TaskValidationConfig, ValidationError};
use crate::task::domain::{TaskPriority, TaskStatus, TaskUpdate};
use chrono::{DateTime, Duration, Utc};

/// Smallest accepted title length in characters.
pub const TITLE_MIN_CHARS: usize = 5;

/// Largest accepted title length in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Smallest accepted description length in characters.
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// Largest accepted description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Smallest accepted comment body length in characters.
pub const COMMENT_MIN_CHARS: usize = 5;

/// Largest accepted comment body length in characters.
pub const COMMENT_MAX_CHARS: usize = 1000;

/// Widest accepted deadline window in days.
pub const DUE_DATE_MAX_DAYS: i64 = 365;

/// Accepted deadline window for urgent tasks in days.
pub const URGENT_DUE_DATE_MAX_DAYS: i64 = 3;

/// Deadline window applied when no due date is supplied.
pub const DEFAULT_DUE_DATE_DAYS: i64 = 7;

/// Validates and normalises a task title.
///
/// # Errors
///
/// Returns [`ValidationError::TitleLength`] when the trimmed title is
/// outside the accepted range, or [`ValidationError::TitleDisallowedWord`]
/// when it contains a configured disallowed word.
pub fn validate_title(
    raw: &str,
    config: &TaskValidationConfig,
) -> Result<String, ValidationError> {
    let normalized = raw.trim();
    let length = normalized.chars().count();
    if length < TITLE_MIN_CHARS || length > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleLength {
            actual: length,
            minimum: TITLE_MIN_CHARS,
            maximum: TITLE_MAX_CHARS,
        });
    }
    if let Some(word) = config.find_disallowed_word(normalized) {
        return Err(ValidationError::TitleDisallowedWord(word.to_owned()));
    }
    Ok(normalized.to_owned())
}

/// Validates and normalises a task description.
///
/// # Errors
///
/// Returns [`ValidationError::DescriptionLength`] when the trimmed
/// description is outside the accepted range.
pub fn validate_description(raw: &str) -> Result<String, ValidationError> {
    let normalized = raw.trim();
    let length = normalized.chars().count();
    if length < DESCRIPTION_MIN_CHARS || length > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionLength {
            actual: length,
            minimum: DESCRIPTION_MIN_CHARS,
            maximum: DESCRIPTION_MAX_CHARS,
        });
    }
    Ok(normalized.to_owned())
}

/// Validates and normalises a comment body.
///
/// # Errors
///
/// Returns [`ValidationError::CommentLength`] when the trimmed body is
/// outside the accepted range.
pub fn validate_comment_body(raw: &str) -> Result<String, ValidationError> {
    let normalized = raw.trim();
    let length = normalized.chars().count();
    if length < COMMENT_MIN_CHARS || length > COMMENT_MAX_CHARS {
        return Err(ValidationError::CommentLength {
            actual: length,
            minimum: COMMENT_MIN_CHARS,
            maximum: COMMENT_MAX_CHARS,
        });
    }
    Ok(normalized.to_owned())
}

/// Validates a supplied due date, or defaults an absent one.
///
/// An absent due date defaults to a week out rather than being rejected;
/// the bounds below apply only to dates the caller actually supplied.
///
/// # Errors
///
/// Returns [`ValidationError::DueDateNotFuture`] when the date is not
/// strictly after `now`, [`ValidationError::DueDateTooFar`] when it is
/// beyond the widest window, or [`ValidationError::UrgentDueDateTooFar`]
/// when an urgent task's date is beyond the tighter window.
pub fn validate_due_date(
    due_date: Option<DateTime<Utc>>,
    priority: TaskPriority,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    match due_date {
        None => Ok(now + Duration::days(DEFAULT_DUE_DATE_DAYS)),
        Some(due) => check_due_date_bounds(due, priority, now).map(|()| due),
    }
}

/// Checks a present due date against the deadline windows.
///
/// # Errors
///
/// Returns the same errors as [`validate_due_date`] for a supplied date.
pub fn check_due_date_bounds(
    due: DateTime<Utc>,
    priority: TaskPriority,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if due <= now {
        return Err(ValidationError::DueDateNotFuture);
    }
    if due > now + Duration::days(DUE_DATE_MAX_DAYS) {
        return Err(ValidationError::DueDateTooFar {
            maximum_days: DUE_DATE_MAX_DAYS,
        });
    }
    if priority == TaskPriority::Urgent && due > now + Duration::days(URGENT_DUE_DATE_MAX_DAYS) {
        return Err(ValidationError::UrgentDueDateTooFar {
            maximum_days: URGENT_DUE_DATE_MAX_DAYS,
        });
    }
    Ok(())
}

/// Validates an effort estimate.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEstimatedHours`] when the value is
/// negative or not a finite number.
pub fn validate_estimated_hours(hours: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match hours {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(ValidationError::InvalidEstimatedHours)
        }
        other => Ok(other),
    }
}

/// Validates the initial status of a new task.
///
/// # Errors
///
/// Returns [`ValidationError::CreatedCompleted`] when the caller asks for
/// completed as the starting status.
pub const fn validate_initial_status(status: TaskStatus) -> Result<TaskStatus, ValidationError> {
    match status {
        TaskStatus::Completed => Err(ValidationError::CreatedCompleted),
        other => Ok(other),
    }
}

/// Normalises free-form notes, collapsing whitespace-only input to absent.
#[must_use]
pub fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Unvalidated field values for creating a task.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewTaskInput {
    /// Raw title.
    pub title: String,
    /// Raw description.
    pub description: String,
    /// Requested initial status; defaults to pending.
    pub status: Option<TaskStatus>,
    /// Requested priority; defaults to medium.
    pub priority: Option<TaskPriority>,
    /// Requested deadline; defaults to a week out.
    pub due_date: Option<DateTime<Utc>>,
    /// Requested effort estimate.
    pub estimated_hours: Option<f64>,
    /// Requested notes.
    pub notes: Option<String>,
}

/// Normalised field values that passed task creation validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedNewTask {
    /// Normalised title.
    pub title: String,
    /// Normalised description.
    pub description: String,
    /// Initial status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Deadline, defaulted when the input carried none.
    pub due_date: DateTime<Utc>,
    /// Effort estimate.
    pub estimated_hours: Option<f64>,
    /// Normalised notes.
    pub notes: Option<String>,
}

/// Unvalidated field changes for updating a task.
///
/// `None` leaves a field untouched; the nested option on `notes`
/// distinguishes "leave alone" from "clear".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskUpdateInput {
    /// Raw replacement title.
    pub title: Option<String>,
    /// Raw replacement description.
    pub description: Option<String>,
    /// Requested status.
    pub status: Option<TaskStatus>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Replacement deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Replacement or cleared effort estimate.
    pub estimated_hours: Option<Option<f64>>,
    /// Replacement or cleared notes.
    pub notes: Option<Option<String>>,
}

/// Validates the fields of a new task, collecting every failure.
///
/// # Errors
///
/// Returns a single [`ValidationError`], or
/// [`ValidationError::Multiple`] when more than one rule failed.
pub fn validate_new_task(
    input: NewTaskInput,
    now: DateTime<Utc>,
    config: &TaskValidationConfig,
) -> Result<ValidatedNewTask, ValidationError> {
    let mut errors = Vec::new();

    let title = collect(validate_title(&input.title, config), &mut errors);
    let description = collect(validate_description(&input.description), &mut errors);
    let status = collect(
        validate_initial_status(input.status.unwrap_or_default()),
        &mut errors,
    );
    let priority = input.priority.unwrap_or_default();
    let due_date = collect(validate_due_date(input.due_date, priority, now), &mut errors);
    let estimated_hours = collect(validate_estimated_hours(input.estimated_hours), &mut errors);
    let notes = normalize_notes(input.notes);

    match (title, description, status, due_date, estimated_hours) {
        (Some(title), Some(description), Some(status), Some(due_date), Some(estimated_hours))
            if errors.is_empty() =>
        {
            Ok(ValidatedNewTask {
                title,
                description,
                status,
                priority,
                due_date,
                estimated_hours,
                notes,
            })
        }
        _ => Err(ValidationError::multiple(errors)),
    }
}

/// Validates the fields of a task update, collecting every failure.
///
/// Only supplied fields are validated. The due date, when supplied, is
/// checked against the effective priority: the supplied one, or the
/// task's current priority when the update leaves it unchanged.
///
/// # Errors
///
/// Returns a single [`ValidationError`], or
/// [`ValidationError::Multiple`] when more than one rule failed.
pub fn validate_task_update(
    input: TaskUpdateInput,
    current_priority: TaskPriority,
    now: DateTime<Utc>,
    config: &TaskValidationConfig,
) -> Result<TaskUpdate, ValidationError> {
    let mut errors = Vec::new();

    let title = match input.title {
        Some(raw) => collect(validate_title(&raw, config), &mut errors),
        None => None,
    };
    let description = match input.description {
        Some(raw) => collect(validate_description(&raw), &mut errors),
        None => None,
    };
    let effective_priority = input.priority.unwrap_or(current_priority);
    if let Some(due) = input.due_date
        && let Err(error) = check_due_date_bounds(due, effective_priority, now)
    {
        errors.push(error);
    }
    let mut estimated_hours = None;
    if let Some(requested) = input.estimated_hours {
        match validate_estimated_hours(requested) {
            Ok(valid) => estimated_hours = Some(valid),
            Err(error) => errors.push(error),
        }
    }
    let notes = input.notes.map(normalize_notes);

    if errors.is_empty() {
        Ok(TaskUpdate {
            title,
            description,
            status: input.status,
            priority: input.priority,
            assignee: None,
            due_date: input.due_date,
            estimated_hours,
            notes,
        })
    } else {
        Err(ValidationError::multiple(errors))
    }
}

fn collect<T>(result: Result<T, ValidationError>, errors: &mut Vec<ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}
