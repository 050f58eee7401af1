//! Authorization policy for task operations.
//!
//! Manager standing is carried by three coexisting signals: the staff flag,
//! the profile role, and membership of a managers group. The predicates
//! here treat any one of them as sufficient, so callers never re-derive the
//! answer from the raw signals.

use super::Task;
use crate::identity::domain::{Role, User};
use thiserror::Error;

/// Group names whose members hold manager authority.
const MANAGER_GROUPS: [&str; 2] = ["Manager", "Managers"];

/// Returns whether the user holds manager authority.
#[must_use]
pub fn is_manager(user: &User) -> bool {
    user.is_staff()
        || user.role() == Role::Manager
        || MANAGER_GROUPS.iter().any(|group| user.in_group(group))
}

/// Returns whether the user may create tasks.
#[must_use]
pub fn can_create_task(user: &User) -> bool {
    is_manager(user)
}

/// Returns whether the user may view the task and its comments.
#[must_use]
pub fn can_access_task(user: &User, task: &Task) -> bool {
    is_manager(user) || task.assignee() == user.id() || task.creator() == user.id()
}

/// Returns whether the user may delete tasks.
///
/// Deletion is manager-only; ownership of the task grants nothing here.
#[must_use]
pub fn can_delete_task(user: &User) -> bool {
    is_manager(user)
}

/// Returns whether the user may change the task's status.
///
/// Status changes are reserved for managers and the current assignee; a
/// creator without either standing may view the task but not move it.
#[must_use]
pub fn can_update_status(user: &User, task: &Task) -> bool {
    is_manager(user) || task.assignee() == user.id()
}

/// Refusals produced when the policy denies an action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PermissionError {
    /// Task creation is reserved for managers.
    #[error("only managers may create tasks")]
    CreateRequiresManager,
    /// The user may not view this task.
    #[error("you do not have access to this task")]
    AccessDenied,
    /// Task deletion is reserved for managers.
    #[error("only managers may delete tasks")]
    DeleteRequiresManager,
    /// Editing fields other than status is reserved for managers.
    #[error("only managers may edit task fields other than status")]
    EditRequiresManager,
    /// Status changes are reserved for managers and the assignee.
    #[error("only the assignee or a manager may change task status")]
    StatusChangeDenied,
}
