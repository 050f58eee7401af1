//! Validation layer for task and comment input.
//!
//! Rules normalise input and collect field-attributed failures before
//! anything reaches the lifecycle or persistence layers. This layer never
//! touches persistence; existence checks on referenced users belong to the
//! services that hold a repository.

mod config;
mod error;
pub mod rules;

pub use config::TaskValidationConfig;
pub use error::ValidationError;
pub use rules::{NewTaskInput, TaskUpdateInput, ValidatedNewTask};
