//! Persistence adapters for the task module.
//!
//! Concrete implementations of the [`TaskRepository`] and
//! [`CommentRepository`] ports: a thread-safe in-memory store for unit
//! testing and a Diesel-backed `PostgreSQL` store for production use.
//!
//! [`TaskRepository`]: crate::task::ports::TaskRepository
//! [`CommentRepository`]: crate::task::ports::CommentRepository

mod memory;
pub mod postgres;

pub use memory::InMemoryTaskStore;
pub use postgres::{PostgresTaskStore, TaskPgPool};
