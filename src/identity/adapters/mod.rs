//! Persistence adapters for the identity module.
//!
//! Concrete implementations of the [`UserRepository`] port: a thread-safe
//! in-memory store for unit testing and a Diesel-backed `PostgreSQL` store
//! for production use.
//!
//! [`UserRepository`]: crate::identity::ports::UserRepository

mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::{PostgresUserRepository, UserPgPool};
