//! Port definitions for identity persistence.

mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
