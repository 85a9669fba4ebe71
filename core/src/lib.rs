//! # Natours Core
//!
//! Domain layer of the Natours tour-booking backend: entities, the query
//! feature builder, repository interfaces with an in-memory store, and the
//! services behind every API route and page.

pub mod domain;
pub mod errors;
pub mod query;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::{InMemoryRepository, Repositories, Repository};
