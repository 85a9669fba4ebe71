//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management and migrations
//! - Rendering of query plans into parameterized SQL
//! - Repository implementations for every entity

pub mod connection;
pub mod errors;
pub mod mysql;
pub mod query;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{
    MySqlBookingRepository, MySqlReviewRepository, MySqlTourRepository, MySqlUserRepository,
};

use std::sync::Arc;

use tours_core::repositories::Repositories;

/// MySQL-backed repositories sharing one pool
pub fn mysql_repositories(pool: &DatabasePool) -> Repositories {
    let pool = pool.get_pool().clone();
    Repositories {
        users: Arc::new(MySqlUserRepository::new(pool.clone())),
        tours: Arc::new(MySqlTourRepository::new(pool.clone())),
        reviews: Arc::new(MySqlReviewRepository::new(pool.clone())),
        bookings: Arc::new(MySqlBookingRepository::new(pool)),
    }
}
