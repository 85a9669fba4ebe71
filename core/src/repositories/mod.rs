//! Repository interfaces and the in-memory store
//!
//! Each entity has a generic [`Repository`] surface used by the CRUD
//! factory plus an entity trait for the lookups its services need. The
//! in-memory implementations back tests and database-less development;
//! MySQL implementations live in the infrastructure crate.

pub mod booking;
pub mod entity;
pub mod memory;
pub mod review;
pub mod tour;
pub mod user;


use std::sync::Arc;

pub use booking::BookingRepository;
pub use entity::Repository;
pub use memory::InMemoryRepository;
pub use review::{RatingStats, ReviewRepository};
pub use tour::TourRepository;
pub use user::UserRepository;

use crate::domain::entities::{Booking, Review, Tour, User};

/// The full set of repositories the services are wired with
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tours: Arc<dyn TourRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl Repositories {
    /// Fresh, empty in-memory repositories
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryRepository::<User>::new()),
            tours: Arc::new(InMemoryRepository::<Tour>::new()),
            reviews: Arc::new(InMemoryRepository::<Review>::new()),
            bookings: Arc::new(InMemoryRepository::<Booking>::new()),
        }
    }
}
