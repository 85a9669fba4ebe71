//! Domain entities representing core business objects.

pub mod booking;
pub mod review;
pub mod tour;
pub mod user;


use serde_json::Value;
use uuid::Uuid;

use crate::errors::DomainResult;
use crate::query::Schema;

// Re-export commonly used types
pub use booking::{Booking, BookingPatch, NewBooking};
pub use review::{NewReview, Review, ReviewPatch};
pub use tour::{aggregate_rating, slugify, Difficulty, GeoPoint, NewTour, Tour, TourPatch};
pub use user::{validate_new_password, NewUser, Role, User, UserPatch};

/// A value that must not repeat across records of the same entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub field: &'static str,
    pub value: String,
}

impl UniqueKey {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Persisted record type handled by the generic CRUD factory
pub trait Entity: Clone + Send + Sync + 'static {
    /// Creation payload
    type Input: Send;
    /// Partial update payload
    type Patch: Send;

    fn schema() -> &'static Schema;

    fn id(&self) -> Uuid;

    /// Validated constructor
    fn from_input(input: Self::Input) -> DomainResult<Self>;

    /// Applies a partial update and re-runs validation
    fn apply_patch(&mut self, patch: Self::Patch) -> DomainResult<()>;

    fn validate(&self) -> DomainResult<()>;

    /// Public JSON view used for responses, filtering and projection
    fn to_document(&self) -> Value;

    /// Bumps the internal revision after a write
    fn touch(&mut self);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }

    /// Rows excluded from every normal read
    fn is_hidden(&self) -> bool {
        false
    }
}
