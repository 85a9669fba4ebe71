//! Generic persistence surface shared by every entity

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Entity;
use crate::errors::DomainResult;
use crate::query::QueryPlan;

/// Basic persistence operations for an entity type.
///
/// Reads never return hidden rows (secret tours, inactive users).
/// Writes report unique-key collisions as `DomainError::Duplicate`.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn insert(&self, entity: &E) -> DomainResult<()>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<E>>;

    /// Filtered, sorted and windowed read described by `plan`
    async fn find_many(&self, plan: &QueryPlan) -> DomainResult<Vec<E>>;

    /// Replaces the stored record; returns false when no row has that id
    async fn update(&self, entity: &E) -> DomainResult<bool>;

    /// Returns false when no row has that id
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;
}
