//! Tour lookups beyond the generic CRUD surface

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Tour;
use crate::errors::DomainResult;

use super::entity::Repository;
use super::memory::InMemoryRepository;

#[async_trait]
pub trait TourRepository: Repository<Tour> {
    /// Public tour addressed by its URL slug
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tour>>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<Tour>>;

    /// Stores a recomputed rating aggregate; `average` is already rounded
    async fn update_ratings(&self, id: Uuid, quantity: u32, average: f64) -> DomainResult<bool>;
}

#[async_trait]
impl TourRepository for InMemoryRepository<Tour> {
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tour>> {
        Ok(self
            .find_visible(|tour| tour.slug == slug)
            .await
            .into_iter()
            .next())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<Tour>> {
        Ok(self.find_visible(|tour| ids.contains(&tour.id)).await)
    }

    async fn update_ratings(&self, id: Uuid, quantity: u32, average: f64) -> DomainResult<bool> {
        Ok(self
            .modify(id, |tour| {
                tour.ratings_quantity = quantity;
                tour.ratings_average = average;
            })
            .await)
    }
}
