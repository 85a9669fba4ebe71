//! Review lookups and the per-tour rating aggregate

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Review;
use crate::errors::DomainResult;

use super::entity::Repository;
use super::memory::InMemoryRepository;

/// Count and mean rating of a tour's reviews
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingStats {
    pub quantity: u32,
    /// `None` when the tour has no reviews
    pub average: Option<f64>,
}

impl RatingStats {
    pub fn from_ratings(ratings: impl IntoIterator<Item = f64>) -> Self {
        let (count, sum) = ratings
            .into_iter()
            .fold((0u32, 0.0), |(count, sum), rating| (count + 1, sum + rating));
        Self {
            quantity: count,
            average: (count > 0).then(|| sum / f64::from(count)),
        }
    }
}

#[async_trait]
pub trait ReviewRepository: Repository<Review> {
    /// Reviews of a tour, newest first
    async fn find_by_tour(&self, tour_id: Uuid) -> DomainResult<Vec<Review>>;

    async fn find_by_tour_and_user(
        &self,
        tour_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Option<Review>>;

    async fn rating_stats(&self, tour_id: Uuid) -> DomainResult<RatingStats>;
}

#[async_trait]
impl ReviewRepository for InMemoryRepository<Review> {
    async fn find_by_tour(&self, tour_id: Uuid) -> DomainResult<Vec<Review>> {
        let mut reviews = self.find_visible(|review| review.tour == tour_id).await;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn find_by_tour_and_user(
        &self,
        tour_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Option<Review>> {
        Ok(self
            .find_visible(|review| review.tour == tour_id && review.user == user_id)
            .await
            .into_iter()
            .next())
    }

    async fn rating_stats(&self, tour_id: Uuid) -> DomainResult<RatingStats> {
        let reviews = self.find_visible(|review| review.tour == tour_id).await;
        Ok(RatingStats::from_ratings(reviews.iter().map(|r| r.rating)))
    }
}
