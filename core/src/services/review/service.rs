use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::{
    aggregate_rating, Entity, NewReview, Review, ReviewPatch, Tour, User,
};
use crate::errors::{DomainError, DomainResult};
use crate::query::{Predicate, QueryParams, Scalar};
use crate::repositories::{ReviewRepository, TourRepository, UserRepository};
use crate::services::crud::CrudService;
use crate::services::populate::{review_document, users_by_id};

pub struct ReviewService {
    crud: CrudService<Review, dyn ReviewRepository>,
    tours: Arc<dyn TourRepository>,
    users: Arc<dyn UserRepository>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        tours: Arc<dyn TourRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            crud: CrudService::new(reviews),
            tours,
            users,
        }
    }

    /// Lists reviews, restricted to one tour on the nested route
    pub async fn list(&self, params: &QueryParams, tour_id: Option<Uuid>) -> DomainResult<Vec<Value>> {
        let base = match tour_id {
            Some(id) => Some(Predicate::eq(
                Review::schema().require("tour")?,
                Scalar::Uuid(id),
            )),
            None => None,
        };
        let listing = self.crud.get_all(params, base).await?;
        let people = users_by_id(
            self.users.as_ref(),
            listing.items.iter().map(|review| review.user),
        )
        .await?;
        Ok(listing.documents_with(|review| review_document(review, &people)))
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Value> {
        let review = self.crud.get_one(id).await?;
        let people = users_by_id(self.users.as_ref(), [review.user]).await?;
        Ok(review_document(&review, &people))
    }

    /// Creates a review by `author`.
    ///
    /// The tour comes from the nested route when present, otherwise from the
    /// body. One review per user and tour.
    pub async fn create(
        &self,
        author: &User,
        route_tour: Option<Uuid>,
        mut input: NewReview,
    ) -> DomainResult<Review> {
        if route_tour.is_some() {
            input.tour = route_tour;
        }
        input.user = Some(author.id);

        if let Some(tour_id) = input.tour {
            if self.tours.find_by_id(tour_id).await?.is_none() {
                return Err(DomainError::not_found(Tour::schema().resource));
            }
            if self
                .crud
                .repository()
                .find_by_tour_and_user(tour_id, author.id)
                .await?
                .is_some()
            {
                return Err(DomainError::business("You have already reviewed this tour."));
            }
        }

        let review = self.crud.create(input).await?;
        self.recalculate_ratings(review.tour).await?;
        Ok(review)
    }

    pub async fn update(&self, id: Uuid, patch: ReviewPatch) -> DomainResult<Review> {
        let review = self.crud.update_one(id, patch).await?;
        self.recalculate_ratings(review.tour).await?;
        Ok(review)
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let review = self.crud.get_one(id).await?;
        self.crud.delete_one(id).await?;
        self.recalculate_ratings(review.tour).await
    }

    /// Stores the tour's review count and mean rating; 4.5 when it has none
    pub async fn recalculate_ratings(&self, tour_id: Uuid) -> DomainResult<()> {
        let stats = self.crud.repository().rating_stats(tour_id).await?;
        let average = aggregate_rating(stats.quantity, stats.average);
        self.tours
            .update_ratings(tour_id, stats.quantity, average)
            .await?;
        debug!(%tour_id, quantity = stats.quantity, average, "tour ratings updated");
        Ok(())
    }
}
