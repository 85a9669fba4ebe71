use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::domain::entities::{Entity, Review, Tour, User};
use crate::errors::DomainResult;
use crate::query::{QueryParams, QueryPlan};
use crate::repositories::{ReviewRepository, TourRepository, UserRepository};
use crate::services::crud::CrudService;
use crate::services::populate::{review_document, tour_document, users_by_id, UserIndex};

/// A tour with everything its detail view shows
#[derive(Debug, Clone)]
pub struct TourDetail {
    pub tour: Tour,
    pub reviews: Vec<Review>,
    /// Guides and reviewers
    pub people: UserIndex,
}

impl TourDetail {
    pub fn to_document(&self) -> Value {
        let mut document = tour_document(&self.tour, &self.people);
        if let Value::Object(map) = &mut document {
            let reviews = self
                .reviews
                .iter()
                .map(|review| review_document(review, &self.people))
                .collect();
            map.insert("reviews".to_string(), Value::Array(reviews));
        }
        document
    }

    pub fn guides(&self) -> Vec<&User> {
        self.tour
            .guides
            .iter()
            .filter_map(|id| self.people.get(id))
            .collect()
    }

    pub fn reviewer_name(&self, review: &Review) -> Option<&str> {
        self.people.get(&review.user).map(|user| user.name.as_str())
    }
}

pub struct TourService {
    crud: CrudService<Tour, dyn TourRepository>,
    users: Arc<dyn UserRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl TourService {
    pub fn new(
        tours: Arc<dyn TourRepository>,
        users: Arc<dyn UserRepository>,
        reviews: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            crud: CrudService::new(tours),
            users,
            reviews,
        }
    }

    pub fn crud(&self) -> &CrudService<Tour, dyn TourRepository> {
        &self.crud
    }

    /// Listing documents with guides populated
    pub async fn list(&self, params: &QueryParams) -> DomainResult<Vec<Value>> {
        let listing = self.crud.get_all(params, None).await?;
        let people = users_by_id(
            self.users.as_ref(),
            listing.items.iter().flat_map(|tour| tour.guides.iter().copied()),
        )
        .await?;
        Ok(listing.documents_with(|tour| tour_document(tour, &people)))
    }

    pub async fn detail(&self, id: Uuid) -> DomainResult<TourDetail> {
        let tour = self.crud.get_one(id).await?;
        self.populate(tour).await
    }

    /// Detail view addressed by slug; `None` when no public tour has it
    pub async fn detail_by_slug(&self, slug: &str) -> DomainResult<Option<TourDetail>> {
        match self.crud.repository().find_by_slug(slug).await? {
            Some(tour) => self.populate(tour).await.map(Some),
            None => Ok(None),
        }
    }

    /// Every public tour, newest first, for the overview page
    pub async fn overview(&self) -> DomainResult<Vec<Tour>> {
        let schema = Tour::schema();
        let plan = QueryPlan::new(schema).with_sort(schema.require("createdAt")?, true);
        self.crud.repository().find_many(&plan).await
    }

    async fn populate(&self, tour: Tour) -> DomainResult<TourDetail> {
        let reviews = self.reviews.find_by_tour(tour.id).await?;
        let people = users_by_id(
            self.users.as_ref(),
            tour.guides
                .iter()
                .copied()
                .chain(reviews.iter().map(|review| review.user)),
        )
        .await?;
        Ok(TourDetail {
            tour,
            reviews,
            people,
        })
    }
}
