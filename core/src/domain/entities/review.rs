//! Review entity: one user's rating of one tour.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{DomainResult, ValidationErrors};
use crate::query::{Field, FieldType, Schema};

use super::{Entity, UniqueKey};

static REVIEW_FIELDS: [Field; 5] = [
    Field::new("id", "id", FieldType::Uuid),
    Field::new("rating", "rating", FieldType::Number),
    Field::new("tour", "tour_id", FieldType::Uuid),
    Field::new("user", "user_id", FieldType::Uuid),
    Field::new("createdAt", "created_at", FieldType::DateTime),
];

pub static REVIEW_SCHEMA: Schema = Schema {
    resource: "review",
    table: "reviews",
    fields: &REVIEW_FIELDS,
    multi_value_fields: &["rating"],
    hidden_clause: None,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub review: String,
    /// 1 to 5
    pub rating: f64,
    pub tour: Uuid,
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
    pub version: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub review: Option<String>,
    pub rating: Option<f64>,
    /// Filled from the nested route when absent
    pub tour: Option<Uuid>,
    /// Filled from the session when absent
    pub user: Option<Uuid>,
}

/// Text and rating are the only mutable fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatch {
    pub review: Option<String>,
    pub rating: Option<f64>,
}

impl Entity for Review {
    type Input = NewReview;
    type Patch = ReviewPatch;

    fn schema() -> &'static Schema {
        &REVIEW_SCHEMA
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_input(input: NewReview) -> DomainResult<Self> {
        let mut errors = ValidationErrors::new();
        errors.check(input.review.is_none(), "Review can not be empty!");
        errors.check(input.rating.is_none(), "A review must have a rating");
        errors.check(input.tour.is_none(), "Review must belong to a tour.");
        errors.check(input.user.is_none(), "Review must belong to a user.");
        errors.into_result()?;

        let review = Review {
            id: Uuid::new_v4(),
            review: input.review.unwrap_or_default().trim().to_string(),
            rating: input.rating.unwrap_or_default(),
            tour: input.tour.unwrap_or_default(),
            user: input.user.unwrap_or_default(),
            created_at: Utc::now(),
            version: 0,
        };
        review.validate()?;
        Ok(review)
    }

    fn apply_patch(&mut self, patch: ReviewPatch) -> DomainResult<()> {
        if let Some(text) = patch.review {
            self.review = text.trim().to_string();
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        self.validate()
    }

    fn validate(&self) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();
        errors.check(self.review.is_empty(), "Review can not be empty!");
        errors.check(
            !(1.0..=5.0).contains(&self.rating),
            "Rating must be between 1 and 5",
        );
        errors.into_result()
    }

    fn to_document(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    /// One review per user and tour
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("tour_user", format!("{}:{}", self.tour, self.user))]
    }
}
