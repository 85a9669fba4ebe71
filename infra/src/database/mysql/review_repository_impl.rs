//! MySQL implementation of the ReviewRepository trait.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use tours_core::domain::entities::Review;
use tours_core::errors::DomainResult;
use tours_core::query::QueryPlan;
use tours_core::repositories::{RatingStats, Repository, ReviewRepository};

use super::{get, get_uuid};
use crate::database::errors::map_sqlx_error;
use crate::database::query::select_query;

const COLUMNS: &str = "id, review, rating, tour_id, user_id, created_at, version";

pub struct MySqlReviewRepository {
    pool: MySqlPool,
}

impl MySqlReviewRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_review(row: &MySqlRow) -> DomainResult<Review> {
        Ok(Review {
            id: get_uuid(row, "id")?,
            review: get(row, "review")?,
            rating: get(row, "rating")?,
            tour: get_uuid(row, "tour_id")?,
            user: get_uuid(row, "user_id")?,
            created_at: get(row, "created_at")?,
            version: get(row, "version")?,
        })
    }
}

#[async_trait]
impl Repository<Review> for MySqlReviewRepository {
    async fn insert(&self, review: &Review) -> DomainResult<()> {
        sqlx::query(&format!("INSERT INTO reviews ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"))
            .bind(review.id.to_string())
            .bind(&review.review)
            .bind(review.rating)
            .bind(review.tour.to_string())
            .bind(review.user.to_string())
            .bind(review.created_at)
            .bind(review.version)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Review>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM reviews WHERE id = ? LIMIT 1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(Self::row_to_review).transpose()
    }

    async fn find_many(&self, plan: &QueryPlan) -> DomainResult<Vec<Review>> {
        let rows = select_query(plan, COLUMNS)
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(Self::row_to_review).collect()
    }

    async fn update(&self, review: &Review) -> DomainResult<bool> {
        let result = sqlx::query("UPDATE reviews SET review = ?, rating = ?, version = ? WHERE id = ?")
            .bind(&review.review)
            .bind(review.rating)
            .bind(review.version)
            .bind(review.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ReviewRepository for MySqlReviewRepository {
    async fn find_by_tour(&self, tour_id: Uuid) -> DomainResult<Vec<Review>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE tour_id = ? ORDER BY created_at DESC"
        ))
        .bind(tour_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.iter().map(Self::row_to_review).collect()
    }

    async fn find_by_tour_and_user(
        &self,
        tour_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Option<Review>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE tour_id = ? AND user_id = ? LIMIT 1"
        ))
        .bind(tour_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        row.as_ref().map(Self::row_to_review).transpose()
    }

    async fn rating_stats(&self, tour_id: Uuid) -> DomainResult<RatingStats> {
        let (quantity, average): (i64, Option<f64>) =
            sqlx::query_as("SELECT COUNT(*), AVG(rating) FROM reviews WHERE tour_id = ?")
                .bind(tour_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(RatingStats {
            quantity: u32::try_from(quantity).unwrap_or(u32::MAX),
            average,
        })
    }
}
