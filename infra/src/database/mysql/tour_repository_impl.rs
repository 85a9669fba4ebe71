//! MySQL implementation of the TourRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::MySqlPool;
use uuid::Uuid;

use tours_core::domain::entities::{Difficulty, GeoPoint, Tour};
use tours_core::errors::DomainResult;
use tours_core::query::QueryPlan;
use tours_core::repositories::{Repository, TourRepository};

use super::{get, get_uuid, id_list_query};
use crate::database::errors::{decode_error, map_sqlx_error};
use crate::database::query::select_query;

const COLUMNS: &str = "id, name, slug, duration, max_group_size, difficulty, ratings_average, \
    ratings_quantity, price, price_discount, summary, description, image_cover, images, \
    start_dates, secret_tour, start_location, locations, guides, created_at, version";

/// MySQL implementation of TourRepository
pub struct MySqlTourRepository {
    pool: MySqlPool,
}

impl MySqlTourRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_tour(row: &MySqlRow) -> DomainResult<Tour> {
        let difficulty: String = get(row, "difficulty")?;
        let images: Json<Vec<String>> = get(row, "images")?;
        let start_dates: Json<Vec<DateTime<Utc>>> = get(row, "start_dates")?;
        let start_location: Option<Json<GeoPoint>> = get(row, "start_location")?;
        let locations: Json<Vec<GeoPoint>> = get(row, "locations")?;
        let guides: Json<Vec<Uuid>> = get(row, "guides")?;

        Ok(Tour {
            id: get_uuid(row, "id")?,
            name: get(row, "name")?,
            slug: get(row, "slug")?,
            duration: get(row, "duration")?,
            max_group_size: get(row, "max_group_size")?,
            difficulty: Difficulty::parse(&difficulty)
                .ok_or_else(|| decode_error("difficulty", &difficulty))?,
            ratings_average: get(row, "ratings_average")?,
            ratings_quantity: get(row, "ratings_quantity")?,
            price: get(row, "price")?,
            price_discount: get(row, "price_discount")?,
            summary: get(row, "summary")?,
            description: get(row, "description")?,
            image_cover: get(row, "image_cover")?,
            images: images.0,
            start_dates: start_dates.0,
            secret_tour: get(row, "secret_tour")?,
            start_location: start_location.map(|location| location.0),
            locations: locations.0,
            guides: guides.0,
            created_at: get(row, "created_at")?,
            version: get(row, "version")?,
        })
    }
}

#[async_trait]
impl Repository<Tour> for MySqlTourRepository {
    async fn insert(&self, tour: &Tour) -> DomainResult<()> {
        sqlx::query(&format!(
            "INSERT INTO tours ({COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(tour.id.to_string())
        .bind(&tour.name)
        .bind(&tour.slug)
        .bind(tour.duration)
        .bind(tour.max_group_size)
        .bind(tour.difficulty.as_str())
        .bind(tour.ratings_average)
        .bind(tour.ratings_quantity)
        .bind(tour.price)
        .bind(tour.price_discount)
        .bind(&tour.summary)
        .bind(&tour.description)
        .bind(&tour.image_cover)
        .bind(Json(&tour.images))
        .bind(Json(&tour.start_dates))
        .bind(tour.secret_tour)
        .bind(tour.start_location.as_ref().map(Json))
        .bind(Json(&tour.locations))
        .bind(Json(&tour.guides))
        .bind(tour.created_at)
        .bind(tour.version)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Tour>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM tours WHERE id = ? AND secret_tour = FALSE LIMIT 1"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        row.as_ref().map(Self::row_to_tour).transpose()
    }

    async fn find_many(&self, plan: &QueryPlan) -> DomainResult<Vec<Tour>> {
        let rows = select_query(plan, COLUMNS)
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(Self::row_to_tour).collect()
    }

    async fn update(&self, tour: &Tour) -> DomainResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tours SET
                name = ?, slug = ?, duration = ?, max_group_size = ?, difficulty = ?,
                ratings_average = ?, ratings_quantity = ?, price = ?, price_discount = ?,
                summary = ?, description = ?, image_cover = ?, images = ?, start_dates = ?,
                secret_tour = ?, start_location = ?, locations = ?, guides = ?, version = ?
            WHERE id = ?
            "#,
        )
        .bind(&tour.name)
        .bind(&tour.slug)
        .bind(tour.duration)
        .bind(tour.max_group_size)
        .bind(tour.difficulty.as_str())
        .bind(tour.ratings_average)
        .bind(tour.ratings_quantity)
        .bind(tour.price)
        .bind(tour.price_discount)
        .bind(&tour.summary)
        .bind(&tour.description)
        .bind(&tour.image_cover)
        .bind(Json(&tour.images))
        .bind(Json(&tour.start_dates))
        .bind(tour.secret_tour)
        .bind(tour.start_location.as_ref().map(Json))
        .bind(Json(&tour.locations))
        .bind(Json(&tour.guides))
        .bind(tour.version)
        .bind(tour.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM tours WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TourRepository for MySqlTourRepository {
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tour>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM tours WHERE slug = ? AND secret_tour = FALSE LIMIT 1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        row.as_ref().map(Self::row_to_tour).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<Tour>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = id_list_query(
            &format!("SELECT {COLUMNS} FROM tours WHERE secret_tour = FALSE AND id IN "),
            ids,
        )
        .build()
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.iter().map(Self::row_to_tour).collect()
    }

    async fn update_ratings(&self, id: Uuid, quantity: u32, average: f64) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE tours SET ratings_quantity = ?, ratings_average = ? WHERE id = ?",
        )
        .bind(quantity)
        .bind(average)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
