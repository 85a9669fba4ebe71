//! MySQL implementation of the BookingRepository trait.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use tours_core::domain::entities::Booking;
use tours_core::errors::DomainResult;
use tours_core::query::QueryPlan;
use tours_core::repositories::{BookingRepository, Repository};

use super::{get, get_uuid};
use crate::database::errors::map_sqlx_error;
use crate::database::query::select_query;

const COLUMNS: &str = "id, tour_id, user_id, price, paid, created_at, version";

pub struct MySqlBookingRepository {
    pool: MySqlPool,
}

impl MySqlBookingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_booking(row: &MySqlRow) -> DomainResult<Booking> {
        Ok(Booking {
            id: get_uuid(row, "id")?,
            tour: get_uuid(row, "tour_id")?,
            user: get_uuid(row, "user_id")?,
            price: get(row, "price")?,
            paid: get(row, "paid")?,
            created_at: get(row, "created_at")?,
            version: get(row, "version")?,
        })
    }
}

#[async_trait]
impl Repository<Booking> for MySqlBookingRepository {
    async fn insert(&self, booking: &Booking) -> DomainResult<()> {
        sqlx::query(&format!("INSERT INTO bookings ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"))
            .bind(booking.id.to_string())
            .bind(booking.tour.to_string())
            .bind(booking.user.to_string())
            .bind(booking.price)
            .bind(booking.paid)
            .bind(booking.created_at)
            .bind(booking.version)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM bookings WHERE id = ? LIMIT 1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(Self::row_to_booking).transpose()
    }

    async fn find_many(&self, plan: &QueryPlan) -> DomainResult<Vec<Booking>> {
        let rows = select_query(plan, COLUMNS)
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(Self::row_to_booking).collect()
    }

    async fn update(&self, booking: &Booking) -> DomainResult<bool> {
        let result = sqlx::query("UPDATE bookings SET price = ?, paid = ?, version = ? WHERE id = ?")
            .bind(booking.price)
            .bind(booking.paid)
            .bind(booking.version)
            .bind(booking.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BookingRepository for MySqlBookingRepository {
    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM bookings WHERE user_id = ? ORDER BY created_at DESC"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.iter().map(Self::row_to_booking).collect()
    }
}
