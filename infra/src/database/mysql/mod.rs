//! MySQL repository implementations
//!
//! Ids are stored as `CHAR(36)`; nested arrays and geo points as JSON columns.

mod booking_repository_impl;
mod review_repository_impl;
mod tour_repository_impl;
mod user_repository_impl;

pub use booking_repository_impl::MySqlBookingRepository;
pub use review_repository_impl::MySqlReviewRepository;
pub use tour_repository_impl::MySqlTourRepository;
pub use user_repository_impl::MySqlUserRepository;

use sqlx::mysql::MySqlRow;
use sqlx::{MySql, QueryBuilder, Row};
use uuid::Uuid;

use tours_core::errors::DomainResult;

use super::errors::decode_error;

/// Reads a `CHAR(36)` id column
pub(crate) fn get_uuid(row: &MySqlRow, column: &str) -> DomainResult<Uuid> {
    let raw: String = row.try_get(column).map_err(|e| decode_error(column, e))?;
    Uuid::parse_str(&raw).map_err(|e| decode_error(column, e))
}

/// Reads any column with a direct sqlx mapping
pub(crate) fn get<'r, T>(row: &'r MySqlRow, column: &str) -> DomainResult<T>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(column).map_err(|e| decode_error(column, e))
}

/// `{prefix}(?, ?, ...)` with one bound id per entry
pub(crate) fn id_list_query(prefix: &str, ids: &[Uuid]) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(prefix);
    builder.push("(");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.to_string());
    }
    builder.push(")");
    builder
}
