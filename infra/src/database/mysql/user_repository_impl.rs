//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use tours_core::domain::entities::{Role, User};
use tours_core::errors::DomainResult;
use tours_core::query::QueryPlan;
use tours_core::repositories::{Repository, UserRepository};

use super::{get, get_uuid, id_list_query};
use crate::database::errors::{decode_error, map_sqlx_error};
use crate::database::query::select_query;

const COLUMNS: &str = "id, name, email, photo, role, password_hash, password_changed_at, \
    password_reset_token, password_reset_expires, active, created_at, version";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> DomainResult<User> {
        let role: String = get(row, "role")?;
        Ok(User {
            id: get_uuid(row, "id")?,
            name: get(row, "name")?,
            email: get(row, "email")?,
            photo: get(row, "photo")?,
            role: role.parse().map_err(|e| decode_error("role", e))?,
            password_hash: get(row, "password_hash")?,
            password_changed_at: get(row, "password_changed_at")?,
            password_reset_token: get(row, "password_reset_token")?,
            password_reset_expires: get(row, "password_reset_expires")?,
            active: get(row, "active")?,
            created_at: get(row, "created_at")?,
            version: get(row, "version")?,
        })
    }

    async fn fetch_one(&self, sql: &str, binds: &[String]) -> DomainResult<Option<User>> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(value);
        }
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .as_ref()
            .map(Self::row_to_user)
            .transpose()
    }
}

#[async_trait]
impl Repository<User> for MySqlUserRepository {
    async fn insert(&self, user: &User) -> DomainResult<()> {
        sqlx::query(&format!(
            "INSERT INTO users ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.photo)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(user.password_changed_at)
        .bind(&user.password_reset_token)
        .bind(user.password_reset_expires)
        .bind(user.active)
        .bind(user.created_at)
        .bind(user.version)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        self.fetch_one(
            &format!("SELECT {COLUMNS} FROM users WHERE id = ? AND active = TRUE LIMIT 1"),
            &[id.to_string()],
        )
        .await
    }

    async fn find_many(&self, plan: &QueryPlan) -> DomainResult<Vec<User>> {
        let rows = select_query(plan, COLUMNS)
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(Self::row_to_user).collect()
    }

    async fn update(&self, user: &User) -> DomainResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = ?, email = ?, photo = ?, role = ?, password_hash = ?,
                password_changed_at = ?, password_reset_token = ?, password_reset_expires = ?,
                active = ?, version = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.photo)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(user.password_changed_at)
        .bind(&user.password_reset_token)
        .bind(user.password_reset_expires)
        .bind(user.active)
        .bind(user.version)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.fetch_one(
            &format!("SELECT {COLUMNS} FROM users WHERE email = ? AND active = TRUE LIMIT 1"),
            &[email.trim().to_lowercase()],
        )
        .await
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM users \
             WHERE password_reset_token = ? AND password_reset_expires > ? AND active = TRUE \
             LIMIT 1"
        ))
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = id_list_query(
            &format!("SELECT {COLUMNS} FROM users WHERE active = TRUE AND id IN "),
            ids,
        )
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(Self::row_to_user).collect()
    }
}
