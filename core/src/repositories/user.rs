//! User lookups used by the authentication flow

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::User;
use crate::errors::DomainResult;

use super::entity::Repository;
use super::memory::InMemoryRepository;

#[async_trait]
pub trait UserRepository: Repository<User> {
    /// Active user with this (normalized) email
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Active user holding this reset-token hash with an unexpired window
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<User>>;

    /// Active users among `ids`, in no particular order
    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<User>>;
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .find_visible(|user| user.email == email)
            .await
            .into_iter()
            .next())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<User>> {
        Ok(self
            .find_visible(|user| user.reset_token_matches(token_hash, now))
            .await
            .into_iter()
            .next())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<User>> {
        Ok(self.find_visible(|user| ids.contains(&user.id)).await)
    }
}
