use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{Entity, User};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::crud::CrudService;

/// Body of `updateMe`; only name and email are applied
#[derive(Debug, Clone, Default)]
pub struct UpdateMeInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

pub struct UserService {
    crud: CrudService<User, dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            crud: CrudService::new(users),
        }
    }

    /// Admin CRUD over users
    pub fn crud(&self) -> &CrudService<User, dyn UserRepository> {
        &self.crud
    }

    /// Updates the caller's own name and email.
    ///
    /// Password fields are refused; they go through `updateMyPassword`.
    pub async fn update_me(&self, user_id: Uuid, input: UpdateMeInput) -> DomainResult<User> {
        if input.password.is_some() || input.password_confirm.is_some() {
            return Err(AuthError::PasswordUpdateNotAllowed.into());
        }

        let mut user = self.crud.get_one(user_id).await?;
        user.update_profile(input.name, input.email)?;
        user.touch();
        if !self.crud.repository().update(&user).await? {
            return Err(DomainError::not_found(User::schema().resource));
        }
        info!(%user_id, "profile updated");
        Ok(user)
    }

    /// Soft delete: the account stays stored but disappears from every read
    pub async fn delete_me(&self, user_id: Uuid) -> DomainResult<()> {
        let mut user = self.crud.get_one(user_id).await?;
        user.deactivate();
        user.touch();
        self.crud.repository().update(&user).await?;
        info!(%user_id, "account deactivated");
        Ok(())
    }
}
