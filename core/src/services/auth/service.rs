//! Main authentication service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::domain::entities::{validate_new_password, Entity, NewUser, Role, User};
use crate::domain::value_objects::AuthSession;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::email::{Email, EmailMessage, EmailServiceTrait};
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::password::{hash_password, verify_password};
use super::reset_token::{generate_reset_token, hash_reset_token};

/// Signup payload; the role is always `user`
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Authentication service handling sessions and credentials
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    email: Arc<dyn EmailServiceTrait>,
    config: AuthServiceConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        email: Arc<dyn EmailServiceTrait>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            users,
            tokens,
            email,
            config,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Registers a user and logs them in.
    ///
    /// A failed welcome email is logged; the account is still created.
    pub async fn signup(&self, input: SignupInput, welcome_url: &str) -> DomainResult<AuthSession> {
        User::new(input.name.as_str(), &input.email, "unhashed").validate()?;
        validate_new_password(&input.password, &input.password_confirm)?;

        let password_hash = hash_password(input.password, self.config.bcrypt_cost).await?;
        let user = User::from_input(NewUser {
            name: input.name,
            email: input.email,
            password_hash,
            role: Role::User,
            photo: None,
        })?;
        self.users.insert(&user).await?;
        info!(user_id = %user.id, "user signed up");

        if let Err(e) = self.deliver(Email::welcome(&user, welcome_url)).await {
            warn!(user_id = %user.id, error = %e, "failed to send welcome email");
        }

        self.issue_session(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthSession> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials.into());
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        self.issue_session(user)
    }

    /// Resolves the user behind a session token.
    ///
    /// Fails when the token is missing or invalid, when its user is gone or
    /// inactive, and when the password changed after the token was issued.
    pub async fn authorize(&self, token: Option<&str>) -> DomainResult<User> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::NotLoggedIn)?;

        let claims = self.tokens.verify(token)?;
        let user = self
            .users
            .find_by_id(claims.user_id()?)
            .await?
            .ok_or(AuthError::UserNoLongerExists)?;

        if user.changed_password_after(claims.issued_at_millis()) {
            return Err(AuthError::PasswordChangedAfterToken.into());
        }

        Ok(user)
    }

    /// Page-rendering variant of [`authorize`](Self::authorize); any failure means anonymous
    pub async fn current_user(&self, token: Option<&str>) -> Option<User> {
        self.authorize(token).await.ok()
    }

    pub fn restrict_to(&self, user: &User, roles: &[Role]) -> DomainResult<()> {
        if user.has_role(roles) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions.into())
        }
    }

    /// Stores a hashed reset token and mails the plain one as `{reset_url_prefix}{token}`.
    ///
    /// When the mail cannot be sent the token is withdrawn again.
    pub async fn forgot_password(&self, email: &str, reset_url_prefix: &str) -> DomainResult<()> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::EmailNotFound)?;

        let (token, token_hash) = generate_reset_token();
        let expires_at = Utc::now() + Duration::minutes(self.config.reset_token_ttl_minutes);
        user.set_password_reset(token_hash, expires_at);
        self.users.update(&user).await?;

        let url = format!("{reset_url_prefix}{token}");
        if let Err(e) = self.deliver(Email::password_reset(&user, &url)).await {
            warn!(user_id = %user.id, error = %e, "failed to send password reset email");
            user.clear_password_reset();
            self.users.update(&user).await?;
            return Err(AuthError::EmailDeliveryFailed.into());
        }

        info!(user_id = %user.id, "password reset token issued");
        Ok(())
    }

    /// Redeems a reset token; the token cannot be used twice
    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        password_confirm: &str,
    ) -> DomainResult<AuthSession> {
        let token_hash = hash_reset_token(token);
        let mut user = self
            .users
            .find_by_reset_token(&token_hash, Utc::now())
            .await?
            .ok_or(AuthError::ResetTokenInvalid)?;

        validate_new_password(password, password_confirm)?;
        self.replace_password(&mut user, password).await?;
        info!(user_id = %user.id, "password reset");

        self.issue_session(user)
    }

    /// Changes the password of a logged-in user after checking the current one
    pub async fn update_password(
        &self,
        user_id: uuid::Uuid,
        current_password: &str,
        password: &str,
        password_confirm: &str,
    ) -> DomainResult<AuthSession> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNoLongerExists)?;

        if !verify_password(current_password.to_string(), user.password_hash.clone()).await? {
            return Err(AuthError::IncorrectCurrentPassword.into());
        }

        validate_new_password(password, password_confirm)?;
        self.replace_password(&mut user, password).await?;
        info!(user_id = %user.id, "password updated");

        self.issue_session(user)
    }

    async fn replace_password(&self, user: &mut User, password: &str) -> DomainResult<()> {
        let password_hash = hash_password(password.to_string(), self.config.bcrypt_cost).await?;
        user.set_password_hash(password_hash);
        user.touch();
        if !self.users.update(user).await? {
            return Err(DomainError::not_found(User::schema().resource));
        }
        Ok(())
    }

    async fn deliver(&self, message: DomainResult<EmailMessage>) -> Result<(), String> {
        let message = message.map_err(|e| e.to_string())?;
        self.email.send(message).await
    }

    fn issue_session(&self, user: User) -> DomainResult<AuthSession> {
        Ok(AuthSession {
            token: self
                .tokens
                .sign_at(user.id, user.session_issued_at(Utc::now()))?,
            expires_in: self.tokens.expires_in(),
            user,
        })
    }
}
