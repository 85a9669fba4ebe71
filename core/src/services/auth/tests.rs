use std::sync::Arc;

use chrono::{Duration, Utc};

use super::*;
use crate::domain::entities::{Role, User};
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{InMemoryRepository, Repository, UserRepository};
use crate::services::mocks::RecordingEmail;
use crate::services::token::{TokenService, TokenServiceConfig};

const RESET_PREFIX: &str = "http://localhost:3000/api/v1/users/resetPassword/";

struct Fixture {
    service: AuthService,
    users: Arc<InMemoryRepository<User>>,
    email: RecordingEmail,
}

fn fixture_with(email: RecordingEmail) -> Fixture {
    let users = Arc::new(InMemoryRepository::<User>::new());
    let tokens = Arc::new(TokenService::new(TokenServiceConfig {
        secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
        expires_in_seconds: 3600,
        issuer: "natours".to_string(),
    }));
    Fixture {
        service: AuthService::new(
            users.clone(),
            tokens,
            Arc::new(email.clone()),
            AuthServiceConfig::fast(),
        ),
        users,
        email,
    }
}

fn fixture() -> Fixture {
    fixture_with(RecordingEmail::default())
}

fn signup_input(email: &str) -> SignupInput {
    SignupInput {
        name: "Jonas Schmedtmann".to_string(),
        email: email.to_string(),
        password: "pass1234".to_string(),
        password_confirm: "pass1234".to_string(),
    }
}

fn reset_token_from(f: &Fixture) -> String {
    let message = f.email.last().expect("reset email sent");
    let start = message.text.find(RESET_PREFIX).expect("reset url in text") + RESET_PREFIX.len();
    message.text[start..start + 64].to_string()
}

#[tokio::test]
async fn test_signup_hashes_password_and_sends_welcome() {
    let f = fixture();
    let session = f
        .service
        .signup(signup_input("Jonas@Example.com"), "http://localhost:3000/me")
        .await
        .unwrap();

    assert_eq!(session.user.email, "jonas@example.com");
    assert_eq!(session.user.role, Role::User);
    assert_ne!(session.user.password_hash, "pass1234");
    assert!(session.user.password_hash.starts_with("$2"));
    assert_eq!(session.expires_in, 3600);
    assert_eq!(f.email.count(), 1);
    assert_eq!(
        f.email.last().unwrap().subject,
        "Welcome to the Natours Family!"
    );
}

#[tokio::test]
async fn test_signup_survives_welcome_email_failure() {
    let f = fixture_with(RecordingEmail::failing());
    let session = f
        .service
        .signup(signup_input("jonas@example.com"), "http://localhost:3000/me")
        .await
        .unwrap();
    assert!(f.users.find_by_id(session.user.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_signup_rejects_mismatched_confirmation_and_duplicates() {
    let f = fixture();
    let mut input = signup_input("jonas@example.com");
    input.password_confirm = "different".to_string();
    assert!(matches!(
        f.service.signup(input, "").await,
        Err(DomainError::Validation { .. })
    ));

    f.service.signup(signup_input("jonas@example.com"), "").await.unwrap();
    assert!(matches!(
        f.service.signup(signup_input("jonas@example.com"), "").await,
        Err(DomainError::Duplicate { .. })
    ));
}

#[tokio::test]
async fn test_login_checks_credentials() {
    let f = fixture();
    f.service.signup(signup_input("jonas@example.com"), "").await.unwrap();

    assert!(f.service.login("jonas@example.com", "pass1234").await.is_ok());
    assert!(matches!(
        f.service.login("jonas@example.com", "wrongpass").await,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
    assert!(matches!(
        f.service.login("nobody@example.com", "pass1234").await,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
    assert!(matches!(
        f.service.login("", "pass1234").await,
        Err(DomainError::Auth(AuthError::MissingCredentials))
    ));
}

#[tokio::test]
async fn test_authorize_walks_the_token_states() {
    let f = fixture();
    let session = f.service.signup(signup_input("jonas@example.com"), "").await.unwrap();

    let user = f.service.authorize(Some(&session.token)).await.unwrap();
    assert_eq!(user.id, session.user.id);

    assert!(matches!(
        f.service.authorize(None).await,
        Err(DomainError::Auth(AuthError::NotLoggedIn))
    ));
    assert!(matches!(
        f.service.authorize(Some("loggedout")).await,
        Err(DomainError::Token(TokenError::InvalidToken))
    ));

    f.users.delete(session.user.id).await.unwrap();
    assert!(matches!(
        f.service.authorize(Some(&session.token)).await,
        Err(DomainError::Auth(AuthError::UserNoLongerExists))
    ));
}

#[tokio::test]
async fn test_token_issued_before_password_change_is_rejected() {
    let f = fixture();
    let session = f.service.signup(signup_input("jonas@example.com"), "").await.unwrap();
    let old_token = f
        .service
        .tokens()
        .sign_at(session.user.id, Utc::now() - Duration::seconds(30))
        .unwrap();

    let updated = f
        .service
        .update_password(session.user.id, "pass1234", "newpass123", "newpass123")
        .await
        .unwrap();

    assert!(matches!(
        f.service.authorize(Some(&old_token)).await,
        Err(DomainError::Auth(AuthError::PasswordChangedAfterToken))
    ));
    assert!(f.service.authorize(Some(&updated.token)).await.is_ok());
    assert!(f.service.current_user(Some(&old_token)).await.is_none());
}

#[tokio::test]
async fn test_fresh_token_is_rejected_after_password_change() {
    let f = fixture();
    let session = f.service.signup(signup_input("jonas@example.com"), "").await.unwrap();
    let recent_token = f
        .service
        .tokens()
        .sign_at(session.user.id, Utc::now() - Duration::seconds(1))
        .unwrap();

    let updated = f
        .service
        .update_password(session.user.id, "pass1234", "newpass123", "newpass123")
        .await
        .unwrap();

    for token in [&session.token, &recent_token] {
        assert!(matches!(
            f.service.authorize(Some(token)).await,
            Err(DomainError::Auth(AuthError::PasswordChangedAfterToken))
        ));
    }
    assert!(f.service.authorize(Some(&updated.token)).await.is_ok());

    let login = f.service.login("jonas@example.com", "newpass123").await.unwrap();
    assert!(f.service.authorize(Some(&login.token)).await.is_ok());
}

#[tokio::test]
async fn test_update_password_requires_current_password() {
    let f = fixture();
    let session = f.service.signup(signup_input("jonas@example.com"), "").await.unwrap();

    assert!(matches!(
        f.service
            .update_password(session.user.id, "wrongpass", "newpass123", "newpass123")
            .await,
        Err(DomainError::Auth(AuthError::IncorrectCurrentPassword))
    ));
}

#[tokio::test]
async fn test_reset_token_is_single_use() {
    let f = fixture();
    f.service.signup(signup_input("jonas@example.com"), "").await.unwrap();

    f.service
        .forgot_password("jonas@example.com", RESET_PREFIX)
        .await
        .unwrap();
    let token = reset_token_from(&f);

    let stored = f.users.find_by_email("jonas@example.com").await.unwrap().unwrap();
    assert_ne!(stored.password_reset_token.as_deref(), Some(token.as_str()));

    let session = f
        .service
        .reset_password(&token, "newpass123", "newpass123")
        .await
        .unwrap();
    assert!(session.user.password_reset_token.is_none());
    assert!(session.user.password_reset_expires.is_none());
    assert!(f.service.login("jonas@example.com", "newpass123").await.is_ok());

    assert!(matches!(
        f.service.reset_password(&token, "another123", "another123").await,
        Err(DomainError::Auth(AuthError::ResetTokenInvalid))
    ));
}

#[tokio::test]
async fn test_expired_reset_token_is_rejected() {
    let f = fixture();
    f.service.signup(signup_input("jonas@example.com"), "").await.unwrap();
    f.service
        .forgot_password("jonas@example.com", RESET_PREFIX)
        .await
        .unwrap();
    let token = reset_token_from(&f);

    let mut user = f.users.find_by_email("jonas@example.com").await.unwrap().unwrap();
    user.password_reset_expires = Some(Utc::now() - Duration::seconds(1));
    f.users.update(&user).await.unwrap();

    assert!(matches!(
        f.service.reset_password(&token, "newpass123", "newpass123").await,
        Err(DomainError::Auth(AuthError::ResetTokenInvalid))
    ));
}

#[tokio::test]
async fn test_forgot_password_for_unknown_email() {
    let f = fixture();
    assert!(matches!(
        f.service.forgot_password("ghost@example.com", RESET_PREFIX).await,
        Err(DomainError::Auth(AuthError::EmailNotFound))
    ));
}

#[tokio::test]
async fn test_failed_reset_email_withdraws_token() {
    let f = fixture_with(RecordingEmail::failing());
    f.service.signup(signup_input("jonas@example.com"), "").await.unwrap();

    assert!(matches!(
        f.service.forgot_password("jonas@example.com", RESET_PREFIX).await,
        Err(DomainError::Auth(AuthError::EmailDeliveryFailed))
    ));
    let user = f.users.find_by_email("jonas@example.com").await.unwrap().unwrap();
    assert!(user.password_reset_token.is_none());
}

#[tokio::test]
async fn test_restrict_to() {
    let f = fixture();
    let admin = User::new("Admin", "admin@example.com", "hash").with_role(Role::Admin);
    let user = User::new("Plain User", "user@example.com", "hash");

    assert!(f.service.restrict_to(&admin, &[Role::Admin, Role::LeadGuide]).is_ok());
    assert!(matches!(
        f.service.restrict_to(&user, &[Role::Admin]),
        Err(DomainError::Auth(AuthError::InsufficientPermissions))
    ));
}
