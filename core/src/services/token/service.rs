//! Main token service implementation

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::errors::{DomainError, TokenError};

use super::claims::Claims;
use super::config::TokenServiceConfig;

/// Signs and verifies session tokens
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Lifetime of newly issued tokens in seconds
    pub fn expires_in(&self) -> i64 {
        self.config.expires_in_seconds
    }

    /// Issues a token for `user_id` valid from now
    pub fn sign(&self, user_id: Uuid) -> Result<String, DomainError> {
        self.sign_at(user_id, Utc::now())
    }

    /// Issues a token with an explicit issue time
    pub fn sign_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, DomainError> {
        let claims = Claims::new(
            user_id,
            issued_at,
            self.config.expires_in_seconds,
            &self.config.issuer,
        );
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Checks signature, issuer and expiry and returns the claims
    ///
    /// # Errors
    ///
    /// * `TokenError::TokenExpired` - the `exp` claim is in the past
    /// * `TokenError::InvalidToken` - anything else (bad signature, malformed, wrong issuer)
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                _ => DomainError::Token(TokenError::InvalidToken),
            })
    }
}
