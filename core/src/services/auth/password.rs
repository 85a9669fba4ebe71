//! bcrypt hashing, run off the async executor

use crate::errors::{DomainError, DomainResult};

pub async fn hash_password(password: String, cost: u32) -> DomainResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| DomainError::internal(format!("password hashing task failed: {e}")))?
        .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))
}

/// False for a wrong password and for a hash bcrypt cannot read
pub async fn verify_password(password: String, hash: String) -> DomainResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| DomainError::internal(format!("password verification task failed: {e}")))
}
