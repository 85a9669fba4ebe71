//! Translation of driver errors into domain errors

use once_cell::sync::Lazy;
use regex::Regex;

use tours_core::errors::DomainError;

/// MySQL error number for a unique index violation
const ER_DUP_ENTRY: &str = "1062";

static DUPLICATE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Duplicate entry '(?P<value>.*)' for key '(?:\w+\.)?(?P<key>\w+)'")
        .expect("valid duplicate entry regex")
});

/// Maps a sqlx error, turning duplicate keys into `DomainError::Duplicate`
pub fn map_sqlx_error(error: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &error {
        if db.code().as_deref() == Some(ER_DUP_ENTRY) {
            return duplicate_from_message(db.message());
        }
    }
    tracing::error!(error = %error, "database query failed");
    DomainError::internal(format!("Database query failed: {}", error))
}

fn duplicate_from_message(message: &str) -> DomainError {
    match DUPLICATE_ENTRY.captures(message) {
        Some(caps) => DomainError::Duplicate {
            field: caps["key"].to_string(),
            value: caps["value"].to_string(),
        },
        None => DomainError::Duplicate {
            field: "unknown".to_string(),
            value: message.to_string(),
        },
    }
}

/// Maps a row decoding failure
pub fn decode_error(column: &str, error: impl std::fmt::Display) -> DomainError {
    DomainError::internal(format!("Failed to decode {}: {}", column, error))
}
