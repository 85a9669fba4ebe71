//! Password reset tokens: 32 random bytes, hex encoded, stored as sha256

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Returns `(plain_token, stored_hash)`
pub fn generate_reset_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    let hash = hash_reset_token(&token);
    (token, hash)
}

pub fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
