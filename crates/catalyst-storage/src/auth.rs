use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::{Result, StorageError};

/// Random 48-character alphanumeric secret, used when no JWT secret is
/// configured.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

/// Hashes a password with bcrypt at the default cost.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| StorageError::Other(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).map_err(|e| StorageError::Other(e.to_string()))
}

/// Compares two secrets without short-circuiting on the first differing
/// byte.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("changeme").unwrap();
        assert!(verify_password("changeme", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn constant_time_eq_matches_only_equal_strings() {
        assert!(constant_time_eq("service-key", "service-key"));
        assert!(!constant_time_eq("service-key", "service-kez"));
        assert!(!constant_time_eq("short", "longer"));
    }

    #[test]
    fn generated_tokens_differ() {
        let a = generate_token();
        assert_eq!(a.len(), 48);
        assert_ne!(a, generate_token());
    }
}
