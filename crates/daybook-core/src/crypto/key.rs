//! Key derivation using Argon2id.

use argon2::Argon2;
use zeroize::ZeroizeOnDrop;

use crate::error::{DaybookError, Result};

/// Argon2id parameters.
///
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1
const ARGON2_MEMORY_KB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;

/// Length of derived key in bytes.
const KEY_LENGTH: usize = 32;

/// Length of salts produced by [`random_salt`].
pub const SALT_LENGTH: usize = 16;

/// Key material derived from a secret, zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Raw key bytes. Avoid storing or logging this value.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Compare against another digest without short-circuiting on the first
    /// differing byte.
    pub fn matches(&self, other: &[u8]) -> bool {
        if other.len() != KEY_LENGTH {
            return false;
        }
        self.key
            .iter()
            .zip(other)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh random salt from the OS RNG.
pub fn random_salt() -> Result<[u8; SALT_LENGTH]> {
    let mut salt = [0u8; SALT_LENGTH];
    getrandom::getrandom(&mut salt)
        .map_err(|e| DaybookError::Crypto(format!("Failed to generate salt: {}", e)))?;
    Ok(salt)
}

/// Derive key material from a secret using Argon2id.
///
/// Same secret + salt always produces the same key. The salt must be at
/// least 16 bytes and is stored next to the digest.
pub fn derive_key(secret: &str, salt: &[u8]) -> Result<DerivedKey> {
    if secret.is_empty() {
        return Err(DaybookError::InvalidInput(
            "Secret cannot be empty".to_string(),
        ));
    }

    if salt.len() < SALT_LENGTH {
        return Err(DaybookError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            SALT_LENGTH
        )));
    }

    let params = argon2::Params::new(
        ARGON2_MEMORY_KB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(KEY_LENGTH),
    )
    .map_err(|e| DaybookError::Crypto(format!("Failed to create Argon2 params: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut key = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(secret.as_bytes(), salt, &mut key)
        .map_err(|e| DaybookError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey { key })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: &[u8] = b"daybook-test-salt-16b";

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_key("2580", SALT).unwrap();
        let b = derive_key("2580", SALT).unwrap();
        assert!(a.matches(b.as_bytes()));
    }

    #[test]
    fn test_different_salt_or_secret_differs() {
        let base = derive_key("2580", SALT).unwrap();
        let other_salt = derive_key("2580", b"another-salt-16bytes").unwrap();
        let other_secret = derive_key("0852", SALT).unwrap();
        assert!(!base.matches(other_salt.as_bytes()));
        assert!(!base.matches(other_secret.as_bytes()));
    }

    #[test]
    fn test_rejects_empty_secret_and_short_salt() {
        assert!(derive_key("", SALT).is_err());
        let err = derive_key("2580", b"short").unwrap_err();
        assert!(err.to_string().contains("Salt must be at least 16 bytes"));
    }

    #[test]
    fn test_matches_rejects_wrong_length() {
        let key = derive_key("2580", SALT).unwrap();
        assert!(!key.matches(&key.as_bytes()[..16]));
    }

    #[test]
    fn test_random_salts_differ() {
        assert_ne!(random_salt().unwrap(), random_salt().unwrap());
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = derive_key("2580", SALT).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&hex::encode(&key.as_bytes()[..4])));
    }
}
