//! Age passphrase encryption for store snapshots.
//!
//! Age uses scrypt internally for passphrase recipients; the whole serialized
//! database is one age payload.

use std::io::{Read, Write};
use std::iter;

use age::secrecy::SecretString;

use crate::error::{DaybookError, Result};

/// Encrypt a plaintext snapshot with the store passphrase.
///
/// # Examples
///
/// ```
/// use age::secrecy::SecretString;
/// use daybook_core::store::encryption::encrypt;
///
/// let passphrase = SecretString::from("my-secure-passphrase".to_string());
/// let encrypted = encrypt(b"dear diary", &passphrase).unwrap();
/// assert_ne!(encrypted.as_slice(), b"dear diary");
/// ```
pub fn encrypt(plaintext: &[u8], passphrase: &SecretString) -> Result<Vec<u8>> {
    let encryptor = age::Encryptor::with_user_passphrase(passphrase.clone());

    let mut encrypted = Vec::with_capacity(plaintext.len() + 256);
    let mut writer = encryptor
        .wrap_output(&mut encrypted)
        .map_err(|e| DaybookError::Crypto(format!("Failed to create encryptor: {}", e)))?;
    writer
        .write_all(plaintext)
        .map_err(|e| DaybookError::Crypto(format!("Encryption write failed: {}", e)))?;
    writer
        .finish()
        .map_err(|e| DaybookError::Crypto(format!("Encryption finish failed: {}", e)))?;

    Ok(encrypted)
}

/// Decrypt a snapshot produced by [`encrypt`].
///
/// A wrong passphrase maps to [`DaybookError::IncorrectPassphrase`]; any
/// other failure (truncated or corrupted file) is [`DaybookError::Crypto`].
pub fn decrypt(encrypted: &[u8], passphrase: &SecretString) -> Result<Vec<u8>> {
    let decryptor = age::Decryptor::new(encrypted)
        .map_err(|e| DaybookError::Crypto(format!("Failed to create decryptor: {}", e)))?;

    let identity = age::scrypt::Identity::new(passphrase.clone());
    let mut reader = decryptor
        .decrypt(iter::once(&identity as &dyn age::Identity))
        .map_err(|e| match e {
            age::DecryptError::NoMatchingKeys
            | age::DecryptError::DecryptionFailed
            | age::DecryptError::KeyDecryptionFailed => DaybookError::IncorrectPassphrase,
            other => DaybookError::Crypto(format!("Decryption failed: {}", other)),
        })?;

    let mut plaintext = Vec::new();
    reader
        .read_to_end(&mut plaintext)
        .map_err(|e| DaybookError::Crypto(format!("Failed to read decrypted data: {}", e)))?;

    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn test_round_trip() {
        let passphrase = secret("test-passphrase-secure-123");
        let encrypted = encrypt(b"rating 4, good day", &passphrase).unwrap();
        assert_eq!(decrypt(&encrypted, &passphrase).unwrap(), b"rating 4, good day");
    }

    #[test]
    fn test_wrong_passphrase_is_reported_as_such() {
        let encrypted = encrypt(b"secret", &secret("correct-passphrase-1")).unwrap();
        let result = decrypt(&encrypted, &secret("wrong-passphrase-2"));
        assert!(matches!(result, Err(DaybookError::IncorrectPassphrase)));
    }

    #[test]
    fn test_corrupted_payload_fails() {
        let passphrase = secret("test-passphrase-secure-123");
        let mut encrypted = encrypt(b"secret", &passphrase).unwrap();
        let middle = encrypted.len() / 2;
        encrypted[middle] ^= 0xFF;
        assert!(decrypt(&encrypted, &passphrase).is_err());
    }

    #[test]
    fn test_not_an_age_file() {
        let result = decrypt(b"plain sqlite bytes", &secret("test-passphrase-1"));
        assert!(matches!(result, Err(DaybookError::Crypto(_))));
    }
}
