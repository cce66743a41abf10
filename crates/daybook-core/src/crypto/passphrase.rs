//! Passphrase and PIN validation.

use crate::error::{DaybookError, Result};

/// Minimum passphrase length in characters.
const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Allowed PIN lengths (digits).
const MIN_PIN_DIGITS: usize = 4;
const MAX_PIN_DIGITS: usize = 12;

/// Validate that a store passphrase meets minimum requirements.
///
/// The passphrase must not be blank and must be at least 8 characters long.
///
/// # Examples
///
/// ```
/// use daybook_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("correct horse battery").is_ok());
/// assert!(validate_passphrase("short").is_err());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(DaybookError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    let length = passphrase.chars().count();
    if length < MIN_PASSPHRASE_LENGTH {
        return Err(DaybookError::InvalidInput(format!(
            "Passphrase must be at least {} characters (got {})",
            MIN_PASSPHRASE_LENGTH, length
        )));
    }

    Ok(())
}

/// Validate an app PIN: 4 to 12 ASCII digits.
pub fn validate_pin(pin: &str) -> Result<()> {
    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(DaybookError::InvalidInput(
            "PIN may only contain digits".to_string(),
        ));
    }
    if !(MIN_PIN_DIGITS..=MAX_PIN_DIGITS).contains(&pin.len()) {
        return Err(DaybookError::InvalidInput(format!(
            "PIN must be {} to {} digits",
            MIN_PIN_DIGITS, MAX_PIN_DIGITS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_passphrase() {
        assert!(validate_passphrase("my-secure-passphrase-123").is_ok());
        assert!(validate_passphrase("twelve chars").is_ok());
    }

    #[test]
    fn test_passphrase_too_short() {
        let err = validate_passphrase("short").unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn test_passphrase_blank() {
        assert!(validate_passphrase("").is_err());
        assert!(validate_passphrase("        ").is_err());
        assert!(validate_passphrase("\n\t").is_err());
    }

    #[test]
    fn test_passphrase_length_counts_characters() {
        // 8 characters, more than 8 bytes
        assert!(validate_passphrase("päivämää").is_ok());
    }

    #[test]
    fn test_pin_rules() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("000000000000").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("1234567890123").is_err());
        assert!(validate_pin("12a4").is_err());
        assert!(validate_pin("").is_err());
    }
}
