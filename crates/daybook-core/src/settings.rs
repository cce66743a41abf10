//! App settings kept in their own store, separate from journal data.
//!
//! The only setting is the app PIN. It is stored as
//! `argon2id$<salt hex>$<digest hex>`; an empty string means no PIN is set.

use tracing::info;

use crate::crypto::{derive_key, random_salt, validate_pin};
use crate::error::{DaybookError, Result};
use crate::store::KeyValueStore;

pub const PIN_KEY: &str = "pin";

const PIN_SCHEME: &str = "argon2id";

/// Settings handle over any key-value store.
#[derive(Debug)]
pub struct Settings<S> {
    store: S,
}

impl<S: KeyValueStore> Settings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Set or replace the PIN.
    ///
    /// # Errors
    ///
    /// `InvalidInput` unless the PIN is 4 to 12 ASCII digits.
    pub fn set_pin(&self, pin: &str) -> Result<()> {
        validate_pin(pin)?;
        let salt = random_salt()?;
        let digest = derive_key(pin, &salt)?;

        let encoded = format!(
            "{}${}${}",
            PIN_SCHEME,
            hex::encode(salt),
            hex::encode(digest.as_bytes())
        );
        self.store.set_string(PIN_KEY, &encoded)?;

        info!(target: "daybook::settings", "PIN updated");
        Ok(())
    }

    pub fn has_pin(&self) -> Result<bool> {
        Ok(self
            .store
            .get_string(PIN_KEY)?
            .is_some_and(|value| !value.is_empty()))
    }

    /// Check `pin` against the stored digest. Always `false` when no PIN is
    /// set.
    pub fn verify_pin(&self, pin: &str) -> Result<bool> {
        let stored = match self.store.get_string(PIN_KEY)? {
            Some(value) if !value.is_empty() => value,
            _ => return Ok(false),
        };
        if pin.is_empty() {
            return Ok(false);
        }

        let (salt, expected) = parse_pin_record(&stored)?;
        Ok(derive_key(pin, &salt)?.matches(&expected))
    }

    pub fn clear_pin(&self) -> Result<()> {
        self.store.set_string(PIN_KEY, "")?;
        info!(target: "daybook::settings", "PIN cleared");
        Ok(())
    }
}

fn parse_pin_record(stored: &str) -> Result<(Vec<u8>, Vec<u8>)> {
    let invalid = || DaybookError::Storage("Stored PIN record is malformed".to_string());

    let mut parts = stored.split('$');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(PIN_SCHEME), Some(salt), Some(digest), None) => {
            let salt = hex::decode(salt).map_err(|_| invalid())?;
            let digest = hex::decode(digest).map_err(|_| invalid())?;
            Ok((salt, digest))
        }
        _ => Err(invalid()),
    }
}
