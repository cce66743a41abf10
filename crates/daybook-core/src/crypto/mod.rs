//! Key derivation and secret validation.
//!
//! Journal contents are encrypted with age's passphrase recipient (scrypt),
//! see [`crate::store::encryption`]. This module covers the remaining secrets:
//!
//! - the store passphrase, which must meet minimum length rules
//! - the app PIN, which is never stored in clear; an Argon2id digest with a
//!   random salt is kept in the settings store instead

pub mod key;
pub mod passphrase;

pub use key::{derive_key, random_salt, DerivedKey, SALT_LENGTH};
pub use passphrase::{validate_passphrase, validate_pin};
