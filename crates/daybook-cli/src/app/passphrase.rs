//! Passphrase handling and store opening with retry logic.

use std::path::Path;

use daybook_core::{AgeSqliteStore, DaybookError};
use dialoguer::Password;
use zeroize::Zeroizing;

use crate::constants::MAX_PASSPHRASE_ATTEMPTS;
use crate::errors::CliError;

pub const PASSPHRASE_ENV: &str = "DAYBOOK_PASSPHRASE";

fn env_passphrase() -> Option<Zeroizing<String>> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(Zeroizing::new)
}

/// Prompt for the passphrase, or read it from DAYBOOK_PASSPHRASE.
pub fn prompt_passphrase(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = env_passphrase() {
        return Ok(value);
    }
    if !interactive {
        return Err(CliError::auth_failed_with_hint(
            "No passphrase provided and no TTY available",
            "Hint: Set DAYBOOK_PASSPHRASE.",
        )
        .into());
    }
    Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Prompt for a new passphrase with confirmation, or read DAYBOOK_PASSPHRASE.
pub fn prompt_init_passphrase(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = env_passphrase() {
        return Ok(value);
    }
    if !interactive {
        return Err(CliError::invalid_input(
            "No passphrase provided and no TTY available. Set DAYBOOK_PASSPHRASE.",
        )
        .into());
    }
    Password::new()
        .with_prompt("Enter passphrase")
        .with_confirmation("Confirm passphrase", "Passphrases do not match")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Open the store at `path`, re-prompting on a wrong passphrase.
///
/// A passphrase from the environment is tried once; a prompted one up to
/// [`MAX_PASSPHRASE_ATTEMPTS`] times.
pub fn open_with_retry(
    path: &Path,
    interactive: bool,
) -> anyhow::Result<(AgeSqliteStore, Zeroizing<String>)> {
    let from_env = env_passphrase().is_some();
    let attempts = if from_env || !interactive {
        1
    } else {
        MAX_PASSPHRASE_ATTEMPTS
    };

    for attempt in 1..=attempts {
        let passphrase = prompt_passphrase(interactive)?;
        match AgeSqliteStore::open(path, &passphrase) {
            Ok(store) => return Ok((store, passphrase)),
            Err(DaybookError::IncorrectPassphrase) if attempt < attempts => {
                eprintln!("Incorrect passphrase, try again.");
            }
            Err(DaybookError::IncorrectPassphrase) => {
                let hint = if from_env {
                    "Hint: DAYBOOK_PASSPHRASE does not match this journal."
                } else {
                    "Hint: Check your passphrase or set DAYBOOK_PASSPHRASE."
                };
                return Err(CliError::auth_failed_with_hint("Incorrect passphrase", hint).into());
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(CliError::auth_failed("Too many passphrase attempts").into())
}
