//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes; anything else exits with 1.

use std::fmt;

use daybook_core::DaybookError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, journal, entry)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong passphrase or PIN)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Integrity check reported problems
    IntegrityFailed(String),

    /// Journal schema is newer than this build
    UnsupportedVersion(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message)
            | CliError::IntegrityFailed(message)
            | CliError::UnsupportedVersion(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
            CliError::UnsupportedVersion(_) => exit_codes::UNSUPPORTED_VERSION,
        }
    }
}

/// Exit code for an error returned from a command handler.
///
/// Typed errors anywhere in the chain decide the code; anything else is 1.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(cli) = cause.downcast_ref::<CliError>() {
            return cli.exit_code();
        }
        if let Some(core) = cause.downcast_ref::<DaybookError>() {
            return match core {
                DaybookError::IncorrectPassphrase => exit_codes::AUTH_FAILED,
                DaybookError::StoreNotFound => exit_codes::NOT_FOUND,
                DaybookError::UnsupportedSchemaVersion { .. } => exit_codes::UNSUPPORTED_VERSION,
                DaybookError::Validation(_) | DaybookError::InvalidInput(_) => {
                    exit_codes::INVALID_INPUT
                }
                _ => 1,
            };
        }
    }
    1
}
