//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, journal, entry).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong passphrase or PIN, too many attempts).
    pub const AUTH_FAILED: i32 = 5;

    /// Integrity check found inconsistent indexes.
    pub const INTEGRITY_FAILED: i32 = 6;

    /// Journal was written by a newer daybook.
    pub const UNSUPPORTED_VERSION: i32 = 7;
}

/// Attempts allowed for an interactive passphrase prompt.
pub const MAX_PASSPHRASE_ATTEMPTS: usize = 3;

/// Date format accepted and printed by the CLI.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
