//! Application-level utilities for the Daybook CLI.
//!
//! This module provides:
//! - Path resolution for config, journal and settings files
//! - Passphrase handling with retry logic
//! - The open journal session shared by command handlers

mod context;
mod passphrase;
mod resolver;

pub use context::{AppContext, Session};
pub use passphrase::prompt_init_passphrase;
pub use resolver::resolve_config_path;
