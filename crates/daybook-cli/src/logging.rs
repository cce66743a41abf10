//! Log output for the CLI.
//!
//! Core crates emit `tracing` events under `daybook::*` targets. They are
//! written to stderr so stdout stays parseable for `--json` and `export`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "DAYBOOK_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber.
///
/// `DAYBOOK_LOG` wins over the configured level; the default is `warn`.
pub fn init_logging(configured: Option<&str>) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_DIRECTIVE)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
