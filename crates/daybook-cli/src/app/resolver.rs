//! Path resolution for config, journal and settings files.

use std::path::{Path, PathBuf};

use crate::config::{default_config_path, default_settings_path, DaybookConfig};
use crate::errors::CliError;

/// Resolve the config file path, checking DAYBOOK_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("DAYBOOK_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the journal path from `--journal`/`DAYBOOK_PATH` or the config.
pub fn resolve_journal_path(
    flag: Option<&str>,
    config: Option<&DaybookConfig>,
) -> Result<PathBuf, CliError> {
    if let Some(path) = flag {
        return Ok(PathBuf::from(path));
    }
    match config {
        Some(config) => Ok(PathBuf::from(&config.journal.path)),
        None => Err(CliError::not_found(
            "No journal configured",
            missing_journal_hint(),
        )),
    }
}

/// Settings store path: the configured one, else next to the journal.
pub fn resolve_settings_path(journal: &Path, config: Option<&DaybookConfig>) -> PathBuf {
    config
        .and_then(|config| config.settings.path.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(|| default_settings_path(journal))
}

/// Error message when the journal file is missing.
pub fn missing_journal_message(path: &Path) -> String {
    format!("No journal found at {}", path.display())
}

pub fn missing_journal_hint() -> &'static str {
    "Hint: Run `daybook init`, or point at a journal with DAYBOOK_PATH=/path/to/journal.daybook"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_config() {
        let config = DaybookConfig::new(PathBuf::from("/from/config.daybook"), None);
        let path = resolve_journal_path(Some("/from/flag.daybook"), Some(&config)).unwrap();
        assert_eq!(path, PathBuf::from("/from/flag.daybook"));
    }

    #[test]
    fn test_missing_config_is_not_found() {
        let err = resolve_journal_path(None, None).unwrap_err();
        assert!(matches!(err, CliError::NotFound { .. }));
    }

    #[test]
    fn test_settings_path_from_config() {
        let config = DaybookConfig::new(
            PathBuf::from("/data/journal.daybook"),
            Some(PathBuf::from("/elsewhere/settings.daybook")),
        );
        assert_eq!(
            resolve_settings_path(Path::new("/data/journal.daybook"), Some(&config)),
            PathBuf::from("/elsewhere/settings.daybook")
        );
        assert_eq!(
            resolve_settings_path(Path::new("/data/journal.daybook"), None),
            PathBuf::from("/data/settings.daybook")
        );
    }
}
