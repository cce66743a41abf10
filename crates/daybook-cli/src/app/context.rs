//! Application context for the Daybook CLI.
//!
//! Bundles CLI arguments with the loaded config so handlers don't thread
//! both through every call.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use daybook_core::{AgeSqliteStore, DaybookError, Journal, Settings};
use tracing::info;
use zeroize::Zeroizing;

use crate::cli::Cli;
use crate::config::{read_config, DaybookConfig};
use crate::errors::CliError;

use super::passphrase::open_with_retry;
use super::resolver::{
    missing_journal_hint, missing_journal_message, resolve_config_path, resolve_journal_path,
    resolve_settings_path,
};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: Option<DaybookConfig>,
}

impl<'a> AppContext<'a> {
    /// Build the context, reading the config file if one exists.
    pub fn load(cli: &'a Cli) -> anyhow::Result<Self> {
        let config_path = resolve_config_path()?;
        let config = if config_path.exists() {
            Some(read_config(&config_path)?)
        } else {
            None
        };
        Ok(Self { cli, config })
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Whether prompts may be shown.
    pub fn interactive(&self) -> bool {
        std::io::stdin().is_terminal() && !self.cli.no_input
    }

    /// Log filter from the config file, if set.
    pub fn log_level(&self) -> Option<&str> {
        self.config
            .as_ref()
            .and_then(|config| config.logging.level.as_deref())
    }

    pub fn journal_path(&self) -> Result<PathBuf, CliError> {
        resolve_journal_path(self.cli.journal.as_deref(), self.config.as_ref())
    }

    pub fn settings_path(&self, journal: &Path) -> PathBuf {
        resolve_settings_path(journal, self.config.as_ref())
    }

    /// Open the journal, applying pending migrations.
    pub fn open_session(&self) -> anyhow::Result<Session> {
        let journal_path = self.journal_path()?;
        if !journal_path.exists() {
            return Err(CliError::not_found(
                missing_journal_message(&journal_path),
                missing_journal_hint(),
            )
            .into());
        }

        let (store, passphrase) = open_with_retry(&journal_path, self.interactive())?;
        let journal = Journal::open(store).map_err(|err| match err {
            DaybookError::UnsupportedSchemaVersion { .. } => {
                anyhow::Error::new(CliError::UnsupportedVersion(format!(
                    "{}\nHint: Upgrade daybook to open this journal.",
                    err
                )))
            }
            other => other.into(),
        })?;

        let report = journal.migration_report();
        if !report.is_noop() {
            info!(
                target: "daybook::cli",
                applied = ?report.applied,
                "Applied journal migrations"
            );
        }

        Ok(Session {
            settings_path: self.settings_path(&journal_path),
            journal,
            passphrase,
        })
    }
}

/// An open journal plus what is needed to reach the settings store.
pub struct Session {
    pub journal: Journal<AgeSqliteStore>,
    settings_path: PathBuf,
    passphrase: Zeroizing<String>,
}

impl Session {
    /// Open the settings store with the journal passphrase, creating it on
    /// first use.
    pub fn open_settings(&self) -> anyhow::Result<Settings<AgeSqliteStore>> {
        let store = match AgeSqliteStore::open(&self.settings_path, &self.passphrase) {
            Ok(store) => store,
            Err(DaybookError::StoreNotFound) => {
                AgeSqliteStore::create(&self.settings_path, &self.passphrase)?;
                AgeSqliteStore::open(&self.settings_path, &self.passphrase)?
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Settings::new(store))
    }

    /// Persist the journal (including any migration) and release it.
    pub fn close(self) -> anyhow::Result<()> {
        self.journal.into_store().close()?;
        Ok(())
    }
}
