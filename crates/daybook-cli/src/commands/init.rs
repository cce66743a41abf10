//! `daybook init`: create the journal, the settings store and the config.

use std::path::{Path, PathBuf};

use daybook_core::{AgeSqliteStore, Journal};

use crate::app::{prompt_init_passphrase, resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_journal_path, write_config, DaybookConfig};
use crate::errors::CliError;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let journal_path = match args.path.as_deref().or(ctx.cli().journal.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => default_journal_path()?,
    };
    if journal_path.exists() {
        return Err(CliError::invalid_input(format!(
            "A journal already exists at {}",
            journal_path.display()
        ))
        .into());
    }
    let settings_path = args
        .settings
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| ctx.settings_path(&journal_path));

    let passphrase = prompt_init_passphrase(ctx.interactive())?;

    ensure_parent(&journal_path)?;
    let store_id = AgeSqliteStore::create(&journal_path, &passphrase)?;
    // Opening stamps the schema marker on the new store.
    let journal = Journal::open(AgeSqliteStore::open(&journal_path, &passphrase)?)?;
    journal.into_store().close()?;

    if !settings_path.exists() {
        ensure_parent(&settings_path)?;
        AgeSqliteStore::create(&settings_path, &passphrase)?;
    }

    let config_path = resolve_config_path()?;
    let wrote_config = if config_path.exists() && !args.force {
        false
    } else {
        let settings = args.settings.as_ref().map(|_| settings_path.clone());
        write_config(&config_path, &DaybookConfig::new(journal_path.clone(), settings))?;
        true
    };

    if !ctx.quiet() {
        println!("Initialized new journal at {}", journal_path.display());
        println!("Journal ID: {}", store_id);
        if wrote_config {
            println!("Config written to {}", config_path.display());
        } else {
            println!(
                "Kept existing config at {} (use --force to replace it)",
                config_path.display()
            );
        }
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
        })?;
    }
    Ok(())
}
