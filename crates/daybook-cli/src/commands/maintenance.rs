//! Maintenance commands: check, repair, migrate, reset.

use dialoguer::Confirm;

use crate::app::AppContext;
use crate::cli::ResetArgs;
use crate::errors::CliError;

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let report = session.journal.check_integrity()?;
    session.close()?;

    if report.is_clean() {
        if !ctx.quiet() {
            println!("Integrity check: OK");
            println!("- entries indexed: {}", report.entries_indexed);
        }
        return Ok(());
    }

    eprintln!("Integrity check: FAILED");
    for (label, keys) in [
        ("missing from month index", &report.missing_from_month_index),
        (
            "months missing from month list",
            &report.months_missing_from_month_indexes,
        ),
        ("dangling index references", &report.dangling),
        ("orphaned entries", &report.orphaned),
        ("indexes with duplicates", &report.duplicates),
    ] {
        if !keys.is_empty() {
            eprintln!("- {}: {}", label, keys.join(", "));
        }
    }
    eprintln!("Hint: Run `daybook repair` to re-index orphaned entries.");
    Err(CliError::IntegrityFailed("Integrity check failed".to_string()).into())
}

pub fn handle_repair(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let report = session.journal.repair()?;
    session.close()?;

    if !ctx.quiet() {
        println!("Re-indexed entries: {}", report.reindexed.len());
        for key in &report.reindexed {
            println!("- {}", key);
        }
        println!("Month index members added: {}", report.backfilled);
    }
    Ok(())
}

pub fn handle_migrate(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let report = session.journal.migration_report().clone();
    session.close()?;

    if ctx.quiet() {
        println!("{}", report.to);
        return Ok(());
    }

    let from = report
        .from
        .map_or_else(|| "unversioned".to_string(), |version| version.to_string());
    if report.is_noop() {
        println!("Schema version {} is current.", report.to);
    } else {
        let applied: Vec<String> = report.applied.iter().map(u32::to_string).collect();
        println!("Upgraded schema from {} to {}", from, report.to);
        println!("- applied: {}", applied.join(", "));
        println!("- index members added: {}", report.backfilled);
    }
    Ok(())
}

pub fn handle_reset(ctx: &AppContext, args: &ResetArgs) -> anyhow::Result<()> {
    if !args.yes {
        if !ctx.interactive() {
            return Err(CliError::invalid_input(
                "Refusing to reset without confirmation. Pass --yes.",
            )
            .into());
        }
        let confirmed = Confirm::new()
            .with_prompt("Delete every entry in this journal? This cannot be undone")
            .default(false)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))?;
        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    let session = ctx.open_session()?;
    session.journal.clear()?;
    session.close()?;

    if !ctx.quiet() {
        println!("Journal cleared.");
    }
    Ok(())
}
