//! Daybook CLI - an encrypted daily journal
//!
//! This is the command-line interface for Daybook. It provides a user-friendly
//! interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;

use clap::Parser;
use daybook_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{draft, entries, init, maintenance, misc, pin};
use crate::errors::exit_code_for;
use crate::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    let ctx = match AppContext::load(&cli) {
        Ok(ctx) => ctx,
        Err(err) => {
            init_logging(None);
            report_and_exit(&err);
        }
    };
    init_logging(ctx.log_level());

    if let Err(err) = run(&ctx, &cli) {
        report_and_exit(&err);
    }
}

fn report_and_exit(err: &anyhow::Error) -> ! {
    eprintln!("Error: {:#}", err);
    std::process::exit(exit_code_for(err))
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Write(args)) => {
            entries::handle_write(ctx, args)?;
        }
        Some(Commands::Show(args)) => {
            entries::handle_show(ctx, args)?;
        }
        Some(Commands::List(args)) => {
            entries::handle_list(ctx, args)?;
        }
        Some(Commands::Export(args)) => {
            entries::handle_export(ctx, args)?;
        }
        Some(Commands::Check) => {
            maintenance::handle_check(ctx)?;
        }
        Some(Commands::Repair) => {
            maintenance::handle_repair(ctx)?;
        }
        Some(Commands::Migrate) => {
            maintenance::handle_migrate(ctx)?;
        }
        Some(Commands::Reset(args)) => {
            maintenance::handle_reset(ctx, args)?;
        }
        Some(Commands::Draft(command)) => {
            draft::handle_draft(ctx, command)?;
        }
        Some(Commands::Pin(command)) => {
            pin::handle_pin(ctx, command)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("Daybook v{}", VERSION);
            println!("\nQuickstart:");
            println!("  daybook init");
            println!("  daybook write --rating 4 --text \"Good day\"");
            println!("  daybook list --min-rating 3");
            println!("  daybook show 2023-03-12");
            println!("\nRun `daybook --help` for full usage.");
        }
    }

    Ok(())
}
