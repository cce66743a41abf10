use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use daybook_core::VERSION;

/// Daybook - an encrypted daily journal, one rated entry per day
#[derive(Parser)]
#[command(name = "daybook")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the journal file
    #[arg(short, long, global = true, env = "DAYBOOK_PATH")]
    pub journal: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_input: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the journal will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Path of the settings store (defaults next to the journal)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `write` command
#[derive(Args)]
pub struct WriteArgs {
    /// Day of the entry, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Rating from -1 (unrated) to 5
    #[arg(short, long, allow_hyphen_values = true, default_value_t = -1)]
    pub rating: i32,

    /// Entry text (read from stdin when omitted)
    #[arg(short, long)]
    pub text: Option<String>,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Day to show, YYYY-MM-DD (defaults to today)
    #[arg(value_name = "DATE")]
    pub date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Earliest day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Latest day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// Lowest rating, inclusive
    #[arg(long, allow_hyphen_values = true)]
    pub min_rating: Option<i32>,

    /// Highest rating, inclusive
    #[arg(long, allow_hyphen_values = true)]
    pub max_rating: Option<i32>,

    /// Case-insensitive text the entry must contain
    #[arg(long)]
    pub contains: Option<String>,

    /// Whole word the entry must contain (repeatable)
    #[arg(short, long = "word", value_name = "WORD")]
    pub words: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Pretty-print the JSON dump
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the `reset` command
#[derive(Args)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum DraftSubcommand {
    /// Save the in-progress entry
    Save(WriteArgs),

    /// Show the in-progress entry
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the in-progress entry to the journal and discard the draft
    Commit,

    /// Discard the in-progress entry
    Discard,
}

#[derive(Subcommand)]
pub enum PinSubcommand {
    /// Set or replace the app PIN
    Set {
        /// New PIN, 4 to 12 digits (prompted when omitted)
        #[arg(value_name = "PIN")]
        pin: Option<String>,
    },

    /// Remove the app PIN
    Clear,

    /// Check a PIN against the stored one
    Verify {
        /// PIN to check (prompted when omitted)
        #[arg(value_name = "PIN")]
        pin: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new encrypted journal and settings store
    Init(InitArgs),

    /// Write the entry for a day, replacing any existing one
    Write(WriteArgs),

    /// Show the entry for a day
    Show(ShowArgs),

    /// List entries matching filters
    List(ListArgs),

    /// Dump every stored key as one JSON object
    Export(ExportArgs),

    /// Check index consistency
    Check,

    /// Re-index orphaned entries and backfill month indexes
    Repair,

    /// Show the schema migration state
    Migrate,

    /// Delete everything in the journal
    Reset(ResetArgs),

    /// Manage the in-progress entry
    #[command(subcommand)]
    Draft(DraftSubcommand),

    /// Manage the app PIN
    #[command(subcommand)]
    Pin(PinSubcommand),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_rating_parses() {
        let cli = Cli::try_parse_from(["daybook", "write", "--rating", "-1", "--text", "x"]).unwrap();
        match cli.command {
            Some(Commands::Write(args)) => assert_eq!(args.rating, -1),
            _ => panic!("expected write"),
        }
    }
}
