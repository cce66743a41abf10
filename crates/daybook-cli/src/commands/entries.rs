//! Entry commands: write, show, list, export.

use daybook_core::{Entry, EntryFilter};

use crate::app::AppContext;
use crate::cli::{ExportArgs, ListArgs, ShowArgs, WriteArgs};
use crate::errors::CliError;
use crate::helpers::{parse_date, parse_date_or_today, read_text};
use crate::output::{entries_json, entry_json, print_entry, print_entry_list};

pub fn handle_write(ctx: &AppContext, args: &WriteArgs) -> anyhow::Result<()> {
    let date = parse_date_or_today(args.date.as_deref())?;
    let text = read_text(args.text.as_deref())?;
    let entry = Entry::new(date, args.rating, text);

    let session = ctx.open_session()?;
    session.journal.set_entry(&entry)?;
    session.close()?;

    if !ctx.quiet() {
        println!("Saved entry for {}", date.format("%Y-%m-%d"));
    }
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let date = parse_date_or_today(args.date.as_deref())?;

    let session = ctx.open_session()?;
    let entry = session.journal.get_entry(&date)?;
    session.close()?;

    let entry = entry.ok_or_else(|| {
        CliError::not_found(
            format!("No entry for {}", date.format("%Y-%m-%d")),
            "Hint: Run `daybook list` to see written days.",
        )
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entry_json(&entry))?);
    } else {
        print_entry(&entry, ctx.quiet());
    }
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let filter = build_filter(args)?;

    let session = ctx.open_session()?;
    let entries = session.journal.get_entries(&filter)?;
    session.close()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries_json(&entries))?);
    } else {
        print_entry_list(&entries, ctx.quiet());
    }
    Ok(())
}

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let dump = session.journal.dump()?;
    session.close()?;

    if args.pretty {
        let value: serde_json::Value = serde_json::from_str(&dump)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", dump);
    }
    Ok(())
}

fn build_filter(args: &ListArgs) -> Result<EntryFilter, CliError> {
    let mut filter = EntryFilter::new();
    if let Some(ref since) = args.since {
        filter = filter.min_date(parse_date(since)?);
    }
    if let Some(ref until) = args.until {
        filter = filter.max_date(parse_date(until)?);
    }
    if let Some(min) = args.min_rating {
        filter = filter.min_rating(min);
    }
    if let Some(max) = args.max_rating {
        filter = filter.max_rating(max);
    }
    if let Some(ref text) = args.contains {
        filter = filter.contains_text(text.clone());
    }
    if !args.words.is_empty() {
        filter = filter.contains_words(args.words.iter().cloned());
    }
    Ok(filter)
}
