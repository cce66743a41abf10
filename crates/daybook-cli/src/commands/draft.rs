use daybook_core::Draft;

use crate::app::AppContext;
use crate::cli::{DraftSubcommand, WriteArgs};
use crate::errors::CliError;
use crate::helpers::{parse_date_or_today, read_text};
use crate::output::{draft_json, print_entry};

pub fn handle_draft(ctx: &AppContext, command: &DraftSubcommand) -> anyhow::Result<()> {
    match command {
        DraftSubcommand::Save(args) => handle_save(ctx, args),
        DraftSubcommand::Show { json } => handle_show(ctx, *json),
        DraftSubcommand::Commit => handle_commit(ctx),
        DraftSubcommand::Discard => handle_discard(ctx),
    }
}

fn handle_save(ctx: &AppContext, args: &WriteArgs) -> anyhow::Result<()> {
    let draft = Draft {
        text: read_text(args.text.as_deref())?,
        rating: args.rating,
        editing_started: parse_date_or_today(args.date.as_deref())?,
    };
    draft.to_entry().validate()?;

    let session = ctx.open_session()?;
    session.journal.save_draft(&draft)?;
    session.close()?;

    if !ctx.quiet() {
        println!("Draft saved.");
    }
    Ok(())
}

fn handle_show(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let draft = session.journal.load_draft()?;
    session.close()?;

    let draft = draft.ok_or_else(|| {
        CliError::not_found("No draft in progress", "Hint: Run `daybook draft save`.")
    })?;
    if json {
        println!("{}", serde_json::to_string_pretty(&draft_json(&draft))?);
    } else {
        print_entry(&draft.to_entry(), ctx.quiet());
    }
    Ok(())
}

fn handle_commit(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let committed = session.journal.commit_draft()?;
    session.close()?;

    let entry = committed.ok_or_else(|| {
        CliError::not_found("No draft in progress", "Hint: Run `daybook draft save`.")
    })?;
    if !ctx.quiet() {
        println!("Saved entry for {}", entry.date.format("%Y-%m-%d"));
    }
    Ok(())
}

fn handle_discard(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    session.journal.discard_draft()?;
    session.close()?;

    if !ctx.quiet() {
        println!("Draft discarded.");
    }
    Ok(())
}
