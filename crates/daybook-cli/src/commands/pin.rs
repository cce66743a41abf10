use dialoguer::Password;
use zeroize::Zeroizing;

use crate::app::AppContext;
use crate::cli::PinSubcommand;
use crate::errors::CliError;

pub fn handle_pin(ctx: &AppContext, command: &PinSubcommand) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let settings = session.open_settings()?;

    let result = match command {
        PinSubcommand::Set { pin } => {
            let pin = read_pin(ctx, pin.as_deref(), true)?;
            settings.set_pin(&pin)?;
            if !ctx.quiet() {
                println!("PIN set.");
            }
            Ok(())
        }
        PinSubcommand::Clear => {
            settings.clear_pin()?;
            if !ctx.quiet() {
                println!("PIN cleared.");
            }
            Ok(())
        }
        PinSubcommand::Verify { pin } => {
            if !settings.has_pin()? {
                Err(CliError::not_found("No PIN is set", "Hint: Run `daybook pin set`.").into())
            } else {
                let pin = read_pin(ctx, pin.as_deref(), false)?;
                if settings.verify_pin(&pin)? {
                    if !ctx.quiet() {
                        println!("PIN OK.");
                    }
                    Ok(())
                } else {
                    Err(CliError::auth_failed("Incorrect PIN").into())
                }
            }
        }
    };

    settings.into_store().close()?;
    session.close()?;
    result
}

fn read_pin(
    ctx: &AppContext,
    given: Option<&str>,
    confirm: bool,
) -> anyhow::Result<Zeroizing<String>> {
    if let Some(pin) = given {
        return Ok(Zeroizing::new(pin.to_string()));
    }
    if !ctx.interactive() {
        return Err(CliError::invalid_input("No PIN provided and no TTY available.").into());
    }
    let mut prompt = Password::new().with_prompt("PIN");
    if confirm {
        prompt = prompt.with_confirmation("Confirm PIN", "PINs do not match");
    }
    prompt
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read PIN: {}", e))
}
