//! Parsing and input helpers.

use std::io::{IsTerminal, Read};

use chrono::{Local, NaiveDate};

use crate::constants::DATE_FORMAT;
use crate::errors::CliError;

/// Parse a `YYYY-MM-DD` day.
pub fn parse_date(value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        CliError::invalid_input(format!("Invalid date (expected YYYY-MM-DD): {}", value))
    })
}

/// Parse an optional day, defaulting to today in local time.
pub fn parse_date_or_today(value: Option<&str>) -> Result<NaiveDate, CliError> {
    match value {
        Some(value) => parse_date(value),
        None => Ok(Local::now().date_naive()),
    }
}

/// Entry text from the flag, else from piped stdin.
pub fn read_text(flag: Option<&str>) -> anyhow::Result<String> {
    if let Some(text) = flag {
        return Ok(text.to_string());
    }
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(CliError::invalid_input(
            "No entry text provided. Pass --text or pipe text on stdin.",
        )
        .into());
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    Ok(text.trim_end_matches('\n').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2023-03-12").unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 12).unwrap()
        );
        assert!(parse_date("2023-3-32").is_err());
        assert!(parse_date("12/03/2023").is_err());
    }

    #[test]
    fn test_text_flag_wins() {
        assert_eq!(read_text(Some("hello")).unwrap(), "hello");
    }
}
