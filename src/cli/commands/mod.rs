pub mod account;
pub mod budget;
pub mod config;
pub mod expense;
pub mod system;

use chrono::NaiveDate;
use wisewallet_domain::ExpenseId;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(account::definitions());
    commands.extend(expense::definitions());
    commands.extend(budget::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in all_entries() {
        registry.register(entry);
    }
}

/// Accepts plain decimals, optionally prefixed by the configured currency
/// symbol and using `,` as a thousands separator, e.g. `$1,200.50`. Anything
/// else, letters included, is rejected.
pub(crate) fn parse_amount(raw: &str, currency_symbol: &str) -> Result<f64, CommandError> {
    let invalid = || CommandError::InvalidArguments(format!("`{raw}` is not a valid amount"));
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let digits = unsigned
        .strip_prefix(currency_symbol)
        .unwrap_or(unsigned)
        .trim_start();
    let well_formed =
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',');
    if !well_formed {
        return Err(invalid());
    }
    let value: f64 = digits.replace(',', "").parse().map_err(|_| invalid())?;
    Ok(if negative { -value } else { value })
}

/// `MM/DD/YYYY` as shown in listings, or ISO `YYYY-MM-DD`.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| {
            CommandError::InvalidArguments(format!(
                "`{raw}` is not a valid date (use MM/DD/YYYY or YYYY-MM-DD)"
            ))
        })
}

pub(crate) fn parse_id(raw: &str) -> Result<ExpenseId, CommandError> {
    raw.trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid expense id")))
}

/// Matches `raw` against the configured categories ignoring case and returns
/// the configured spelling.
pub(crate) fn resolve_category(categories: &[String], raw: &str) -> Result<String, CommandError> {
    let wanted = raw.trim();
    categories
        .iter()
        .find(|name| name.eq_ignore_ascii_case(wanted))
        .cloned()
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "Unknown category `{wanted}`. Available: {}",
                categories.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_symbols_and_separators() {
        assert_eq!(parse_amount("12.5", "$").expect("plain"), 12.5);
        assert_eq!(parse_amount("$1,200.50", "$").expect("symbol"), 1200.5);
        assert_eq!(parse_amount("€ 40", "€").expect("spaced symbol"), 40.0);
        assert_eq!(parse_amount("-3", "$").expect("negative"), -3.0);
        assert!(parse_amount("twelve", "$").is_err());
        assert!(parse_amount("NaN", "$").is_err());
        assert!(parse_amount("inf", "$").is_err());
        assert!(parse_amount("", "$").is_err());
    }

    #[test]
    fn amounts_reject_stray_text() {
        assert!(parse_amount("abc12", "$").is_err());
        assert!(parse_amount("12abc", "$").is_err());
        assert!(parse_amount("€12", "$").is_err());
        assert!(parse_amount("1.2.3", "$").is_err());
    }

    #[test]
    fn dates_accept_us_and_iso_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 3).expect("date");
        assert_eq!(parse_date("10/03/2026").expect("us"), expected);
        assert_eq!(parse_date("2026-10-03").expect("iso"), expected);
        assert!(parse_date("03.10.2026").is_err());
    }

    #[test]
    fn ids_allow_a_hash_prefix() {
        assert_eq!(parse_id("#7").expect("id"), 7);
        assert!(parse_id("seven").is_err());
    }

    #[test]
    fn categories_resolve_to_configured_spelling() {
        let categories = vec!["Food".to_string(), "Transport".to_string()];
        assert_eq!(resolve_category(&categories, " food ").expect("match"), "Food");
        assert!(resolve_category(&categories, "Pets").is_err());
    }

    #[test]
    fn every_command_name_is_unique() {
        let entries = all_entries();
        let mut names: Vec<_> = entries.iter().map(|entry| entry.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), entries.len());
    }
}
