use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

/// User-adjustable preferences shared by every wallet front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_currency_precision")]
    pub currency_precision: u8,
    /// Percentage of a budget at which spending is flagged as a warning.
    #[serde(default = "Config::default_budget_warning_percent")]
    pub budget_warning_percent: f64,
    #[serde(default = "Config::default_auto_month_rollover")]
    pub auto_month_rollover: bool,
    #[serde(default = "Config::default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for wallet data. Defaults to the
    /// directory holding the config file.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            currency_precision: Self::default_currency_precision(),
            budget_warning_percent: Self::default_budget_warning_percent(),
            auto_month_rollover: Self::default_auto_month_rollover(),
            categories: Self::default_categories(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_root: None,
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::get`] and [`Config::set`].
    pub const KEYS: &'static [&'static str] = &[
        "currency_symbol",
        "currency_precision",
        "budget_warning_percent",
        "auto_month_rollover",
        "categories",
        "ui_color_enabled",
        "data_root",
    ];

    pub fn default_currency_symbol() -> String {
        "$".into()
    }

    pub fn default_currency_precision() -> u8 {
        2
    }

    pub fn default_budget_warning_percent() -> f64 {
        80.0
    }

    pub fn default_auto_month_rollover() -> bool {
        true
    }

    pub fn default_categories() -> Vec<String> {
        ["Food", "Transport", "Bills", "Entertainment", "Rent"]
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "currency_symbol" => self.currency_symbol.clone(),
            "currency_precision" => self.currency_precision.to_string(),
            "budget_warning_percent" => self.budget_warning_percent.to_string(),
            "auto_month_rollover" => self.auto_month_rollover.to_string(),
            "categories" => self.categories.join(", "),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "data_root" => self
                .data_root
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Parses `value` for `key` and applies it. Nothing changes on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "currency_symbol" => self.currency_symbol = non_empty(key, value)?,
            "currency_precision" => {
                let precision: u8 = parse(key, value)?;
                if precision > 6 {
                    return Err(invalid(key, "must be between 0 and 6"));
                }
                self.currency_precision = precision;
            }
            "budget_warning_percent" => {
                let percent: f64 = parse(key, value)?;
                if !(percent > 0.0 && percent <= 100.0) {
                    return Err(invalid(key, "must be greater than 0 and at most 100"));
                }
                self.budget_warning_percent = percent;
            }
            "auto_month_rollover" => self.auto_month_rollover = parse_bool(key, value)?,
            "categories" => {
                let categories: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
                if categories.is_empty() {
                    return Err(invalid(key, "at least one category is required"));
                }
                self.categories = categories;
            }
            "ui_color_enabled" => self.ui_color_enabled = parse_bool(key, value)?,
            "data_root" => {
                self.data_root = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Err(invalid(key, "cannot be empty"));
    }
    Ok(value.to_string())
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| invalid(key, &format!("`{value}` is not a number")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, "expected true or false")),
    }
}
