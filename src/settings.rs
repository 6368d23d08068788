//! Translates user configuration into wallet behaviour.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use wisewallet_config::Config;
use wisewallet_core::{
    AlertSink, CurrencyFormatter, DateFormatter, SymbolCurrencyFormatter, UsDateFormatter, Wallet,
    WalletSettings,
};
use wisewallet_storage_json::JsonFileStore;

use crate::errors::CliError;

pub fn wallet_settings(config: &Config) -> WalletSettings {
    WalletSettings {
        warning_percent: config.budget_warning_percent,
        auto_month_rollover: config.auto_month_rollover,
    }
}

/// Currency and date formatting driven by the active [`Config`].
#[derive(Debug, Clone)]
pub struct DisplayFormatters {
    currency: SymbolCurrencyFormatter,
    date: UsDateFormatter,
}

impl DisplayFormatters {
    pub fn from_config(config: &Config) -> Self {
        Self {
            currency: currency_formatter(config),
            date: UsDateFormatter,
        }
    }

    pub fn amount(&self, amount: f64) -> String {
        self.currency.format_amount(amount)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        self.date.format_date(date)
    }
}

impl Default for DisplayFormatters {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub fn currency_formatter(config: &Config) -> SymbolCurrencyFormatter {
    SymbolCurrencyFormatter::new(
        config.currency_symbol.clone(),
        usize::from(config.currency_precision),
    )
}

/// Opens the JSON-backed wallet rooted at `root`.
pub fn open_wallet(
    root: PathBuf,
    config: &Config,
    sink: Arc<dyn AlertSink>,
) -> Result<Wallet<JsonFileStore>, CliError> {
    info!(root = %root.display(), "opening wallet data");
    let store = JsonFileStore::new(root)?;
    Ok(Wallet::new(store)
        .with_alert_sink(sink)
        .with_settings(wallet_settings(config))
        .with_formatter(Box::new(currency_formatter(config))))
}

/// Pushes changed preferences into an already open wallet.
pub fn apply_to_wallet(config: &Config, wallet: &mut Wallet<JsonFileStore>) {
    wallet.set_settings(wallet_settings(config));
    wallet.set_formatter(Box::new(currency_formatter(config)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config() {
        let mut config = Config::default();
        config.budget_warning_percent = 65.0;
        config.auto_month_rollover = false;

        let settings = wallet_settings(&config);
        assert_eq!(settings.warning_percent, 65.0);
        assert!(!settings.auto_month_rollover);
    }

    #[test]
    fn formatters_use_configured_symbol_and_precision() {
        let mut config = Config::default();
        config.currency_symbol = "€".into();
        config.currency_precision = 0;

        let formatters = DisplayFormatters::from_config(&config);
        assert_eq!(formatters.amount(1234.4), "€1,234");
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).expect("date");
        assert_eq!(formatters.date(date), "03/07/2026");
    }
}
