use std::path::PathBuf;

use wisewallet_config::Config;

/// Overrides the base directory when set.
pub const HOME_ENV: &str = "WISEWALLET_HOME";

const DATA_DIR_NAME: &str = ".wisewallet";

/// Directory holding `config/config.json` and, unless configured otherwise,
/// the wallet data.
pub fn base_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

/// A configured `data_root` wins; otherwise data lives in `base`.
pub fn data_root(config: &Config, base: &std::path::Path) -> PathBuf {
    config
        .data_root
        .clone()
        .unwrap_or_else(|| base.to_path_buf())
}
