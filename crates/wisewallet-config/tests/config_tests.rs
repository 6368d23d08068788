use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;
use wisewallet_config::{Config, ConfigError, ConfigManager};

#[test]
fn default_config_matches_wallet_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.currency_symbol, "$");
    assert_eq!(cfg.budget_warning_percent, 80.0);
    assert!(cfg.auto_month_rollover);
    assert_eq!(
        cfg.categories,
        vec!["Food", "Transport", "Bills", "Entertainment", "Rent"]
    );
    assert_eq!(cfg.data_root, None);
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert_eq!(manager.load().expect("load default"), Config::default());

    let mut cfg = Config::default();
    cfg.currency_symbol = "€".to_string();
    cfg.auto_month_rollover = false;
    cfg.data_root = Some(dir.path().join("data"));

    manager.save(&cfg).expect("save config");
    assert!(manager.config_path().ends_with("config/config.json"));
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "currency_symbol": "£" }"#).expect("write config");

    let loaded = ConfigManager::new(path).load().expect("load config");
    assert_eq!(loaded.currency_symbol, "£");
    assert_eq!(loaded.currency_precision, 2);
    assert_eq!(loaded.categories.len(), 5);
}

#[test]
fn set_parses_and_validates_values() {
    let mut cfg = Config::default();
    cfg.set("budget_warning_percent", "90").expect("set percent");
    cfg.set("auto_month_rollover", "off").expect("set rollover");
    cfg.set("categories", "Food, Travel ,, Pets").expect("set categories");
    cfg.set("data_root", "/tmp/wallet").expect("set root");

    assert_eq!(cfg.budget_warning_percent, 90.0);
    assert!(!cfg.auto_month_rollover);
    assert_eq!(cfg.get("categories").expect("get"), "Food, Travel, Pets");
    assert_eq!(cfg.data_root, Some(PathBuf::from("/tmp/wallet")));

    assert!(matches!(
        cfg.set("budget_warning_percent", "150"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(cfg.set("theme", "dark"), Err(ConfigError::UnknownKey(_))));
    assert_eq!(cfg.budget_warning_percent, 90.0);
}
