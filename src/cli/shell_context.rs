use std::path::PathBuf;
use std::sync::Arc;

use dialoguer::theme::ColorfulTheme;
use wisewallet_config::{Config, ConfigManager};
use wisewallet_core::Wallet;
use wisewallet_storage_json::JsonFileStore;

use super::alert_sink::TerminalAlertSink;
use super::registry::{CommandEntry, CommandRegistry};
use crate::settings::DisplayFormatters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub wallet: Wallet<JsonFileStore>,
    pub alerts: Arc<TerminalAlertSink>,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub formatters: DisplayFormatters,
    pub data_root: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    /// `wisewallet(<user>) [<n> alerts]> `; either part is left out when
    /// there is no session or nothing is waiting in the tray.
    pub fn prompt(&self) -> String {
        let user = match self.wallet.current_user() {
            Ok(Some(user)) => format!("({})", user.username),
            _ => String::new(),
        };
        let badge = match self.alerts.pending() {
            0 => String::new(),
            1 => " [1 alert]".to_string(),
            count => format!(" [{count} alerts]"),
        };
        format!("wisewallet{user}{badge}> ")
    }
}
