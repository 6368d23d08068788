//! Command dispatch, error reporting and shell context construction.

use std::{io, path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use thiserror::Error;
use tracing::debug;
use wisewallet_config::{ConfigError, ConfigManager};
use wisewallet_core::{CoreError, WalletEvent};
use wisewallet_domain::Username;

pub use crate::errors::CliError;

use super::alert_sink::TerminalAlertSink;
use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::CommandRegistry;
pub use super::shell_context::{CliMode, ShellContext};
use crate::settings::{self, DisplayFormatters};
use crate::utils::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Config(inner) => CommandError::Config(inner),
            CliError::Input(message) => CommandError::InvalidArguments(message),
            CliError::Command(message) => CommandError::Message(message),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl ShellContext {
    /// Opens the wallet under [`paths::base_dir`].
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, paths::base_dir())
    }

    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        apply_output_preferences(&config, mode);

        let data_root = paths::data_root(&config, &base);
        let alerts = Arc::new(TerminalAlertSink::new());
        let wallet = settings::open_wallet(data_root.clone(), &config, alerts.clone())?;
        let formatters = DisplayFormatters::from_config(&config);

        // The tray shows alerts for the current session and month only.
        let tray = alerts.clone();
        wallet.feed().subscribe(move |event| {
            debug!(?event, "wallet event");
            if matches!(
                event,
                WalletEvent::NotificationsReset(_) | WalletEvent::SessionChanged(_)
            ) {
                tray.dismiss_all();
            }
        });

        Ok(ShellContext {
            mode,
            registry,
            wallet,
            alerts,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            formatters,
            data_root,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            debug!(command, "dispatching command");
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        super::shell::handle_line(self, line)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit WiseWallet?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(CoreError::Validation(invalid)) => {
                cli_io::print_error(invalid.message);
                Ok(())
            }
            CommandError::Core(CoreError::NoActiveSession) => {
                cli_io::print_error("No user is logged in.");
                cli_io::print_hint("Use `login` or `signup` first.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    /// The user data commands act on: the logged-in user or the fallback name.
    pub(crate) fn active_username(&self) -> Result<Username, CommandError> {
        Ok(self.wallet.current_username()?)
    }

    /// Saves the config and pushes it into the wallet and output layer.
    pub(crate) fn persist_config(&mut self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        settings::apply_to_wallet(&self.config, &mut self.wallet);
        self.formatters = DisplayFormatters::from_config(&self.config);
        apply_output_preferences(&self.config, self.mode);
        Ok(())
    }
}

fn apply_output_preferences(config: &wisewallet_config::Config, mode: CliMode) {
    output::set_preferences(OutputPreferences {
        color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        ..output::preferences()
    });
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base.to_path_buf())?;
    super::shell::run_lines(&mut app, lines.join("\n").as_bytes())?;
    Ok(app)
}
