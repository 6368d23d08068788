use tracing::info;
use wisewallet_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config",
            "View and change preferences",
            "config [show|get <key>|set <key> <value>]",
            cmd_config,
        ),
        CommandEntry::new(
            "categories",
            "List the expense categories",
            "categories",
            cmd_categories,
        ),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "get" => {
            let [_, key] = args else {
                return Err(CommandError::InvalidArguments(
                    "usage: config get <key>".into(),
                ));
            };
            io::print_info(format!("{key} = {}", context.config.get(key)?));
            Ok(())
        }
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            set_config_value(context, key, value.trim())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{}`",
            other
        ))),
    }
}

fn show_config(context: &mut ShellContext) -> CommandResult {
    output_section("Configuration");
    for key in Config::KEYS {
        let value = context.config.get(key)?;
        let value = if value.is_empty() { "-".to_string() } else { value };
        io::print_info(format!("  {:<24} {}", key, value));
    }
    io::print_info(format!(
        "  {:<24} {}",
        "(config file)",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set(key, value)?;
    let root_changed = updated.data_root != context.config.data_root;
    context.config = updated;
    context.persist_config()?;
    info!(key, "configuration updated");
    io::print_success(format!("{key} set to {}", context.config.get(key)?));
    if root_changed {
        io::print_hint("Restart WiseWallet to open the wallet at the new data root.");
    }
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Categories");
    for category in &context.config.categories {
        io::print_info(format!("  {category}"));
    }
    io::print_hint("Change the list with `config set categories Food, Transport, ...`.");
    Ok(())
}
