use std::{
    collections::HashMap,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use tracing::info;
use wisewallet_config::Config;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output::info as output_info;

/// Set to any value to read commands from stdin without prompts or colors.
pub const SCRIPT_ENV: &str = "WISEWALLET_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    info!(?mode, root = %context.data_root.display(), "shell started");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_lines(&mut context, io::stdin().lock()),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<WalletHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(WalletHelper::from_context(context)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    greet(context);

    while context.running {
        let line = match editor.readline(&context.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
                continue;
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting WiseWallet.");
                break;
            }
            Err(err) => return Err(err.into()),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        editor.add_history_entry(trimmed).ok();

        let outcome = handle_line(context, trimmed);
        // `config set categories` may have changed what completes.
        if let Some(helper) = editor.helper_mut() {
            helper.set_categories(&context.config.categories);
        }
        match outcome {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }

    Ok(())
}

fn greet(context: &ShellContext) {
    match context.wallet.current_user() {
        Ok(Some(user)) => output_info(format!("Welcome back, {}.", user.username)),
        _ => cli_io::print_hint("Use `signup` to create an account or `login` to continue."),
    }
    cli_io::print_hint("Type `help` to see available commands. Press `?` or Tab to complete.");
}

/// Runs one command per line until the input ends or a command exits.
pub(crate) fn run_lines<R: BufRead>(context: &mut ShellContext, input: R) -> Result<(), CliError> {
    for line in input.lines() {
        if !context.running {
            break;
        }
        match handle_line(context, &line?) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

/// Blank lines and `#` comments are skipped.
pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = match parse_command_line(trimmed) {
        Ok(tokens) if !tokens.is_empty() => tokens,
        Ok(_) => return Ok(LoopControl::Continue),
        Err(err) => {
            cli_io::print_warning(err);
            return Ok(LoopControl::Continue);
        }
    };

    let raw = &tokens[0];
    let args: Vec<&str> = tokens[1..].iter().map(String::as_str).collect();
    context.last_command = Some(trimmed.to_string());

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Completion and usage hints for the interactive editor.
///
/// Knows the command words, each command's subcommands, the config keys and
/// the configured expense categories.
struct WalletHelper {
    commands: Vec<String>,
    /// Alias or name to canonical command name.
    canonical: HashMap<String, &'static str>,
    usages: HashMap<&'static str, &'static str>,
    categories: Vec<String>,
}

/// What the word under the cursor should complete to.
#[derive(Debug, PartialEq, Eq)]
enum Slot {
    Command,
    Subcommand(&'static [&'static str]),
    Category,
    ConfigKey,
    Nothing,
}

impl WalletHelper {
    fn from_context(context: &ShellContext) -> Self {
        let mut commands = Vec::new();
        let mut canonical = HashMap::new();
        let mut usages = HashMap::new();
        for name in context.command_names() {
            if let Some(entry) = context.command(name) {
                commands.push(name.to_ascii_lowercase());
                canonical.insert(name.to_ascii_lowercase(), entry.name);
                usages.insert(entry.name, entry.usage);
            }
        }
        commands.sort();
        commands.dedup();
        Self {
            commands,
            canonical,
            usages,
            categories: context.config.categories.clone(),
        }
    }

    fn set_categories(&mut self, categories: &[String]) {
        self.categories = categories.to_vec();
    }

    fn slot(&self, words: &[String]) -> Slot {
        let Some(first) = words.first() else {
            return Slot::Command;
        };
        let Some(&command) = self.canonical.get(&first.to_ascii_lowercase()) else {
            return Slot::Nothing;
        };
        let sub = words.get(1).map(|word| word.to_ascii_lowercase());
        match (command, words.len(), sub.as_deref()) {
            ("help", 1, _) => Slot::Command,
            ("budget", 1, _) => Slot::Subcommand(&["monthly", "category", "show"]),
            ("budget", 2, Some("category")) => Slot::Category,
            ("profile", 1, _) => Slot::Subcommand(&["show", "edit", "set"]),
            ("config", 1, _) => Slot::Subcommand(&["show", "get", "set"]),
            ("config", 2, Some("get" | "set")) => Slot::ConfigKey,
            ("notifications", 1, _) => Slot::Subcommand(&["clear"]),
            ("list", 1, _) | ("add", 2, _) | ("edit", 3, _) => Slot::Category,
            _ => Slot::Nothing,
        }
    }

    fn candidates(&self, words: &[String], needle: &str) -> Vec<String> {
        let needle = needle.to_ascii_lowercase();
        let matches = |word: &&str| word.to_ascii_lowercase().starts_with(&needle);
        match self.slot(words) {
            Slot::Command => self
                .commands
                .iter()
                .map(String::as_str)
                .filter(matches)
                .map(str::to_string)
                .collect(),
            Slot::Subcommand(options) => options
                .iter()
                .copied()
                .filter(matches)
                .map(str::to_string)
                .collect(),
            Slot::Category => self
                .categories
                .iter()
                .map(String::as_str)
                .filter(matches)
                .map(quote_if_needed)
                .collect(),
            Slot::ConfigKey => Config::KEYS
                .iter()
                .copied()
                .filter(matches)
                .map(str::to_string)
                .collect(),
            Slot::Nothing => Vec::new(),
        }
    }

    /// After `<command> ` with nothing else typed, shows the rest of its usage.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let command = line.strip_suffix(' ')?;
        if command.contains(char::is_whitespace) {
            return None;
        }
        let name = self.canonical.get(&command.to_ascii_lowercase())?;
        let usage = self.usages.get(name)?;
        let rest = usage.split_once(' ')?.1;
        Some(rest.to_string())
    }
}

fn quote_if_needed(word: &str) -> String {
    if word.contains(char::is_whitespace) {
        format!("\"{word}\"")
    } else {
        word.to_string()
    }
}

impl Helper for WalletHelper {}

impl Completer for WalletHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let Ok(words) = split(&prefix[..start]) else {
            return Ok((start, Vec::new()));
        };
        let pairs = self
            .candidates(&words, &prefix[start..])
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for WalletHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for WalletHelper {}

impl Validator for WalletHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn helper() -> (TempDir, WalletHelper) {
        let dir = TempDir::new().expect("temp dir");
        let context = ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf())
            .expect("context");
        let helper = WalletHelper::from_context(&context);
        (dir, helper)
    }

    fn words(line: &str) -> Vec<String> {
        split(line).expect("split")
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"add "Coffee beans" Food 12.50"#).expect("parse");
        assert_eq!(tokens, vec!["add", "Coffee beans", "Food", "12.50"]);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line(r#"add "Coffee Food 3"#).is_err());
    }

    #[test]
    fn command_words_complete_including_aliases() {
        let (_dir, helper) = helper();
        assert_eq!(helper.candidates(&[], "bu"), vec!["budget"]);
        assert_eq!(helper.candidates(&[], "q"), vec!["quit"]);
        assert_eq!(helper.candidates(&words("help"), "summ"), vec!["summary"]);
    }

    #[test]
    fn subcommands_complete_per_command() {
        let (_dir, helper) = helper();
        assert_eq!(helper.candidates(&words("budget"), "c"), vec!["category"]);
        assert_eq!(helper.candidates(&words("profile"), "s"), vec!["show", "set"]);
        assert_eq!(helper.candidates(&words("notifications"), ""), vec!["clear"]);
        assert_eq!(
            helper.candidates(&words("config get"), "auto"),
            vec!["auto_month_rollover"]
        );
    }

    #[test]
    fn category_arguments_use_the_configured_list() {
        let (_dir, mut helper) = helper();
        assert_eq!(helper.candidates(&words("budget category"), "f"), vec!["Food"]);
        assert_eq!(helper.candidates(&words("add Lunch"), "F"), vec!["Food"]);
        assert_eq!(helper.candidates(&words("ls"), "r"), vec!["Rent"]);
        assert!(helper.candidates(&words("add"), "F").is_empty());

        helper.set_categories(&["Pet Care".to_string()]);
        assert_eq!(helper.candidates(&words("list"), "p"), vec!["\"Pet Care\""]);
        assert!(helper.candidates(&words("list"), "f").is_empty());
    }

    #[test]
    fn usage_hint_follows_a_bare_command() {
        let (_dir, helper) = helper();
        assert_eq!(helper.usage_hint("rm ").as_deref(), Some("<id>"));
        assert_eq!(
            helper.usage_hint("budget ").as_deref(),
            Some("<monthly <amount>|category <name> <amount>|show>")
        );
        assert_eq!(helper.usage_hint("budget"), None);
        assert_eq!(helper.usage_hint("budget show "), None);
        assert_eq!(helper.usage_hint("logout "), None);
    }

    #[test]
    fn script_lines_skip_comments_and_blanks() {
        let dir = TempDir::new().expect("temp dir");
        let mut context = ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf())
            .expect("context");
        let script = "# setup\n\nadd Lunch Food 12\nexit\nadd Dinner Food 30\n";
        run_lines(&mut context, script.as_bytes()).expect("script");

        let user = context.active_username().expect("user");
        assert_eq!(context.wallet.expenses(&user).expect("expenses").len(), 1);
        assert!(!context.running);
        assert_eq!(context.last_command.as_deref(), Some("exit"));
    }
}
