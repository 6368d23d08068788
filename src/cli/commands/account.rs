use tracing::info;
use wisewallet_core::{ProfileOutcome, ProfileUpdate, SignUpForm, DEFAULT_USERNAME};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "signup",
            "Create an account and log in",
            "signup <username> <email> <password> <confirm-password> [phone]",
            cmd_signup,
        ),
        CommandEntry::new(
            "login",
            "Log in with email and password",
            "login <email> <password>",
            cmd_login,
        ),
        CommandEntry::new("logout", "End the current session", "logout", cmd_logout),
        CommandEntry::new("whoami", "Show the active user", "whoami", cmd_whoami),
        CommandEntry::new(
            "profile",
            "Show or edit the logged-in profile",
            "profile [show|edit|set <username> <email> [phone]]",
            cmd_profile,
        ),
        CommandEntry::new("users", "List registered accounts", "users", cmd_users),
        CommandEntry::new(
            "clear-data",
            "Delete the active user's expenses, budgets and alert state",
            "clear-data",
            cmd_clear_data,
        ),
    ]
}

fn cmd_signup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let form = match args {
        [username, email, password, confirm, rest @ ..] if rest.len() <= 1 => SignUpForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            phone: rest.first().map(|phone| phone.to_string()).unwrap_or_default(),
        },
        [] if context.is_interactive() => SignUpForm {
            username: io::prompt_text(&context.theme, "Username", false)?,
            email: io::prompt_text(&context.theme, "Email", false)?,
            phone: io::prompt_text(&context.theme, "Phone (optional)", true)?,
            password: io::prompt_password(&context.theme, "Password")?,
            confirm_password: io::prompt_password(&context.theme, "Confirm password")?,
        },
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: signup <username> <email> <password> <confirm-password> [phone]".into(),
            ))
        }
    };

    let user = context.wallet.sign_up(form)?;
    io::print_success(format!("Account created. Welcome, {}!", user.username));
    Ok(())
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (email, password) = match args {
        [email, password] => (email.to_string(), password.to_string()),
        [] if context.is_interactive() => (
            io::prompt_text(&context.theme, "Email", false)?,
            io::prompt_password(&context.theme, "Password")?,
        ),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: login <email> <password>".into(),
            ))
        }
    };

    let user = context.wallet.log_in(email.trim(), &password)?;
    io::print_success(format!("Logged in as {}.", user.username));
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Some(user) = context.wallet.current_user()? else {
        io::print_info("No user is logged in.");
        return Ok(());
    };
    if context.is_interactive()
        && !io::confirm_action(&context.theme, "Are you sure you want to logout?", true)?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.wallet.log_out()?;
    io::print_success(format!("Logged out {}.", user.username));
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.wallet.current_user()? {
        Some(user) => io::print_info(format!("Logged in as {} <{}>", user.username, user.email)),
        None => io::print_info(format!(
            "Not logged in. Data commands use the shared `{DEFAULT_USERNAME}` wallet."
        )),
    }
    Ok(())
}

fn cmd_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None => show_profile(context),
        Some((subcommand, rest)) => match subcommand.to_ascii_lowercase().as_str() {
            "show" => show_profile(context),
            "edit" => edit_profile(context),
            "set" => set_profile(context, rest),
            other => Err(CommandError::InvalidArguments(format!(
                "unknown profile subcommand `{}`",
                other
            ))),
        },
    }
}

fn show_profile(context: &mut ShellContext) -> CommandResult {
    let user = context.wallet.require_user()?;
    output_section("Profile");
    io::print_info(format!("  Username : {}", user.username));
    io::print_info(format!("  Email    : {}", user.email));
    let phone = if user.phone.is_empty() { "-" } else { user.phone.as_str() };
    io::print_info(format!("  Phone    : {}", phone));
    Ok(())
}

fn edit_profile(context: &mut ShellContext) -> CommandResult {
    if !context.is_interactive() {
        return Err(CommandError::InvalidArguments(
            "usage: profile set <username> <email> [phone]".into(),
        ));
    }
    let user = context.wallet.require_user()?;
    let update = ProfileUpdate {
        username: io::prompt_text_with_default(&context.theme, "Username", user.username.as_str())?,
        email: io::prompt_text_with_default(&context.theme, "Email", &user.email)?,
        phone: io::prompt_text_with_default(&context.theme, "Phone", &user.phone)?,
    };
    apply_profile_update(context, update)
}

fn set_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let update = match args {
        [username, email, rest @ ..] if rest.len() <= 1 => ProfileUpdate {
            username: username.to_string(),
            email: email.to_string(),
            phone: rest.first().map(|phone| phone.to_string()).unwrap_or_default(),
        },
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: profile set <username> <email> [phone]".into(),
            ))
        }
    };
    apply_profile_update(context, update)
}

fn apply_profile_update(context: &mut ShellContext, update: ProfileUpdate) -> CommandResult {
    let current = context.wallet.require_user()?;
    let renaming = update.username.trim() != current.username.as_str();
    if renaming && context.is_interactive() {
        io::print_warning(
            "Changing your username will migrate all your data (expenses, budgets) to the new \
             username. You'll need to log in again with your new username.",
        );
        if !io::confirm_action(&context.theme, "Yes, change username?", false)? {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }

    let outcome = context.wallet.update_profile(&current, update)?;
    info!(
        username_changed = outcome.username_changed,
        email_changed = outcome.email_changed,
        "profile updated"
    );
    io::print_success(profile_message(&outcome));
    Ok(())
}

fn profile_message(outcome: &ProfileOutcome) -> &'static str {
    match (outcome.username_changed, outcome.email_changed) {
        (true, true) => {
            "Username and email updated. Your data has been migrated. Please log in again with your new credentials."
        }
        (true, false) => {
            "Username updated. Your data has been migrated. Please log in again with your new username."
        }
        (false, true) => "Email updated. Please log in again with your new email.",
        (false, false) => "Profile updated successfully",
    }
}

fn cmd_users(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let users = context.wallet.registered_users()?;
    if users.is_empty() {
        io::print_info("No accounts registered yet.");
        return Ok(());
    }
    let active = context.wallet.current_user()?.map(|user| user.username);
    output_section("Accounts");
    for user in users {
        let marker = if active.as_ref() == Some(&user.username) { "*" } else { " " };
        io::print_info(format!("{marker} {:<16} {}", user.username, user.email));
    }
    Ok(())
}

fn cmd_clear_data(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let user = context.active_username()?;
    if context.is_interactive() {
        let prompt = format!("Delete all expenses, budgets and alert state for {user}?");
        if !io::confirm_action(&context.theme, &prompt, false)? {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }
    context.wallet.clear_user_data(&user)?;
    io::print_success(format!("Cleared wallet data for {user}."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;
    use tempfile::TempDir;

    #[test]
    fn rename_migrates_data_and_ends_the_session() {
        let dir = TempDir::new().expect("temp dir");
        let app = process_script(
            dir.path(),
            &[
                "signup amy amy@example.com secret1 secret1",
                "add Lunch Food 12",
                "profile set amelia amy@example.com",
            ],
        )
        .expect("script");

        assert!(app.wallet.current_user().expect("session").is_none());
        let renamed = wisewallet_domain::Username::new("amelia");
        assert_eq!(app.wallet.expenses(&renamed).expect("expenses").len(), 1);
    }

    #[test]
    fn login_after_logout_restores_the_session() {
        let dir = TempDir::new().expect("temp dir");
        let app = process_script(
            dir.path(),
            &[
                "signup bo bo@example.com secret1 secret1",
                "logout",
                "login bo@example.com wrong-pass",
                "login bo@example.com secret1",
            ],
        )
        .expect("script");

        let user = app.wallet.current_user().expect("session").expect("logged in");
        assert_eq!(user.username.as_str(), "bo");
    }
}
