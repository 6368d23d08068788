mod common;

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn wallet_cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wisewallet_cli").expect("binary built");
    cmd.env("WISEWALLET_CLI_SCRIPT", "1")
        .env("WISEWALLET_HOME", home)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_raises_a_single_monthly_alert() {
    let home = common::setup_test_home();
    let input = "\
signup amy amy@example.com secret1 secret1
budget monthly 100
add Groceries Food 80
add \"Dinner out\" Food 40
add Snacks Food 5
notifications
exit
";

    wallet_cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Account created. Welcome, amy!"))
        .stdout(contains("You've exceeded your monthly budget by $20.00"))
        .stdout(contains("[1001] Monthly Budget Exceeded"))
        .stdout(contains("$25.00").not());
}

#[test]
fn category_alert_uses_stable_notification_id() {
    let home = common::setup_test_home();
    let input = "\
budget category food 50
add Groceries Food 100
notifications
";

    wallet_cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Food budget saved: $50.00"))
        .stdout(contains("[2197582] Food Budget Exceeded"))
        .stdout(contains("You've exceeded your Food budget by $50.00"));
}

#[test]
fn data_survives_between_runs() {
    let home = common::setup_test_home();

    wallet_cli(&home)
        .write_stdin("signup bo bo@example.com secret1 secret1\nadd Coffee Food 3.50 10/02/2026\n")
        .assert()
        .success()
        .stdout(contains("Expense saved (#1)."));

    wallet_cli(&home)
        .write_stdin("whoami\nlist\n")
        .assert()
        .success()
        .stdout(contains("Logged in as bo <bo@example.com>"))
        .stdout(contains("10/02/2026"))
        .stdout(contains("Coffee"));

    assert!(home.join("users/bo/expenses.json").exists());
    assert!(home.join("global/user_prefs.json").exists());
}

#[test]
fn account_errors_use_form_messages() {
    let home = common::setup_test_home();
    let input = "\
login cy@example.com secret1
signup cy cy@example short1 short1
signup cy cy@example.com short1 short2
signup cy cy@example.com secret1 secret1
logout
login cy@example.com nope
";

    wallet_cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("No user found. Please sign up first"))
        .stdout(contains("Valid email required"))
        .stdout(contains("Passwords don't match"))
        .stdout(contains("Invalid credentials"));
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = common::setup_test_home();

    wallet_cli(&home)
        .write_stdin("budgte\nversion\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `budgte`"))
        .stdout(contains("Suggestion: `budget`?"))
        .stdout(contains("WiseWallet"));
}

#[test]
fn config_set_changes_currency_display() {
    let home = common::setup_test_home();

    wallet_cli(&home)
        .write_stdin("config set currency_symbol €\nbudget monthly 1200\n")
        .assert()
        .success()
        .stdout(contains("Monthly budget saved: €1,200.00"));

    let saved = std::fs::read_to_string(home.join("config/config.json")).expect("config file");
    assert!(saved.contains("€"));
}
