use wisewallet_domain::{BudgetStatus, CategoryBudgetLine};

use super::{parse_amount, resolve_category};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{section as output_section, separator};
use crate::cli::registry::CommandEntry;
use crate::settings::DisplayFormatters;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "budget",
            "Set or review monthly and category budgets",
            "budget <monthly <amount>|category <name> <amount>|show>",
            cmd_budget,
        ),
        CommandEntry::new(
            "summary",
            "Dashboard for the current month",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "rollover",
            "Start a new budget month so alerts can fire again",
            "rollover",
            cmd_rollover,
        ),
        CommandEntry::new(
            "notifications",
            "Show or dismiss budget alerts",
            "notifications [clear]",
            cmd_notifications,
        ),
    ]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None => show_budgets(context),
        Some((subcommand, rest)) => match subcommand.to_ascii_lowercase().as_str() {
            "monthly" => set_monthly(context, rest),
            "category" => set_category(context, rest),
            "show" => show_budgets(context),
            other => Err(CommandError::InvalidArguments(format!(
                "unknown budget subcommand `{}`",
                other
            ))),
        },
    }
}

fn set_monthly(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: budget monthly <amount>".into(),
        ));
    };
    let amount = parse_amount(raw, &context.config.currency_symbol)?;
    let user = context.active_username()?;
    context.wallet.save_monthly_budget(&user, amount)?;
    io::print_success(format!(
        "Monthly budget saved: {}",
        context.formatters.amount(amount)
    ));
    Ok(())
}

fn set_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, raw] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: budget category <name> <amount>".into(),
        ));
    };
    let category = resolve_category(&context.config.categories, name)?;
    let amount = parse_amount(raw, &context.config.currency_symbol)?;
    let user = context.active_username()?;
    context.wallet.save_category_budget(&user, &category, amount)?;
    io::print_success(format!(
        "{category} budget saved: {}",
        context.formatters.amount(amount)
    ));
    Ok(())
}

fn show_budgets(context: &mut ShellContext) -> CommandResult {
    let user = context.active_username()?;
    let overview = context.wallet.budget_overview(&user)?;
    let fmt = &context.formatters;

    output_section(format!("Budgets for {}", overview.spending.month));
    if overview.plan.has_monthly_budget() {
        io::print_info(format!(
            "  Monthly      {} of {}",
            fmt.amount(overview.spending.total),
            fmt.amount(overview.plan.monthly_budget)
        ));
    }
    print_status(fmt, "monthly budget", &overview.monthly_status);

    if overview.categories.is_empty() {
        io::print_hint("No category budgets yet. Try `budget category Food 300`.");
        return Ok(());
    }
    separator();
    for line in &overview.categories {
        print_category_line(fmt, line);
    }
    Ok(())
}

fn print_category_line(fmt: &DisplayFormatters, line: &CategoryBudgetLine) {
    let percent = line
        .status
        .percent_used()
        .map(|percent| format!("{percent:>5.0}%"))
        .unwrap_or_else(|| "    -".to_string());
    io::print_info(format!(
        "  {:<14} {:>12} / {:>12} {}",
        line.category,
        fmt.amount(line.spent),
        fmt.amount(line.budget),
        percent
    ));
    if matches!(line.status, BudgetStatus::Warning { .. } | BudgetStatus::Exceeded { .. }) {
        print_status(fmt, &format!("{} budget", line.category), &line.status);
    }
}

fn print_status(fmt: &DisplayFormatters, label: &str, status: &BudgetStatus) {
    match *status {
        BudgetStatus::Unset if label == "monthly budget" => {
            io::print_info("  No budget set");
            io::print_hint("Set a monthly budget to track your spending");
        }
        BudgetStatus::Unset => {}
        BudgetStatus::OnTrack { remaining, .. } => {
            io::print_info(format!("  Remaining: {}", fmt.amount(remaining)));
        }
        BudgetStatus::Warning { percent_used, .. } => io::print_warning(format!(
            "You've spent {}% of your {label}. Be careful with your spending.",
            percent_used as i64
        )),
        BudgetStatus::Exceeded { overage, .. } if overage > 0.0 => io::print_error(format!(
            "You've exceeded your {label} by {}!",
            fmt.amount(overage)
        )),
        BudgetStatus::Exceeded { .. } => {
            io::print_warning(format!("You've used your entire {label}."))
        }
    }
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let user = context.active_username()?;
    let overview = context.wallet.overview(&user)?;
    let change = context.wallet.monthly_change(&user)?;
    let budgets = context.wallet.budget_overview(&user)?;
    let fmt = &context.formatters;

    output_section(format!("{}, {user}", summary_greeting(context)));
    io::print_info(format!("  Month        : {}", budgets.spending.month));
    io::print_info(format!("  Spent        : {}", fmt.amount(change.current)));
    match change.percent_change {
        Some(percent) if percent >= 0.0 => {
            io::print_info(format!("  vs last month: +{percent:.1}%"))
        }
        Some(percent) => io::print_info(format!("  vs last month: {percent:.1}%")),
        None => io::print_info("  vs last month: No data from last month"),
    }
    io::print_info(format!(
        "  All time     : {} across {} expenses",
        fmt.amount(overview.total_all_time),
        overview.item_count
    ));

    separator();
    if budgets.plan.has_monthly_budget() {
        io::print_info(format!(
            "  Budget       : {}",
            fmt.amount(budgets.plan.monthly_budget)
        ));
    }
    print_status(fmt, "monthly budget", &budgets.monthly_status);

    let mut top: Vec<_> = budgets.spending.per_category.iter().collect();
    top.sort_by(|a, b| b.1.total_cmp(a.1));
    if !top.is_empty() {
        separator();
        for (category, spent) in top {
            io::print_info(format!("  {:<14} {:>12}", category, fmt.amount(*spent)));
        }
    }
    Ok(())
}

/// Greeting for the wallet clock's current hour.
fn summary_greeting(context: &ShellContext) -> &'static str {
    greeting(context.wallet.local_hour())
}

fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    }
}

fn cmd_rollover(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let user = context.active_username()?;
    context.wallet.reset_monthly_notifications(&user)?;
    io::print_success(format!(
        "Started a new budget month for {user}. Budget alerts are armed again."
    ));
    Ok(())
}

fn cmd_notifications(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(action) = args.first() {
        if action.eq_ignore_ascii_case("clear") {
            let count = context.alerts.dismiss_all();
            io::print_success(format!("Dismissed {count} notification(s)."));
            return Ok(());
        }
        return Err(CommandError::InvalidArguments(
            "usage: notifications [clear]".into(),
        ));
    }

    let tray = context.alerts.tray();
    output_section("Notifications");
    if tray.is_empty() {
        io::print_info("No budget alerts.");
    }
    for alert in &tray {
        io::print_info(format!("  [{}] {}", alert.id, alert.title));
        io::print_info(format!("        {}", alert.body));
    }

    let user = context.active_username()?;
    let state = context.wallet.notification_state(&user)?;
    let armed = |notified: bool| if notified { "sent" } else { "armed" };
    separator();
    io::print_info(format!("  Monthly alert : {}", armed(state.monthly_notified)));
    for (category, notified) in &state.category_notified {
        io::print_info(format!("  {:<14}: {}", category, armed(*notified)));
    }
    Ok(())
}
