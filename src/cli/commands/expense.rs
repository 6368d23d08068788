use wisewallet_domain::{Expense, ExpenseDraft};

use super::{parse_amount, parse_date, parse_id, resolve_category};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{section as output_section, separator};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record an expense",
            "add <title> <category> <amount> [date]",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Change an existing expense",
            "edit <id> <title> <category> <amount> [date]",
            cmd_edit,
        ),
        CommandEntry::new("delete", "Remove an expense", "delete <id>", cmd_delete)
            .with_aliases(&["rm"]),
        CommandEntry::new(
            "list",
            "List expenses, newest first",
            "list [category]",
            cmd_list,
        )
        .with_aliases(&["ls"]),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = match args {
        [title, category, amount, rest @ ..] if rest.len() <= 1 => {
            let date = match rest.first() {
                Some(raw) => parse_date(raw)?,
                None => context.wallet.today(),
            };
            ExpenseDraft::new(
                *title,
                resolve_category(&context.config.categories, category)?,
                parse_amount(amount, &context.config.currency_symbol)?,
                date,
            )
        }
        [] if context.is_interactive() => prompt_draft(context, None)?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: add <title> <category> <amount> [date]".into(),
            ))
        }
    };

    let user = context.active_username()?;
    let update = context.wallet.add_expense(&user, draft)?;
    io::print_success(format!("Expense saved (#{}).", update.value.id));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((raw_id, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: edit <id> <title> <category> <amount> [date]".into(),
        ));
    };
    let id = parse_id(raw_id)?;
    let user = context.active_username()?;
    let Some(existing) = context.wallet.find_expense(&user, id)? else {
        io::print_warning(format!("No expense with id #{id}."));
        return Ok(());
    };

    let draft = match rest {
        [title, category, amount, date @ ..] if date.len() <= 1 => ExpenseDraft::new(
            *title,
            resolve_category(&context.config.categories, category)?,
            parse_amount(amount, &context.config.currency_symbol)?,
            match date.first() {
                Some(raw) => parse_date(raw)?,
                None => existing.date,
            },
        ),
        [] if context.is_interactive() => prompt_draft(context, Some(&existing))?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: edit <id> <title> <category> <amount> [date]".into(),
            ))
        }
    };

    if context.wallet.update_expense(&user, id, draft)?.value {
        io::print_success("Expense updated");
    } else {
        io::print_warning(format!("No expense with id #{id}."));
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw_id] = args else {
        return Err(CommandError::InvalidArguments("usage: delete <id>".into()));
    };
    let id = parse_id(raw_id)?;
    let user = context.active_username()?;

    if context.is_interactive() {
        if let Some(expense) = context.wallet.find_expense(&user, id)? {
            let prompt = format!("Are you sure you want to delete '{}'?", expense.title);
            if !io::confirm_action(&context.theme, &prompt, false)? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
        }
    }

    if context.wallet.delete_expense(&user, id)?.value {
        io::print_success("Expense deleted");
    } else {
        io::print_warning(format!("No expense with id #{id}."));
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let category = match args {
        [] => None,
        [raw] if raw.eq_ignore_ascii_case("all") => None,
        [raw] => Some(resolve_category(&context.config.categories, raw)?),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: list [category]".into(),
            ))
        }
    };
    let user = context.active_username()?;
    let mut expenses = context.wallet.expenses_in(&user, category.as_deref())?;
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    match &category {
        Some(name) => output_section(format!("{name} expenses")),
        None => output_section("Expenses"),
    }
    if expenses.is_empty() {
        io::print_info("No expenses recorded yet.");
        return Ok(());
    }
    for expense in &expenses {
        io::print_info(format_row(context, expense));
    }

    let overview = context.wallet.overview(&user)?;
    let shown: f64 = expenses.iter().map(|expense| expense.amount).sum();
    separator();
    io::print_info(format!(
        "  {} shown, {} total",
        expenses.len(),
        context.formatters.amount(shown)
    ));
    io::print_info(format!(
        "  This month: {}   All time: {} ({} items)",
        context.formatters.amount(overview.total_this_month),
        context.formatters.amount(overview.total_all_time),
        overview.item_count
    ));
    Ok(())
}

fn format_row(context: &ShellContext, expense: &Expense) -> String {
    format!(
        "  #{:<4} {}  {:<24} {:<14} {:>12}",
        expense.id,
        context.formatters.date(expense.date),
        expense.title,
        expense.category,
        context.formatters.amount(expense.amount)
    )
}

fn prompt_draft(
    context: &ShellContext,
    existing: Option<&Expense>,
) -> Result<ExpenseDraft, CommandError> {
    let theme = &context.theme;
    let initial = |value: Option<String>| value.unwrap_or_default();

    let title = io::prompt_text_with_default(
        theme,
        "Title",
        &initial(existing.map(|expense| expense.title.clone())),
    )?;
    let category = io::prompt_text_with_default(
        theme,
        &format!("Category ({})", context.config.categories.join(", ")),
        &initial(existing.map(|expense| expense.category.clone())),
    )?;
    let amount = io::prompt_text_with_default(
        theme,
        "Amount",
        &initial(existing.map(|expense| format!("{:.2}", expense.amount))),
    )?;
    let date = io::prompt_text_with_default(
        theme,
        "Date (MM/DD/YYYY)",
        &context
            .formatters
            .date(existing.map_or_else(|| context.wallet.today(), |expense| expense.date)),
    )?;

    Ok(ExpenseDraft::new(
        title,
        resolve_category(&context.config.categories, &category)?,
        parse_amount(&amount, &context.config.currency_symbol)?,
        parse_date(&date)?,
    ))
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;
    use tempfile::TempDir;
    use wisewallet_core::DEFAULT_USERNAME;
    use wisewallet_domain::Username;

    #[test]
    fn expenses_without_a_session_go_to_the_default_wallet() {
        let dir = TempDir::new().expect("temp dir");
        let app = process_script(
            dir.path(),
            &[
                "add \"Bus pass\" transport 45 2026-10-01",
                "add Coffee Food 3.50 10/02/2026",
                "edit 1 \"Bus pass\" Transport 50",
                "delete 2",
                "delete 9",
            ],
        )
        .expect("script");

        let user = Username::new(DEFAULT_USERNAME);
        let expenses = app.wallet.expenses(&user).expect("expenses");
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, "Transport");
        assert_eq!(expenses[0].amount, 50.0);
        assert_eq!(expenses[0].date.to_string(), "2026-10-01");
    }

    #[test]
    fn unknown_categories_are_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let app = process_script(dir.path(), &["add Collar Pets 20"]).expect("script");
        let user = Username::new(DEFAULT_USERNAME);
        assert!(app.wallet.expenses(&user).expect("expenses").is_empty());
    }
}
