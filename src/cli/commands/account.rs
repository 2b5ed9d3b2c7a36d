use crate::cli::commands::{parse_number, usage, CommandDefinition};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::formatters::{format_amount, format_money, Alignment, Table};
use crate::cli::output;
use crate::ledger::Currency;

const ACCOUNT_USAGE: &str = "account <add <category> <name> [balance] [--foreign]|balance <category> <name> <amount>|delete <category> <name>|rename <category> <old> <new>>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "accounts",
            "List accounts grouped by category",
            "accounts",
            cmd_accounts,
        ),
        CommandDefinition::new(
            "account",
            "Add, edit, delete or rename an account",
            ACCOUNT_USAGE,
            cmd_account,
        ),
    ]
}

fn cmd_accounts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = context.manager.state();
    let local = context.local_currency();
    let foreign = context.foreign_currency();

    for category in &state.categories {
        output::section(&category.name);
        if category.accounts.is_empty() {
            output::plain("  (no accounts)");
            continue;
        }
        let mut table = Table::new(&[
            ("Account", Alignment::Left),
            ("Balance", Alignment::Right),
            (local, Alignment::Right),
        ]);
        for account in &category.accounts {
            let balance = match account.currency {
                Currency::Local => format_money(local, account.balance),
                Currency::Foreign => format_money(foreign, account.balance),
            };
            table.push_row(vec![
                account.name.clone(),
                balance,
                format_amount(account.local_value(state.exchange_rate)),
            ]);
        }
        table.push_row(vec![
            "Subtotal".into(),
            String::new(),
            format_amount(category.local_total(state.exchange_rate)),
        ]);
        output::plain(table.render());
    }
    Ok(())
}

fn cmd_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(usage(ACCOUNT_USAGE));
    };
    match subcommand.to_lowercase().as_str() {
        "add" => add_account(context, rest),
        "balance" | "edit" => edit_balance(context, rest),
        "delete" => delete_account(context, rest),
        "rename" => rename_account(context, rest),
        "list" => cmd_accounts(context, rest),
        _ => Err(usage(ACCOUNT_USAGE)),
    }
}

fn add_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let foreign = args.iter().any(|arg| *arg == "--foreign");
    let positional: Vec<&str> = args
        .iter()
        .copied()
        .filter(|arg| *arg != "--foreign")
        .collect();
    let (category, name, balance) = match positional.as_slice() {
        [category, name] => (*category, *name, 0.0),
        [category, name, raw] => (*category, *name, parse_number("Balance", raw)?),
        _ => return Err(usage("account add <category> <name> [balance] [--foreign]")),
    };
    let currency = if foreign {
        Currency::Foreign
    } else {
        Currency::Local
    };
    context
        .manager
        .add_account(category, name, balance, currency)?;
    output::success(format!(
        "Account `{}` added to `{}`.",
        name.trim(),
        category.trim()
    ));
    Ok(())
}

fn edit_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [category, name, raw] = args else {
        return Err(usage("account balance <category> <name> <amount>"));
    };
    let balance = parse_number("Balance", raw)?;
    let previous = context.manager.edit_balance(category, name, balance)?;
    output::success(format!(
        "Balance of `{}` set to {} (was {}).",
        name,
        format_amount(balance),
        format_amount(previous)
    ));
    Ok(())
}

fn delete_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [category, name] = args else {
        return Err(usage("account delete <category> <name>"));
    };
    let removed = context.manager.delete_account(category, name)?;
    output::success(format!(
        "Account `{}` deleted; its balance of {} is no longer counted.",
        removed.name,
        format_amount(removed.balance)
    ));
    Ok(())
}

fn rename_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [category, old_name, new_name] = args else {
        return Err(usage("account rename <category> <old> <new>"));
    };
    let relabeled = context
        .manager
        .rename_account(category, old_name, new_name)?;
    output::success(format!(
        "Account `{}` renamed to `{}`; {} transaction(s) relabeled.",
        old_name,
        new_name.trim(),
        relabeled
    ));
    Ok(())
}
