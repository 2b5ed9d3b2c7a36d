use crate::cli::commands::{usage, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::{format_signed, Alignment, Table};
use crate::cli::output;
use crate::core::services::transaction_service::parse_amount;
use crate::core::services::{NewTransaction, TransactionService};
use crate::ledger::{RuleTag, TransactionKind};

const TXN_USAGE: &str = "txn <add|list|delete|remove|purge> ...";
const ADD_USAGE: &str =
    "txn add <income|expense> <account> <amount> <description> [rule] [--date <date>]";
const DEFAULT_LIST_LIMIT: usize = 20;
const SHORT_ID_LEN: usize = 8;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "txn",
        "Record, list and reverse transactions",
        TXN_USAGE,
        cmd_txn,
    )]
}

fn cmd_txn(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(usage(TXN_USAGE));
    };
    match subcommand.to_lowercase().as_str() {
        "add" => add_transaction(context, rest),
        "list" => list_transactions(context, rest),
        "delete" => delete_transaction(context, rest),
        "remove" => remove_transaction(context, rest),
        "purge" => purge_orphans(context),
        _ => Err(usage(TXN_USAGE)),
    }
}

/// Splits `--date <value>` out of the argument list.
fn take_date(args: &[&str]) -> Result<(Option<String>, Vec<String>), CommandError> {
    let mut date = None;
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if *arg == "--date" {
            let value = iter
                .next()
                .ok_or_else(|| CommandError::InvalidArguments("--date needs a value".into()))?;
            date = Some((*value).to_string());
        } else {
            positional.push((*arg).to_string());
        }
    }
    Ok((date, positional))
}

fn add_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (date, positional) = take_date(args)?;
    let (kind, account, amount, description, rule) = match positional.as_slice() {
        [kind, account, amount, description] => (kind, account, amount, description, None),
        [kind, account, amount, description, rule] => {
            (kind, account, amount, description, Some(rule))
        }
        _ => return Err(usage(ADD_USAGE)),
    };
    let kind: TransactionKind = kind.parse().map_err(CommandError::InvalidArguments)?;
    let rule = match rule {
        Some(raw) => raw.parse::<RuleTag>().map_err(CommandError::InvalidArguments)?,
        None => RuleTag::None,
    };

    let amount = parse_amount(amount)?;
    let mut input =
        NewTransaction::new(account.as_str(), kind, amount, description.as_str()).tagged(rule);
    if let Some(date) = date {
        input = input.on(date);
    }
    let id = context.manager.add_transaction(input)?;

    let signed = context
        .manager
        .state()
        .transaction(id)
        .map(|txn| txn.amount)
        .unwrap_or_default();
    output::success(format!(
        "Transaction recorded: {} {} on `{}` ({}).",
        kind,
        format_signed(signed),
        account,
        short_id(&id.to_string())
    ));
    Ok(())
}

fn list_transactions(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args {
        [] => DEFAULT_LIST_LIMIT,
        [raw] => raw.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("limit `{raw}` must be a whole number"))
        })?,
        _ => return Err(usage("txn list [limit]")),
    };

    let transactions = TransactionService::list(context.manager.state());
    if transactions.is_empty() {
        output::info("No transactions recorded.");
        return Ok(());
    }

    output::section("Transactions (newest first)");
    let mut table = Table::new(&[
        ("Id", Alignment::Left),
        ("Date", Alignment::Left),
        ("Account", Alignment::Left),
        ("Description", Alignment::Left),
        ("Amount", Alignment::Right),
        ("Rule", Alignment::Left),
    ]);
    for txn in transactions.iter().take(limit) {
        table.push_row(vec![
            short_id(&txn.id.to_string()).to_string(),
            txn.date.clone(),
            txn.account.clone(),
            txn.description.clone(),
            format_signed(txn.amount),
            txn.rule_category.to_string(),
        ]);
    }
    output::plain(table.render());
    if transactions.len() > limit {
        output::info(format!(
            "{} older transaction(s) not shown.",
            transactions.len() - limit
        ));
    }
    Ok(())
}

fn delete_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix] = args else {
        return Err(usage("txn delete <id>"));
    };
    let id = TransactionService::find_by_prefix(context.manager.state(), prefix)?.id;
    let removed = context.manager.delete_transaction(id)?;
    output::success(format!(
        "Transaction `{}` deleted; {} reversed on `{}`.",
        removed.description,
        format_signed(removed.amount),
        removed.account
    ));
    Ok(())
}

fn remove_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [date, account, description] = args else {
        return Err(usage("txn remove <date> <account> <description>"));
    };
    let removed = context
        .manager
        .delete_transaction_matching(date, account, description)?;
    output::success(format!(
        "Transaction `{}` deleted; {} reversed on `{}`.",
        removed.description,
        format_signed(removed.amount),
        removed.account
    ));
    Ok(())
}

fn purge_orphans(context: &mut ShellContext) -> CommandResult {
    let purged = context.manager.purge_orphans()?;
    if purged.is_empty() {
        output::info("No orphaned transactions.");
    } else {
        output::success(format!(
            "Removed {} transaction(s) whose account no longer exists.",
            purged.len()
        ));
    }
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}
