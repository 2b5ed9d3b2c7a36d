use chrono::Local;

use crate::cli::commands::{usage, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::{
    format_money, format_percent, format_signed, progress_bar, Alignment, Table,
};
use crate::cli::output;
use crate::core::services::summary_service::{DEFAULT_TREND_DAYS, MAX_TREND_DAYS};
use crate::ledger::{CASH_AND_BANK, CRYPTO_AND_INVESTMENTS, UPCOMING};

const PROGRESS_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("summary", "Show totals per category", "summary", cmd_summary),
        CommandDefinition::new(
            "allocation",
            "Compare holdings against the rule percentages",
            "allocation",
            cmd_allocation,
        ),
        CommandDefinition::new(
            "trend",
            "Show the estimated real total per day",
            "trend [days]",
            cmd_trend,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.manager.totals();
    let local = context.local_currency();

    output::section("Summary");
    let mut table = Table::new(&[("", Alignment::Left), ("Amount", Alignment::Right)]);
    for (label, value) in [
        (CASH_AND_BANK, totals.cash_bank),
        (CRYPTO_AND_INVESTMENTS, totals.crypto),
        (UPCOMING, totals.upcoming),
        ("Real total", totals.real_total),
        ("Total", totals.total),
    ] {
        table.push_row(vec![label.to_string(), format_money(local, value)]);
    }
    output::plain(table.render());
    output::info(format!(
        "Exchange rate: 1 {} = {} {}",
        context.foreign_currency(),
        context.manager.state().exchange_rate,
        local
    ));
    Ok(())
}

fn cmd_allocation(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let rows = context.manager.allocation();
    let local = context.local_currency();

    output::section(format!(
        "Allocation ({})",
        context.manager.state().rule_percentages
    ));
    let mut table = Table::new(&[
        ("Bucket", Alignment::Left),
        ("Rule", Alignment::Right),
        ("Target", Alignment::Right),
        ("Current", Alignment::Right),
        ("Diff", Alignment::Right),
        ("Share", Alignment::Right),
        ("Progress", Alignment::Left),
    ]);
    for row in rows {
        table.push_row(vec![
            row.label.to_string(),
            format_percent(row.target_percent),
            format_money(local, row.target),
            format_money(local, row.current),
            format_signed(row.diff),
            format_percent(row.percent_of_real_total),
            format!(
                "{} {}",
                progress_bar(row.progress_percent, PROGRESS_WIDTH),
                format_percent(row.progress_percent)
            ),
        ]);
    }
    output::plain(table.render());
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let days = match args {
        [] => DEFAULT_TREND_DAYS,
        [raw] => raw
            .parse::<usize>()
            .ok()
            .filter(|days| (1..=MAX_TREND_DAYS).contains(days))
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "days `{raw}` must be a whole number between 1 and {MAX_TREND_DAYS}"
                ))
            })?,
        _ => return Err(usage("trend [days]")),
    };

    let points = context.manager.trend(days, Local::now().date_naive());
    output::section(format!("Real total, last {days} days"));
    let mut table = Table::new(&[("Date", Alignment::Left), ("Real total", Alignment::Right)]);
    for point in points {
        table.push_row(vec![
            point.date.format("%Y-%m-%d").to_string(),
            format_money(context.local_currency(), point.value),
        ]);
    }
    output::plain(table.render());
    output::info("Estimated from recent transactions; direct balance edits are not reflected.");
    Ok(())
}
