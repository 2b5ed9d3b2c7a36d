use crate::cli::commands::{parse_number, usage, CommandDefinition};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::ledger::RulePercentages;
use crate::storage::ledger_warnings;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "rate",
            "Show or set the foreign exchange rate",
            "rate [value]",
            cmd_rate,
        ),
        CommandDefinition::new(
            "rules",
            "Show or set the Growth/Stability/Essentials/Rewards percentages",
            "rules [growth stability essentials rewards]",
            cmd_rules,
        ),
        CommandDefinition::new(
            "warnings",
            "List inconsistencies found in the stored data",
            "warnings",
            cmd_warnings,
        ),
    ]
}

fn cmd_rate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::info(format!(
                "1 {} = {} {}",
                context.foreign_currency(),
                context.manager.state().exchange_rate,
                context.local_currency()
            ));
            Ok(())
        }
        [raw] => {
            let rate = parse_number("Rate", raw)?;
            let previous = context.manager.update_exchange_rate(rate)?;
            output::success(format!("Exchange rate set to {rate} (was {previous})."));
            Ok(())
        }
        _ => Err(usage("rate [value]")),
    }
}

fn cmd_rules(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let rules = context.manager.state().rule_percentages;
            output::info(format!(
                "Growth {}%, Stability {}%, Essentials {}%, Rewards {}%",
                rules.growth, rules.stability, rules.essentials, rules.rewards
            ));
            Ok(())
        }
        [growth, stability, essentials, rewards] => {
            let rules = RulePercentages::new(
                parse_number("Growth", growth)?,
                parse_number("Stability", stability)?,
                parse_number("Essentials", essentials)?,
                parse_number("Rewards", rewards)?,
            );
            let previous = context.manager.update_rule_percentages(rules)?;
            output::success(format!("Rule set to {rules} (was {previous})."));
            Ok(())
        }
        _ => Err(usage("rules [growth stability essentials rewards]")),
    }
}

fn cmd_warnings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let warnings = ledger_warnings(context.manager.state());
    if warnings.is_empty() {
        output::success("No problems found.");
    } else {
        for warning in warnings {
            output::warning(warning);
        }
    }
    Ok(())
}
