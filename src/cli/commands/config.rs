use std::path::PathBuf;

use crate::cli::commands::{usage, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::core::services::ServiceError;

const USAGE: &str = "config [currency <local> <foreign> | data-file <path|default>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "Show or change currency labels and the data file location",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            show(context);
            Ok(())
        }
        [key, local, foreign] if key.eq_ignore_ascii_case("currency") => {
            let local = currency_label(local)?;
            let foreign = currency_label(foreign)?;
            context.config.local_currency = local;
            context.config.foreign_currency = foreign;
            context.save_config(false).map_err(ServiceError::from)?;
            output::success(format!(
                "Currencies set to {} (local) and {} (foreign).",
                context.config.local_currency, context.config.foreign_currency
            ));
            Ok(())
        }
        [key, path] if key.eq_ignore_ascii_case("data-file") => {
            if path.trim().is_empty() {
                return Err(CommandError::InvalidArguments(
                    "data file path cannot be empty".into(),
                ));
            }
            let previous = context.config.data_file.clone();
            context.config.data_file = (*path != "default").then(|| PathBuf::from(*path));
            if let Err(err) = context.save_config(true) {
                context.config.data_file = previous;
                return Err(ServiceError::from(err).into());
            }
            if let Some(location) = context.manager.storage().location() {
                output::success(format!("Now using {}.", location.display()));
            }
            Ok(())
        }
        _ => Err(usage(USAGE)),
    }
}

fn show(context: &ShellContext) {
    output::section("Configuration");
    output::plain(format!("  Local currency   : {}", context.config.local_currency));
    output::plain(format!("  Foreign currency : {}", context.config.foreign_currency));
    output::plain(format!(
        "  Data file        : {}",
        context
            .config_manager
            .resolve_data_file(&context.config)
            .display()
    ));
    output::plain(format!(
        "  Config file      : {}",
        context.config_manager.path().display()
    ));
}

fn currency_label(raw: &str) -> Result<String, CommandError> {
    let label = raw.trim();
    if label.is_empty() || label.chars().any(char::is_whitespace) {
        return Err(CommandError::InvalidArguments(format!(
            "currency label `{raw}` must be a single word"
        )));
    }
    Ok(label.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_labels_are_single_words() {
        assert_eq!(currency_label("eur").unwrap(), "EUR");
        assert!(matches!(
            currency_label("  "),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(currency_label("US D").is_err());
    }
}
