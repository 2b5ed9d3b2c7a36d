use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::ledger::CURRENT_SCHEMA_VERSION;
use crate::storage::json_backend::DEFAULT_DATA_FILE;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("version", "Show the version, schema and file locations", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(format!("Finance Core {}", env!("CARGO_PKG_VERSION")));
    output::plain(format!("  Schema ver   : v{}", CURRENT_SCHEMA_VERSION));
    match context.manager.storage().location() {
        Some(path) => output::plain(format!("  Data file    : {}", path.display())),
        None => output::plain(format!("  Data file    : {} (not on disk)", DEFAULT_DATA_FILE)),
    }
    output::plain(format!(
        "  Config file  : {}",
        context.config_manager.path().display()
    ));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
