use std::io;

use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::cli::commands::{all_definitions, CommandDefinition, CommandRegistry};
use crate::cli::output;
use crate::config::{Config, ConfigManager};
use crate::core::services::ServiceError;
use crate::core::{LedgerManager, LoadMetadata};
use crate::errors::LedgerError;
use crate::storage::JsonStorage;

/// Largest edit distance still offered as a suggestion.
const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failures that abort the shell.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failures reported for a single command; the shell keeps running.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub(crate) manager: LedgerManager,
    pub(crate) config: Config,
    pub(crate) config_manager: ConfigManager,
    pub(crate) registry: CommandRegistry,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new() -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let data_file = config_manager.resolve_data_file(&config);
        let (manager, metadata) = LedgerManager::open(Box::new(JsonStorage::new(data_file)))?;
        report_load(&metadata);

        Ok(Self {
            manager,
            config,
            config_manager,
            registry: CommandRegistry::new(all_definitions()),
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        "finance> ".to_string()
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    /// Persists the current config, optionally switching to the ledger it names.
    pub(crate) fn save_config(&mut self, reopen: bool) -> Result<(), LedgerError> {
        let reopened = if reopen {
            let data_file = self.config_manager.resolve_data_file(&self.config);
            Some(LedgerManager::open(Box::new(JsonStorage::new(data_file)))?)
        } else {
            None
        };
        self.config_manager.save(&self.config)?;
        if let Some((manager, metadata)) = reopened {
            report_load(&metadata);
            self.manager = manager;
        }
        Ok(())
    }

    pub(crate) fn local_currency(&self) -> &str {
        &self.config.local_currency
    }

    pub(crate) fn foreign_currency(&self) -> &str {
        &self.config.foreign_currency
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(definition) = self.registry.get(command).cloned() else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match (definition.handler)(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        let needle = input.to_lowercase();
        if let Some(best) = closest(self.registry.names(), &needle) {
            output::hint(format!("Did you mean `{}`?", best));
        }
    }

    fn suggest_account(&self, input: &str) {
        let names = self
            .manager
            .state()
            .accounts()
            .map(|(_, account)| account.name.as_str());
        if let Some(best) = closest(names, input) {
            output::hint(format!("Did you mean `{}`?", best));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Service(ServiceError::AccountNotFound(name)) => {
                output::error(ServiceError::AccountNotFound(name.clone()));
                self.suggest_account(&name);
            }
            CommandError::Service(other) => output::error(other),
        }
        Ok(())
    }
}

fn report_load(metadata: &LoadMetadata) {
    let location = metadata
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "memory".into());
    if metadata.created {
        output::info(format!(
            "No saved data at {location}; starting with the default accounts."
        ));
    }
    for note in &metadata.migrations {
        output::info(format!("Upgraded stored data: {note}"));
    }
    for warning in &metadata.warnings {
        output::warning(warning);
    }
}

fn closest<'a>(candidates: impl Iterator<Item = &'a str>, input: &str) -> Option<&'a str> {
    candidates
        .map(|candidate| (levenshtein(candidate, input), candidate))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}
