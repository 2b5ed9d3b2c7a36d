use crate::cli::commands::{usage, CommandDefinition};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::core::services::CategoryService;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "category",
        "Add or list categories",
        "category <add <name>|list>",
        cmd_category,
    )]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["add", name] => {
            context.manager.add_category(name)?;
            output::success(format!("Category `{}` added.", name.trim()));
            Ok(())
        }
        ["list"] => {
            output::section("Categories");
            for category in CategoryService::list(context.manager.state()) {
                output::plain(format!(
                    "  {} ({} accounts)",
                    category.name,
                    category.accounts.len()
                ));
            }
            Ok(())
        }
        _ => Err(usage("category <add <name>|list>")),
    }
}
