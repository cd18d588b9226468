//! `commands`: inspect the command registry itself.

use clap::{ArgMatches, Command};

use crate::cli::{create_root_command, CommandBuilder, CommandCategory, CommandMeta, CommandRegistry};
use crate::errors::{DbxError, Result};
use crate::output;

pub fn commands_command() -> Command {
    Command::new("commands")
        .about("List, count or check the registered commands")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List commands by category"))
        .subcommand(Command::new("stats").about("Show command counts per category"))
        .subcommand(Command::new("validate").about("Report registry problems"))
}

pub fn commands_meta() -> CommandMeta {
    CommandBuilder::from_clap(commands_command())
        .category(CommandCategory::System)
        .build()
}

/// A fresh registry holding every `dbxlink` command.
fn full_registry() -> Result<CommandRegistry> {
    let mut registry = CommandRegistry::new(create_root_command());
    super::register_commands(&mut registry)?;
    Ok(registry)
}

pub fn handle_commands(matches: &ArgMatches, json: bool) -> Result<()> {
    let registry = full_registry()?;
    match matches.subcommand() {
        Some(("list", _)) => {
            if json {
                return output::json(&registry.listing_json());
            }
            print!("{}", registry.render_listing());
            Ok(())
        }
        Some(("stats", _)) => {
            let stats = registry.stats();
            if json {
                return output::json(&stats);
            }
            println!("  {:<12} {}", "total", stats.total);
            for cat in CommandCategory::all() {
                let count = stats.per_category.get(cat).copied().unwrap_or(0);
                println!("  {:<12} {}", cat, count);
            }
            Ok(())
        }
        Some(("validate", _)) => {
            let issues = registry.validate();
            if json {
                return output::json(&issues);
            }
            if issues.is_empty() {
                output::success(&format!("{} commands, no issues", registry.len()));
            } else {
                for issue in &issues {
                    output::warning(issue);
                }
            }
            Ok(())
        }
        _ => Err(DbxError::Command(
            "Unknown commands subcommand. Use: list, stats, validate".into(),
        )),
    }
}
