//! Config CLI command: view and modify configuration.
//!
//! Subcommands: show, set, reset, path.
//! Named `config_cmd` to avoid conflict with the `config` module.

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;

use crate::cli::{CommandBuilder, CommandCategory, CommandMeta};
use crate::config::DynamicConfigManager;
use crate::errors::{DbxError, Result};
use crate::output;

/// Build the `config` clap command.
pub fn config_command() -> Command {
    Command::new("config")
        .aliases(["c", "conf"])
        .about("Show or change configuration")
        .subcommand_required(true)
        .subcommand(
            Command::new("show").about("Print the configuration").arg(
                Arg::new("effective")
                    .long("effective")
                    .action(ArgAction::SetTrue)
                    .help("Include environment overrides"),
            ),
        )
        .subcommand(
            Command::new("set")
                .about("Set one key (camelCase); JSON values are parsed, anything else is a string")
                .arg(Arg::new("key").required(true))
                .arg(Arg::new("value").required(true)),
        )
        .subcommand(Command::new("reset").about("Restore every key to its default"))
        .subcommand(Command::new("path").about("Print the configuration file path"))
}

/// Build the `CommandMeta` for registry registration.
pub fn config_meta() -> CommandMeta {
    CommandBuilder::from_clap(config_command())
        .category(CommandCategory::System)
        .build()
}

/// Interpret a command-line value: valid JSON keeps its type, other text is a string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Handle the `config` command.
pub async fn handle_config(matches: &ArgMatches, config_mgr: &DynamicConfigManager) -> Result<()> {
    match matches.subcommand() {
        Some(("show", sub)) => {
            let config = if sub.get_flag("effective") {
                config_mgr.effective_config().await
            } else {
                config_mgr.get_config().await
            };
            output::json(&config)
        }
        Some(("set", sub)) => {
            let key = sub
                .get_one::<String>("key")
                .ok_or_else(|| DbxError::Command("missing key".into()))?;
            let raw = sub
                .get_one::<String>("value")
                .ok_or_else(|| DbxError::Command("missing value".into()))?;
            let mut updates = serde_json::Map::new();
            updates.insert(key.clone(), parse_value(raw));
            config_mgr.update_config(updates).await?;
            output::success(&format!("Updated {}", key));
            Ok(())
        }
        Some(("reset", _)) => {
            config_mgr.reset_to_defaults().await?;
            output::success("Configuration reset to defaults");
            Ok(())
        }
        Some(("path", _)) => {
            println!("{}", config_mgr.config_path().display());
            Ok(())
        }
        _ => Err(DbxError::Command(
            "Unknown config subcommand. Use: show, set, reset, path".into(),
        )),
    }
}
