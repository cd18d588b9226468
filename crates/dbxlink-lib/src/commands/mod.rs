pub mod account;
pub mod actions_cmd;
pub mod commands_cmd;
pub mod config_cmd;
pub mod services;
pub mod transfer;

use std::process::ExitCode;

use clap::ArgMatches;

use crate::actions::OperationKind;
use crate::cli::CommandRegistry;
use crate::errors::{DbxError, Result};
use services::ServiceRegistry;

/// Register every `dbxlink` command.
pub fn register_commands(registry: &mut CommandRegistry) -> Result<()> {
    for &kind in OperationKind::all() {
        registry.register(transfer::transfer_meta(kind))?;
    }
    registry.register(account::account_meta())?;
    registry.register(actions_cmd::actions_meta())?;
    registry.register(commands_cmd::commands_meta())?;
    registry.register(config_cmd::config_meta())?;
    Ok(())
}

/// Dispatch a parsed command to its handler.
///
/// Returns the process exit code: a transfer that ended in failure, or an
/// auth check that could not complete, exits non-zero without an `Err`
/// because the user was already notified.
pub async fn dispatch_command(
    name: &str,
    matches: &ArgMatches,
    services: &ServiceRegistry,
    json: bool,
) -> Result<ExitCode> {
    if let Some(kind) = OperationKind::from_str_value(name) {
        return transfer::handle_transfer(kind, matches, services, json).await;
    }
    match name {
        "account" => account::handle_account(matches, services, json).await,
        "actions" => {
            actions_cmd::handle_actions(services, json).await?;
            Ok(ExitCode::SUCCESS)
        }
        "commands" => {
            commands_cmd::handle_commands(matches, json)?;
            Ok(ExitCode::SUCCESS)
        }
        "config" => {
            config_cmd::handle_config(matches, &services.config_manager).await?;
            Ok(ExitCode::SUCCESS)
        }
        _ => Err(DbxError::Command(format!("Unknown command: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{create_root_command, CommandCategory};

    const EXPECTED_COMMANDS: &[&str] = &[
        "account", "actions", "commands", "config", "get", "remove", "send",
    ];

    #[test]
    fn test_register_commands() {
        let mut registry = CommandRegistry::new(create_root_command());
        register_commands(&mut registry).unwrap();

        assert_eq!(registry.command_names(), EXPECTED_COMMANDS);
        assert_eq!(registry.get_by_category(CommandCategory::Transfer).len(), 3);
        assert!(registry.validate().is_empty());
    }

    #[test]
    fn test_root_parses_transfer_alias() {
        let mut registry = CommandRegistry::new(create_root_command());
        register_commands(&mut registry).unwrap();
        let root = registry.build_root();

        let m = root
            .try_get_matches_from(["dbxlink", "rm", "workspace://SpacesStore/a"])
            .unwrap();
        let (name, sub) = m.subcommand().unwrap();
        assert_eq!(name, "remove");
        assert_eq!(
            sub.get_many::<String>("nodes").unwrap().count(),
            1
        );
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let tmp = tempfile::tempdir().unwrap();
        let mgr = crate::config::DynamicConfigManager::initialize(Some(tmp.path().to_path_buf()))
            .await
            .unwrap();
        let services = ServiceRegistry::new(
            std::sync::Arc::new(mgr),
            crate::http_client::HttpClient::from_defaults().unwrap(),
            true,
        );
        let m = clap::Command::new("x").get_matches_from(["x"]);
        let result = dispatch_command("share", &m, &services, false).await;
        assert!(matches!(result, Err(DbxError::Command(_))));
    }
}
