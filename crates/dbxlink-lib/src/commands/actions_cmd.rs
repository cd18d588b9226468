//! `actions`: list the action names the registry exposes to the host.

use clap::Command;
use serde::Serialize;

use super::services::ServiceRegistry;
use crate::actions::{ActionRegistry, OperationKind};
use crate::cli::{CommandBuilder, CommandCategory, CommandMeta};
use crate::errors::Result;
use crate::output;

pub fn actions_command() -> Command {
    Command::new("actions").about("List registered document actions")
}

pub fn actions_meta() -> CommandMeta {
    CommandBuilder::from_clap(actions_command())
        .category(CommandCategory::System)
        .build()
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ActionEntry {
    pub name: String,
    pub kind: Option<OperationKind>,
    pub command: Option<&'static str>,
}

pub fn entries(registry: &ActionRegistry) -> Vec<ActionEntry> {
    registry
        .names()
        .into_iter()
        .map(|name| {
            let kind = OperationKind::all()
                .iter()
                .copied()
                .find(|k| k.action_name() == name);
            ActionEntry {
                name: name.to_string(),
                kind,
                command: kind.map(|k| k.as_str()),
            }
        })
        .collect()
}

pub async fn handle_actions(services: &ServiceRegistry, json: bool) -> Result<()> {
    let registry = services.actions().await?;
    let entries = entries(registry);
    if json {
        return output::json(&entries);
    }
    for entry in &entries {
        match entry.command {
            Some(cmd) => println!("  {:<26} dbxlink {}", entry.name, cmd),
            None => println!("  {}", entry.name),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::actions::{InvocationReport, TargetItems};
    use futures_util::FutureExt;

    #[test]
    fn entries_map_names_to_commands() {
        let mut registry = ActionRegistry::new();
        registry.register(
            OperationKind::Remove.action_name(),
            Arc::new(|_: TargetItems| async { InvocationReport::AuthCheckFailed { reason: String::new() } }.boxed()),
        );
        registry.register(
            "onCustom",
            Arc::new(|_: TargetItems| async { InvocationReport::AuthCheckFailed { reason: String::new() } }.boxed()),
        );

        let entries = entries(&registry);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "onCustom");
        assert_eq!(entries[0].command, None);
        assert_eq!(entries[1].kind, Some(OperationKind::Remove));
        assert_eq!(entries[1].command, Some("remove"));
    }

    #[test]
    fn test_actions_meta() {
        assert_eq!(actions_meta().category, CommandCategory::System);
    }
}
