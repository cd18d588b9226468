//! `send`, `get` and `remove`: run one transfer action over the given nodes.

use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};

use super::services::ServiceRegistry;
use crate::actions::{InvocationReport, OperationKind, Selection, TargetItem};
use crate::cli::{CommandBuilder, CommandCategory, CommandMeta};
use crate::errors::Result;
use crate::output;

fn about(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::SendTo => "Send documents to Dropbox",
        OperationKind::GetFrom => "Get the Dropbox copy of documents back into the repository",
        OperationKind::Remove => "Remove documents from Dropbox",
    }
}

fn aliases(kind: OperationKind) -> &'static [&'static str] {
    match kind {
        OperationKind::SendTo => &["send-to"],
        OperationKind::GetFrom => &["get-from"],
        OperationKind::Remove => &["rm"],
    }
}

/// Build the clap command for one transfer kind.
pub fn transfer_command(kind: OperationKind) -> Command {
    Command::new(kind.as_str()).about(about(kind)).arg(
        Arg::new("nodes")
            .value_name("NODE_REF")
            .help("Repository node references, e.g. workspace://SpacesStore/<id>")
            .required(true)
            .num_args(1..)
            .action(ArgAction::Append),
    )
}

pub fn transfer_meta(kind: OperationKind) -> CommandMeta {
    CommandBuilder::from_clap(transfer_command(kind))
        .category(CommandCategory::Transfer)
        .aliases(aliases(kind))
        .build()
}

/// One node stays a single item; several become a list.
pub fn selection_from(matches: &ArgMatches) -> Selection {
    let mut items: Vec<TargetItem> = matches
        .get_many::<String>("nodes")
        .map(|vals| vals.map(|v| TargetItem::new(v.as_str())).collect())
        .unwrap_or_default();
    if items.len() == 1 {
        Selection::One(items.remove(0))
    } else {
        Selection::Many(items)
    }
}

pub async fn handle_transfer(
    kind: OperationKind,
    matches: &ArgMatches,
    services: &ServiceRegistry,
    json: bool,
) -> Result<ExitCode> {
    let selection = selection_from(matches);
    let actions = services.actions().await?;
    let report = actions.invoke(kind.action_name(), selection).await?;

    if json {
        output::json(&report)?;
    } else if let InvocationReport::AuthorizationRequested { auth_url } = &report {
        tracing::info!(%auth_url, "authorization window requested");
    }

    match report.error() {
        Some(err) => {
            tracing::debug!("{}", err);
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}
