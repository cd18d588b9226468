//! `account`: inspect and manage the Dropbox link of the current user.
//!
//! Subcommands: status, profile, link, delink.

use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;

use super::services::ServiceRegistry;
use crate::cli::{CommandBuilder, CommandCategory, CommandMeta};
use crate::errors::{DbxError, Result};
use crate::host::RepositoryBackend;
use crate::messages::{PROFILE_DELINK_FAILURE, PROFILE_DELINK_SUCCESS, PROFILE_LINK_FAILURE, PROFILE_NOT_LINKED};
use crate::{output, profile, tui};

pub fn account_command() -> Command {
    Command::new("account")
        .about("Inspect or change the linked Dropbox account")
        .subcommand_required(true)
        .subcommand(Command::new("status").about("Check whether a Dropbox account is linked"))
        .subcommand(Command::new("profile").about("Show the linked account and its quota"))
        .subcommand(
            Command::new("link")
                .about("Open the Dropbox consent page to link an account")
                .arg(
                    Arg::new("callback")
                        .long("callback")
                        .value_name("URL")
                        .help("Where Dropbox returns after consent (defaults to proxyUri)"),
                ),
        )
        .subcommand(
            Command::new("delink")
                .about("Remove the stored Dropbox link")
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Do not ask for confirmation"),
                ),
        )
}

pub fn account_meta() -> CommandMeta {
    CommandBuilder::from_clap(account_command())
        .category(CommandCategory::Account)
        .build()
}

#[derive(Debug, Serialize)]
struct LinkResult<'a> {
    opened: bool,
    auth_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DelinkResult {
    success: bool,
}

pub async fn handle_account(
    matches: &ArgMatches,
    services: &ServiceRegistry,
    json: bool,
) -> Result<ExitCode> {
    match matches.subcommand() {
        Some(("status", _)) => status(services, json).await,
        Some(("profile", _)) => show_profile(services, json).await,
        Some(("link", sub)) => link(sub, services, json).await,
        Some(("delink", sub)) => delink(sub, services, json).await,
        _ => Err(DbxError::Command(
            "Unknown account subcommand. Use: status, profile, link, delink".into(),
        )),
    }
}

async fn status(services: &ServiceRegistry, json: bool) -> Result<ExitCode> {
    let client = services.repository().await?;
    let status = client
        .check_auth_status()
        .await
        .map_err(|e| DbxError::AuthCheck(e.to_string()))?;
    if json {
        output::json(&status)?;
    } else if status.authenticated {
        output::success("Dropbox account linked");
    } else {
        output::warning(&services.messages().await.msg(PROFILE_NOT_LINKED));
        if let Some(url) = &status.auth_url {
            output::info(&format!("Authorize at: {}", url));
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn show_profile(services: &ServiceRegistry, json: bool) -> Result<ExitCode> {
    let client = services.repository().await?;
    let profile = profile::fetch_profile(client).await?;
    match (profile, json) {
        (Some(p), true) => output::json(&p)?,
        (Some(p), false) => println!("{}", tui::key_value_block(&p.rows())),
        (None, true) => output::json(&serde_json::json!({ "authenticated": false }))?,
        (None, false) => output::warning(&services.messages().await.msg(PROFILE_NOT_LINKED)),
    }
    Ok(ExitCode::SUCCESS)
}

async fn link(matches: &ArgMatches, services: &ServiceRegistry, json: bool) -> Result<ExitCode> {
    let client = services.repository().await?;
    let callback = matches
        .get_one::<String>("callback")
        .cloned()
        .unwrap_or_else(|| client.base_url().to_string());
    let handshake = services.handshake().await;

    match profile::link(client, &handshake, &callback).await {
        Ok(url) => {
            if json {
                output::json(&LinkResult {
                    opened: true,
                    auth_url: Some(&url),
                })?;
            } else {
                output::info(&format!("Complete the authorization in your browser: {}", url));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::warn!("link failed: {}", e);
            if json {
                output::json(&LinkResult {
                    opened: false,
                    auth_url: None,
                })?;
            } else {
                output::error(&services.messages().await.msg(PROFILE_LINK_FAILURE));
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn delink(matches: &ArgMatches, services: &ServiceRegistry, json: bool) -> Result<ExitCode> {
    if !matches.get_flag("yes") {
        let confirmed = tui::confirm("Unlink your Dropbox account?", false)?.unwrap_or(false);
        if !confirmed {
            output::info("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let client = services.repository().await?;
    let messages = services.messages().await;
    let success = match profile::delink(client).await {
        Ok(success) => success,
        Err(e @ DbxError::Config(_)) => return Err(e),
        Err(e) => {
            tracing::warn!("delink failed: {}", e);
            false
        }
    };

    if json {
        output::json(&DelinkResult { success })?;
    } else if success {
        output::success(&messages.msg(PROFILE_DELINK_SUCCESS));
    } else {
        output::error(&messages.msg(PROFILE_DELINK_FAILURE));
    }
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_subcommands() {
        let cmd = account_command();
        let subs: Vec<&str> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        assert_eq!(subs, vec!["status", "profile", "link", "delink"]);
    }

    #[test]
    fn test_delink_yes_flag() {
        let m = account_command()
            .try_get_matches_from(["account", "delink", "-y"])
            .unwrap();
        let (name, sub) = m.subcommand().unwrap();
        assert_eq!(name, "delink");
        assert!(sub.get_flag("yes"));
    }

    #[test]
    fn test_link_callback_optional() {
        let m = account_command()
            .try_get_matches_from(["account", "link"])
            .unwrap();
        let (_, sub) = m.subcommand().unwrap();
        assert!(sub.get_one::<String>("callback").is_none());
    }

    #[test]
    fn test_account_meta() {
        let meta = account_meta();
        assert_eq!(meta.name, "account");
        assert_eq!(meta.category, CommandCategory::Account);
    }
}
