use std::process::ExitCode;
use std::sync::Arc;

use dbxlink_lib::cli::{create_root_command, is_verbose, CommandRegistry};
use dbxlink_lib::commands::services::ServiceRegistry;
use dbxlink_lib::commands::{dispatch_command, register_commands};
use dbxlink_lib::config::{DynamicConfigManager, SimplifiedConfig};
use dbxlink_lib::errors::{handle_command_error, handle_fatal};
use dbxlink_lib::http_client::HttpClient;

#[tokio::main]
async fn main() -> ExitCode {
    // Environment snapshot (home, proxy URI and ticket overrides)
    let _env = SimplifiedConfig::get();

    let mut registry = CommandRegistry::new(create_root_command());
    if let Err(e) = register_commands(&mut registry) {
        handle_fatal(e);
    }
    let matches = registry.build_root().get_matches();

    let verbose = is_verbose(&matches);
    let json = matches.get_flag("json");
    dbxlink_lib::logger::set_verbose(verbose);
    dbxlink_lib::logger::init(verbose);

    let config_manager = match DynamicConfigManager::initialize(None).await {
        Ok(mgr) => Arc::new(mgr),
        Err(e) => handle_fatal(e),
    };
    let config = config_manager.effective_config().await;
    let http_client = match HttpClient::new(&config) {
        Ok(client) => client,
        Err(e) => handle_fatal(e),
    };
    let services = ServiceRegistry::new(config_manager, http_client, json);
    services.register_config_listeners().await;

    let Some((name, sub_matches)) = matches.subcommand() else {
        // subcommand_required makes clap exit before this point
        return ExitCode::FAILURE;
    };
    tracing::debug!(command = name, "Executing command");
    match dispatch_command(name, sub_matches, &services, json).await {
        Ok(code) => code,
        Err(e) => {
            handle_command_error(&e);
            ExitCode::FAILURE
        }
    }
}
