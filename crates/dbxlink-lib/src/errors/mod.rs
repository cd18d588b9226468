use thiserror::Error;

use crate::actions::OperationKind;

#[derive(Error, Debug)]
pub enum DbxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication check failed: {0}")]
    AuthCheck(String),

    #[error("Transfer failed ({kind}): {message}")]
    Transfer { kind: OperationKind, message: String },

    #[error("Selection is empty: at least one node is required")]
    EmptySelection,

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Popup error: {0}")]
    Popup(String),

    #[error("Command error: {0}")]
    Command(String),

    #[error("{0}")]
    Application(String),
}

pub type Result<T> = std::result::Result<T, DbxError>;

/// Logs a fatal error and exits the process with code 1.
///
/// Intended for unrecoverable errors during start-up.
pub fn handle_fatal(err: DbxError) -> ! {
    tracing::error!("Fatal error: {}", err);
    std::process::exit(1)
}

/// Maps a `DbxError` to user-friendly CLI output with actionable suggestions.
pub fn handle_command_error(err: &DbxError) {
    use crate::output;

    match err {
        DbxError::AuthCheck(msg) => {
            output::error(&format!("Authentication check failed: {}", msg));
            output::info("Run `dbxlink account status` to inspect the Dropbox link.");
        }
        DbxError::Transfer { kind, message } => {
            output::error(&format!("{} failed: {}", kind, message));
        }
        DbxError::Server { status, message } => {
            output::error(&format!("Repository returned {}: {}", status, message));
            if *status == 401 || *status == 403 {
                output::info("Set a valid ticket with `dbxlink config set alfTicket <ticket>`.");
            }
        }
        DbxError::Http(e) => {
            output::error(&format!("Network error: {}", e));
            output::info("Check that `proxyUri` points at a reachable repository proxy.");
        }
        DbxError::EmptySelection => {
            output::error("Nothing selected.");
            output::info("Pass at least one nodeRef, e.g. workspace://SpacesStore/<id>.");
        }
        DbxError::UnknownAction(name) => {
            output::error(&format!("Unknown action: {}", name));
            output::info("Run `dbxlink actions` to list registered actions.");
        }
        DbxError::Popup(msg) => {
            output::error(&format!("Could not open the authorization window: {}", msg));
        }
        DbxError::Config(msg) => {
            output::error(&format!("Configuration error: {}", msg));
        }
        DbxError::Io(e) => {
            output::error(&format!("File error: {}", e));
        }
        _ => {
            output::error(&format!("{}", err));
        }
    }
}
