//! Opens the consent page in the user's default browser.

use std::collections::HashSet;
use std::sync::Mutex;

use super::PopupOpener;
use crate::errors::{DbxError, Result};

/// `PopupOpener` backed by the system URL handler.
///
/// A system browser has no notion of named windows or window features, so
/// the name is only tracked to log when the same logical window is reused.
#[derive(Default)]
pub struct SystemBrowser {
    program: Option<String>,
    windows: Mutex<HashSet<String>>,
}

impl SystemBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open URLs with `program` instead of the default browser.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: Some(program.into()),
            ..Self::default()
        }
    }
}

impl PopupOpener for SystemBrowser {
    fn open_popup(&self, url: &str, name: &str, features: &str) -> Result<()> {
        let reused = !self
            .windows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string());
        tracing::debug!(window = %name, reused, features = %features, "launching browser");

        let opened = match &self.program {
            Some(program) => open::with(url, program.as_str()),
            None => open::that(url),
        };
        opened.map_err(|e| DbxError::Popup(format!("could not launch browser for {}: {}", name, e)))
    }
}
