//! Message lookup for indicator, notification and profile text.
//!
//! Keys follow the `dropbox.actions.document.*` / `dropbox.profile.*`
//! naming used by the repository UI bundle. Unknown keys resolve to the
//! key itself so a missing translation is visible rather than blank.

use std::collections::{BTreeMap, HashMap};

use crate::actions::{OperationKind, OperationOutcome};

pub const AUTHENTICATION_FAILURE: &str = "dropbox.actions.document.authentication.failure";
pub const PROFILE_LINK_FAILURE: &str = "dropbox.profile.link.failure";
pub const PROFILE_DELINK_SUCCESS: &str = "dropbox.profile.delink.success";
pub const PROFILE_DELINK_FAILURE: &str = "dropbox.profile.delink.failure";
pub const PROFILE_NOT_LINKED: &str = "dropbox.profile.not-linked";

const DEFAULTS: &[(&str, &str)] = &[
    ("dropbox.actions.document.message.sendto", "Sending to Dropbox..."),
    ("dropbox.actions.document.message.getfrom", "Getting from Dropbox..."),
    ("dropbox.actions.document.message.remove", "Removing from Dropbox..."),
    ("dropbox.actions.document.sendto.success", "Sent to Dropbox"),
    ("dropbox.actions.document.sendto.failure", "Could not send to Dropbox"),
    ("dropbox.actions.document.getfrom.success", "Retrieved from Dropbox"),
    ("dropbox.actions.document.getfrom.failure", "Could not get from Dropbox"),
    ("dropbox.actions.document.remove.success", "Removed from Dropbox"),
    ("dropbox.actions.document.remove.failure", "Could not remove from Dropbox"),
    (AUTHENTICATION_FAILURE, "Could not verify your Dropbox account"),
    (PROFILE_LINK_FAILURE, "Could not start linking your Dropbox account"),
    (PROFILE_DELINK_SUCCESS, "Dropbox account unlinked"),
    (PROFILE_DELINK_FAILURE, "Could not unlink your Dropbox account"),
    (PROFILE_NOT_LINKED, "No Dropbox account is linked"),
];

/// Resolves message keys to display text.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    entries: HashMap<String, String>,
}

impl MessageCatalog {
    /// Catalog holding the built-in English text.
    pub fn new() -> Self {
        let entries = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { entries }
    }

    /// Built-in text with per-key overrides layered on top.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut catalog = Self::new();
        for (key, text) in overrides {
            catalog.entries.insert(key.clone(), text.clone());
        }
        catalog
    }

    pub fn msg(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Text shown by the loading indicator while `kind` is in flight.
    pub fn working(&self, kind: OperationKind) -> String {
        self.msg(&format!("dropbox.actions.document.message.{}", kind.message_segment()))
    }

    /// Kind-specific success or failure text.
    pub fn outcome(&self, outcome: OperationOutcome) -> String {
        let suffix = if outcome.is_success() { "success" } else { "failure" };
        self.msg(&format!(
            "dropbox.actions.document.{}.{}",
            outcome.kind().message_segment(),
            suffix
        ))
    }

    pub fn authentication_failure(&self) -> String {
        self.msg(AUTHENTICATION_FAILURE)
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}
