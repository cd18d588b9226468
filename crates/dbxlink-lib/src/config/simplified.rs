use std::path::PathBuf;
use std::sync::OnceLock;

use super::dynamic::DynamicConfig;

/// Immutable settings read once from environment variables at startup.
///
/// Access via `SimplifiedConfig::get()` which returns a `&'static SimplifiedConfig`.
pub struct SimplifiedConfig {
    pub home_dir: PathBuf,
    pub config_dir: PathBuf,
    pub proxy_uri: Option<String>,
    pub alf_ticket: Option<String>,
    pub user_name: Option<String>,
}

static CONFIG: OnceLock<SimplifiedConfig> = OnceLock::new();

impl SimplifiedConfig {
    /// Returns the global singleton, initializing it from the environment on first call.
    pub fn get() -> &'static SimplifiedConfig {
        CONFIG.get_or_init(|| SimplifiedConfig::from_lookup(|key| std::env::var(key).ok()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let home_dir = PathBuf::from(lookup("HOME").unwrap_or_else(|| "/tmp".to_string()));
        let config_dir = lookup("DBXLINK_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir.join(".dbxlink"));
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            proxy_uri: non_empty("DBXLINK_PROXY_URI"),
            alf_ticket: non_empty("DBXLINK_TICKET"),
            user_name: non_empty("USER"),
            config_dir,
            home_dir,
        }
    }

    /// Overlay environment-provided values onto a file-backed config.
    ///
    /// The proxy URI and ticket from the environment always win; the
    /// login name only fills in a blank `userName`.
    pub fn apply_overrides(&self, config: &mut DynamicConfig) {
        if let Some(uri) = &self.proxy_uri {
            config.proxy_uri = uri.clone();
        }
        if let Some(ticket) = &self.alf_ticket {
            config.alf_ticket = ticket.clone();
        }
        if config.user_name.is_empty() {
            if let Some(user) = &self.user_name {
                config.user_name = user.clone();
            }
        }
    }
}
