//! Authorization handshake: sends an unlinked user to the consent page.

use std::sync::Arc;

use crate::config::DynamicConfig;
use crate::errors::Result;
use crate::host::PopupOpener;

/// Opens the provider consent page in a named popup.
///
/// Fire-and-forget: nothing reports back when the user finishes linking.
/// The next invocation of an action re-checks the status.
pub struct AuthorizationHandshake {
    opener: Arc<dyn PopupOpener>,
    window_name: String,
    features: String,
}

impl AuthorizationHandshake {
    pub fn new(
        opener: Arc<dyn PopupOpener>,
        window_name: impl Into<String>,
        features: impl Into<String>,
    ) -> Self {
        Self {
            opener,
            window_name: window_name.into(),
            features: features.into(),
        }
    }

    pub fn from_config(opener: Arc<dyn PopupOpener>, config: &DynamicConfig) -> Self {
        Self::new(
            opener,
            config.popup_window_name.clone(),
            config.popup_features.clone(),
        )
    }

    pub fn open(&self, auth_url: &str) -> Result<()> {
        tracing::info!(window = %self.window_name, "opening authorization window");
        self.opener
            .open_popup(auth_url, &self.window_name, &self.features)
    }
}
