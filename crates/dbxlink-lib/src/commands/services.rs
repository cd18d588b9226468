//! Lazily-built services shared by command handlers.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::actions::{ActionPipeline, ActionRegistry, AuthorizationHandshake, Collaborators};
use crate::backend::RepositoryClient;
use crate::config::DynamicConfigManager;
use crate::errors::Result;
use crate::host::browser::SystemBrowser;
use crate::host::terminal::{LoggingRefresher, SpinnerPresenter, TerminalNotifier};
use crate::host::PopupOpener;
use crate::http_client::HttpClient;
use crate::messages::MessageCatalog;

/// Central holder for lazily-initialized service instances.
///
/// Created once at startup and passed to the command dispatch layer. The
/// repository client and the action pipeline are built on first use from
/// the effective configuration, so `config` commands never touch them.
pub struct ServiceRegistry {
    pub config_manager: Arc<DynamicConfigManager>,
    pub http_client: HttpClient,
    quiet: bool,
    popup: Arc<dyn PopupOpener>,
    repository: OnceCell<Arc<RepositoryClient>>,
    actions: OnceCell<Arc<ActionRegistry>>,
}

impl ServiceRegistry {
    /// `quiet` suppresses human-readable notifications (used with `--json`).
    pub fn new(config_manager: Arc<DynamicConfigManager>, http_client: HttpClient, quiet: bool) -> Self {
        Self {
            config_manager,
            http_client,
            quiet,
            popup: Arc::new(SystemBrowser::new()),
            repository: OnceCell::new(),
            actions: OnceCell::new(),
        }
    }

    /// Rebuild the shared `HttpClient` whenever timeout or pool settings change.
    pub async fn register_config_listeners(&self) {
        let http = self.http_client.clone();
        self.config_manager
            .register_on_change(move |cfg| {
                let http = http.clone();
                let cfg = cfg.clone();
                tokio::spawn(async move {
                    if let Err(e) = http.update_from_config(&cfg).await {
                        tracing::warn!("Failed to update HttpClient from config: {e}");
                    }
                });
            })
            .await;
    }

    pub async fn messages(&self) -> MessageCatalog {
        MessageCatalog::with_overrides(&self.config_manager.effective_config().await.messages)
    }

    pub async fn handshake(&self) -> AuthorizationHandshake {
        AuthorizationHandshake::from_config(
            self.popup.clone(),
            &self.config_manager.effective_config().await,
        )
    }

    pub async fn repository(&self) -> Result<&Arc<RepositoryClient>> {
        self.repository
            .get_or_try_init(|| async {
                let config = self.config_manager.effective_config().await;
                Ok(Arc::new(RepositoryClient::new(self.http_client.clone(), &config)?))
            })
            .await
    }

    /// The action registry with the three transfer actions wired to
    /// terminal collaborators.
    pub async fn actions(&self) -> Result<&Arc<ActionRegistry>> {
        self.actions
            .get_or_try_init(|| async {
                let config = self.config_manager.effective_config().await;
                let backend = self.repository().await?.clone();
                let collaborators = Collaborators {
                    backend,
                    presenter: Arc::new(SpinnerPresenter::new()),
                    notifier: Arc::new(TerminalNotifier::new(self.quiet)),
                    refresher: Arc::new(LoggingRefresher::default()),
                    popup: self.popup.clone(),
                };
                let pipeline = Arc::new(ActionPipeline::new(collaborators, &config));
                Ok(Arc::new(ActionRegistry::with_default_actions(pipeline)))
            })
            .await
    }
}
