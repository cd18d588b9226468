//! Shared HTTP client with connection pooling and DynamicConfig integration.
//!
//! Wraps `reqwest::Client` and rebuilds it when configuration changes.
//! The client is safe to clone (internally `Arc`-ed) and can be shared
//! across concurrent invocations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::config::DynamicConfig;
use crate::errors::{DbxError, Result};

/// A shared HTTP client that rebuilds itself when `DynamicConfig` changes.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<RwLock<reqwest::Client>>,
}

impl HttpClient {
    /// Build a new `HttpClient` configured from the given `DynamicConfig`.
    pub fn new(config: &DynamicConfig) -> Result<Self> {
        let client = Self::build_client(config)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(client)),
        })
    }

    /// Build an `HttpClient` using `DynamicConfig::default()`.
    pub fn from_defaults() -> Result<Self> {
        Self::new(&DynamicConfig::default())
    }

    /// Get a clone of the current `reqwest::Client`.
    pub async fn get_client(&self) -> reqwest::Client {
        self.inner.read().await.clone()
    }

    /// Rebuild the inner client from an updated `DynamicConfig`.
    pub async fn update_from_config(&self, config: &DynamicConfig) -> Result<()> {
        let new_client = Self::build_client(config)?;
        *self.inner.write().await = new_client;
        Ok(())
    }

    fn build_client(config: &DynamicConfig) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout as u64))
            .connect_timeout(Duration::from_secs(config.connect_timeout as u64))
            .pool_max_idle_per_host(config.max_idle_conns_per_host as usize)
            .pool_idle_timeout(Duration::from_secs(config.idle_conn_timeout as u64))
            .build()
            .map_err(DbxError::Http)
    }
}
