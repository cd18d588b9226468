use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use super::dynamic::DynamicConfig;
use super::simplified::SimplifiedConfig;
use crate::errors::{DbxError, Result};

type ChangeCallback = Box<dyn Fn(&DynamicConfig) + Send + Sync>;

/// Thread-safe manager for `DynamicConfig` with file persistence and change callbacks.
///
/// Loads configuration from `~/.dbxlink/config.json` (or a custom directory),
/// persists every mutation to disk, and notifies registered listeners on change.
pub struct DynamicConfigManager {
    config: Arc<RwLock<DynamicConfig>>,
    config_path: PathBuf,
    on_change: Arc<RwLock<Vec<ChangeCallback>>>,
}

impl DynamicConfigManager {
    /// Initialize the config manager.
    ///
    /// * If `config_dir` is `Some`, uses that directory for `config.json`.
    /// * Otherwise uses `SimplifiedConfig::config_dir`.
    /// * Creates the file with defaults when missing.
    /// * Falls back to defaults on any read/parse error (logs a warning).
    pub async fn initialize(config_dir: Option<PathBuf>) -> Result<Self> {
        let dir = config_dir.unwrap_or_else(|| SimplifiedConfig::get().config_dir.clone());
        let config_path = dir.join("config.json");
        let config = Self::load_or_create_config(&config_path).await;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
            on_change: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Return the absolute path to the configuration file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Return a clone of the configuration as stored on disk.
    pub async fn get_config(&self) -> DynamicConfig {
        self.config.read().await.clone()
    }

    /// Return the stored configuration with environment overrides applied.
    pub async fn effective_config(&self) -> DynamicConfig {
        let mut config = self.get_config().await;
        SimplifiedConfig::get().apply_overrides(&mut config);
        config
    }

    /// Apply a partial update from a JSON map of key-value pairs.
    ///
    /// Only known keys are accepted; every other field keeps its current
    /// value. The result is persisted and all registered callbacks run.
    pub async fn update_config(&self, updates: serde_json::Map<String, Value>) -> Result<()> {
        let mut config = self.config.write().await;

        let mut current_value = serde_json::to_value(&*config)
            .map_err(|e| DbxError::Config(format!("Failed to serialize config: {e}")))?;

        if let Some(obj) = current_value.as_object_mut() {
            for (key, value) in updates {
                if !obj.contains_key(&key) {
                    return Err(DbxError::Config(format!("Unknown config key: {key}")));
                }
                obj.insert(key, value);
            }
        }

        *config = serde_json::from_value(current_value)
            .map_err(|e| DbxError::Config(format!("Failed to apply config updates: {e}")))?;

        self.persist(&config).await?;
        self.notify_change(&config).await;

        Ok(())
    }

    /// Reset all fields to their default values, persist, and notify.
    pub async fn reset_to_defaults(&self) -> Result<()> {
        let mut config = self.config.write().await;
        *config = DynamicConfig::default();

        self.persist(&config).await?;
        self.notify_change(&config).await;

        Ok(())
    }

    /// Register a callback that fires on every config change.
    pub async fn register_on_change(
        &self,
        callback: impl Fn(&DynamicConfig) + Send + Sync + 'static,
    ) {
        self.on_change.write().await.push(Box::new(callback));
    }

    // ── private helpers ──────────────────────────────────────────────

    async fn load_or_create_config(path: &Path) -> DynamicConfig {
        if path.exists() {
            match tokio::fs::read_to_string(path).await {
                Ok(contents) => match serde_json::from_str::<DynamicConfig>(&contents) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to parse config file {}: {}. Using defaults.",
                            path.display(),
                            e
                        );
                        return DynamicConfig::default();
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        "Failed to read config file {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    return DynamicConfig::default();
                }
            }
        }

        let defaults = DynamicConfig::default();
        if let Err(e) = Self::write_config(path, &defaults).await {
            tracing::warn!(
                "Failed to create default config file {}: {}",
                path.display(),
                e
            );
        }
        defaults
    }

    async fn persist(&self, config: &DynamicConfig) -> Result<()> {
        Self::write_config(&self.config_path, config).await
    }

    async fn write_config(path: &Path, config: &DynamicConfig) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DbxError::Config(format!("Failed to create config dir: {e}")))?;
        }

        let json = serde_json::to_string_pretty(config)
            .map_err(|e| DbxError::Config(format!("Failed to serialize config: {e}")))?;

        tokio::fs::write(path, json)
            .await
            .map_err(|e| DbxError::Config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    async fn notify_change(&self, config: &DynamicConfig) {
        let callbacks = self.on_change.read().await;
        for cb in callbacks.iter() {
            cb(config);
        }
    }
}
