//! Action registry: the named actions the host UI can invoke.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use super::pipeline::{ActionPipeline, InvocationReport};
use super::types::{OperationKind, Selection, TargetItems};
use crate::errors::{DbxError, Result};

/// Handler bound to an action name. Receives a normalized, non-empty target list.
pub type ActionHandler = Arc<dyn Fn(TargetItems) -> BoxFuture<'static, InvocationReport> + Send + Sync>;

/// Maps host-visible action names to their handlers.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: BTreeMap<String, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the three transfer actions bound to `pipeline`.
    pub fn with_default_actions(pipeline: Arc<ActionPipeline>) -> Self {
        let mut registry = Self::new();
        for &kind in OperationKind::all() {
            let pipeline = pipeline.clone();
            registry.register(
                kind.action_name(),
                Arc::new(move |targets: TargetItems| {
                    let pipeline = pipeline.clone();
                    async move { pipeline.invoke(kind, targets).await }.boxed()
                }),
            );
        }
        registry
    }

    /// Bind `name` to `handler`, replacing any previous binding.
    pub fn register(&mut self, name: impl Into<String>, handler: ActionHandler) {
        let name = name.into();
        if self.handlers.insert(name.clone(), handler).is_some() {
            tracing::debug!(action = %name, "replaced action handler");
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Run the handler for `name`. A single item and a list of items are
    /// both accepted; an empty list is rejected before anything starts.
    pub async fn invoke(&self, name: &str, selection: Selection) -> Result<InvocationReport> {
        let handler = self
            .handlers
            .get(name)
            .cloned()
            .ok_or_else(|| DbxError::UnknownAction(name.to_string()))?;
        let targets = TargetItems::from_selection(selection)?;
        tracing::debug!(action = %name, nodes = targets.len(), "invoking action");
        Ok(handler(targets).await)
    }
}
