//! Transfer executor: one batched backend call per invocation.

use std::sync::Arc;

use super::types::{OperationKind, OperationOutcome, TargetItems};
use crate::host::RepositoryBackend;

/// Runs the single batched transfer call for one invocation.
pub struct TransferExecutor {
    backend: Arc<dyn RepositoryBackend>,
}

impl TransferExecutor {
    pub fn new(backend: Arc<dyn RepositoryBackend>) -> Self {
        Self { backend }
    }

    /// Issue exactly one call carrying every node reference. The batch
    /// succeeds or fails as a unit; there is no retry.
    pub async fn execute(&self, kind: OperationKind, targets: &TargetItems) -> OperationOutcome {
        let node_refs = targets.node_refs();
        match self.backend.transfer(kind, &node_refs).await {
            Ok(response) if response.success => {
                tracing::info!(%kind, nodes = node_refs.len(), "transfer succeeded");
                OperationOutcome::Success(kind)
            }
            Ok(_) => {
                tracing::warn!(%kind, nodes = node_refs.len(), "transfer reported failure");
                OperationOutcome::Failure(kind)
            }
            Err(e) => {
                tracing::warn!(%kind, nodes = node_refs.len(), "transfer failed: {}", e);
                OperationOutcome::Failure(kind)
            }
        }
    }
}
