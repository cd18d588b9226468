//! Authentication gate: one status check decides proceed, handshake or failure.

use std::sync::Arc;

use crate::errors::{DbxError, Result};
use crate::host::RepositoryBackend;

/// What the pipeline should do after the status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The user has a valid link; run the transfer.
    Proceed,
    /// The user is not linked; send them to `auth_url`.
    Handshake { auth_url: String },
}

/// Checks, once per invocation, whether the user is linked to the external account.
pub struct AuthenticationGate {
    backend: Arc<dyn RepositoryBackend>,
}

impl AuthenticationGate {
    pub fn new(backend: Arc<dyn RepositoryBackend>) -> Self {
        Self { backend }
    }

    /// Issue one status request. No retries: an error here ends the invocation.
    pub async fn check(&self) -> Result<GateDecision> {
        let status = self
            .backend
            .check_auth_status()
            .await
            .map_err(|e| DbxError::AuthCheck(e.to_string()))?;

        if status.authenticated {
            return Ok(GateDecision::Proceed);
        }

        match status.auth_url {
            Some(auth_url) if !auth_url.trim().is_empty() => Ok(GateDecision::Handshake { auth_url }),
            _ => Err(DbxError::AuthCheck(
                "account is not linked and no authorization URL was returned".into(),
            )),
        }
    }
}
