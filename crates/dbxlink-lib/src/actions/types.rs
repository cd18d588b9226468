use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{DbxError, Result};

/// The three transfer operations offered on a repository node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    SendTo,
    GetFrom,
    Remove,
}

impl OperationKind {
    pub fn all() -> &'static [OperationKind] {
        &[
            OperationKind::SendTo,
            OperationKind::GetFrom,
            OperationKind::Remove,
        ]
    }

    /// Name under which the action is registered with the host UI.
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::SendTo => "onDropboxActionSendTo",
            Self::GetFrom => "onDropboxActionGetFrom",
            Self::Remove => "onDropboxActionRemove",
        }
    }

    /// Segment used in message keys (`dropbox.actions.document.<segment>.*`).
    pub fn message_segment(&self) -> &'static str {
        match self {
            Self::SendTo => "sendto",
            Self::GetFrom => "getfrom",
            Self::Remove => "remove",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SendTo => "send",
            Self::GetFrom => "get",
            Self::Remove => "remove",
        }
    }

    pub fn from_str_value(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "send" | "sendto" => Some(Self::SendTo),
            "get" | "getfrom" => Some(Self::GetFrom),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One repository node selected for transfer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetItem {
    #[serde(rename = "nodeRef")]
    pub node_ref: String,
}

impl TargetItem {
    pub fn new(node_ref: impl Into<String>) -> Self {
        Self {
            node_ref: node_ref.into(),
        }
    }
}

/// What the host hands to an action: a single node or a multi-selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    One(TargetItem),
    Many(Vec<TargetItem>),
}

impl From<TargetItem> for Selection {
    fn from(item: TargetItem) -> Self {
        Selection::One(item)
    }
}

impl From<Vec<TargetItem>> for Selection {
    fn from(items: Vec<TargetItem>) -> Self {
        Selection::Many(items)
    }
}

/// Non-empty, ordered sequence of nodes for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetItems(Vec<TargetItem>);

impl TargetItems {
    pub fn new(items: Vec<TargetItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(DbxError::EmptySelection);
        }
        Ok(Self(items))
    }

    pub fn single(item: TargetItem) -> Self {
        Self(vec![item])
    }

    /// Normalize host input; a single item becomes a one-element sequence.
    pub fn from_selection(selection: Selection) -> Result<Self> {
        match selection {
            Selection::One(item) => Ok(Self::single(item)),
            Selection::Many(items) => Self::new(items),
        }
    }

    pub fn node_refs(&self) -> Vec<String> {
        self.0.iter().map(|item| item.node_ref.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Result of the authentication status request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(rename = "auth_url", default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
}

impl AuthStatus {
    pub fn linked() -> Self {
        Self {
            authenticated: true,
            auth_url: None,
        }
    }

    pub fn unlinked(auth_url: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            auth_url: Some(auth_url.into()),
        }
    }
}

/// Reply of a batched transfer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResponse {
    pub success: bool,
}

/// Outcome of a transfer, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "kind", rename_all = "lowercase")]
pub enum OperationOutcome {
    Success(OperationKind),
    Failure(OperationKind),
}

impl OperationOutcome {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Success(kind) | Self::Failure(kind) => *kind,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
