//! Collaborator seams between the action pipeline and its host.
//!
//! The pipeline never talks to a terminal, a browser or the network
//! directly; it goes through these traits. The CLI wires in
//! `terminal` and `browser` implementations plus the HTTP backend.

pub mod browser;
pub mod terminal;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::actions::{AuthStatus, OperationKind, TransferResponse};
use crate::errors::Result;

/// Repository calls the pipeline depends on.
#[async_trait]
pub trait RepositoryBackend: Send + Sync {
    /// Read-only check of whether the current user has a linked account.
    async fn check_auth_status(&self) -> Result<AuthStatus>;

    /// One batched transfer call carrying every node reference.
    async fn transfer(&self, kind: OperationKind, node_refs: &[String]) -> Result<TransferResponse>;
}

/// Presentation primitive for the transient "working…" indicator.
///
/// `destroy` must never be called for an id whose `ShownSignal` has not
/// been acknowledged; the loading indicator controller enforces this.
pub trait IndicatorPresenter: Send + Sync {
    fn show(&self, id: IndicatorId, message: &str, shown: ShownSignal);
    fn destroy(&self, id: IndicatorId);
}

/// Fire-and-forget user notification.
pub trait Notifier: Send + Sync {
    fn show_notification(&self, message: &str);
}

/// Fire-and-forget request to reload the surrounding document listing.
pub trait ListingRefresher: Send + Sync {
    fn refresh_listing(&self);
}

/// Opens an out-of-band browser viewport.
pub trait PopupOpener: Send + Sync {
    fn open_popup(&self, url: &str, name: &str, features: &str) -> Result<()>;
}

/// Identity of one indicator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndicatorId(u64);

static NEXT_INDICATOR: AtomicU64 = AtomicU64::new(1);

impl IndicatorId {
    pub fn next() -> Self {
        Self(NEXT_INDICATOR.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "indicator-{}", self.0)
    }
}

/// One-shot "the indicator has finished appearing" acknowledgment.
///
/// Handed to the presenter with every `show`; the presenter calls
/// `acknowledge` once, from any thread, whenever the appearance settles.
#[derive(Debug)]
pub struct ShownSignal {
    tx: watch::Sender<bool>,
}

impl ShownSignal {
    pub(crate) fn channel() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, rx)
    }

    pub fn acknowledge(self) {
        self.tx.send_replace(true);
    }
}
