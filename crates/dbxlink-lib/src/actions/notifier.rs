//! Completion notifier: outcome message followed by a listing refresh.

use std::sync::Arc;

use super::types::OperationOutcome;
use crate::host::{ListingRefresher, Notifier};
use crate::messages::MessageCatalog;

/// Shows the outcome message and re-syncs the document listing.
pub struct CompletionNotifier {
    notifier: Arc<dyn Notifier>,
    refresher: Arc<dyn ListingRefresher>,
    messages: Arc<MessageCatalog>,
}

impl CompletionNotifier {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        refresher: Arc<dyn ListingRefresher>,
        messages: Arc<MessageCatalog>,
    ) -> Self {
        Self {
            notifier,
            refresher,
            messages,
        }
    }

    /// Report a settled transfer. The listing is refreshed on failure too,
    /// since a failed batch may still have changed some nodes server-side.
    pub fn complete(&self, outcome: OperationOutcome) {
        self.notifier
            .show_notification(&self.messages.outcome(outcome));
        self.refresher.refresh_listing();
    }

    /// Report that the status check itself failed. No refresh: nothing ran.
    pub fn authentication_failed(&self) {
        self.notifier
            .show_notification(&self.messages.authentication_failure());
    }
}
