//! Terminal implementations of the presentation seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use indicatif::ProgressBar;

use super::{IndicatorId, IndicatorPresenter, ListingRefresher, Notifier, ShownSignal};
use crate::output;
use crate::output::progress::create_spinner;

/// Renders each indicator as an indicatif spinner on stderr.
///
/// A spinner is drawn synchronously, so the shown acknowledgment is sent
/// as soon as it exists.
#[derive(Default)]
pub struct SpinnerPresenter {
    spinners: Mutex<HashMap<IndicatorId, ProgressBar>>,
}

impl SpinnerPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn spinners(&self) -> MutexGuard<'_, HashMap<IndicatorId, ProgressBar>> {
        self.spinners.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn active(&self) -> usize {
        self.spinners().len()
    }
}

impl IndicatorPresenter for SpinnerPresenter {
    fn show(&self, id: IndicatorId, message: &str, shown: ShownSignal) {
        let spinner = create_spinner(message);
        self.spinners().insert(id, spinner);
        shown.acknowledge();
    }

    fn destroy(&self, id: IndicatorId) {
        match self.spinners().remove(&id) {
            Some(spinner) => spinner.finish_and_clear(),
            None => tracing::debug!(indicator = %id, "destroy for unknown spinner"),
        }
    }
}

/// Prints notifications as status lines. A quiet notifier only logs them,
/// which keeps stdout clean for `--json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier {
    quiet: bool,
}

impl TerminalNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for TerminalNotifier {
    fn show_notification(&self, message: &str) {
        if self.quiet {
            tracing::info!(notification = %message);
        } else {
            output::info(message);
        }
    }
}

/// There is no document listing on a terminal; refresh requests are logged and counted.
#[derive(Debug, Default)]
pub struct LoggingRefresher {
    requests: AtomicUsize,
}

impl LoggingRefresher {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl ListingRefresher for LoggingRefresher {
    fn refresh_listing(&self) {
        let n = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(requests = n, "document listing refresh requested");
    }
}
