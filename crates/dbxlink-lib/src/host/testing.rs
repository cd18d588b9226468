//! Recording collaborators shared by the pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{
    IndicatorId, IndicatorPresenter, ListingRefresher, Notifier, PopupOpener, RepositoryBackend,
    ShownSignal,
};
use crate::actions::{AuthStatus, OperationKind, TransferResponse};
use crate::errors::{DbxError, Result};

// -- backend --

#[derive(Clone)]
pub enum AuthReply {
    Status(AuthStatus),
    Fail,
}

pub struct FakeBackend {
    auth: AuthReply,
    transfer_success: bool,
    transfer_error: bool,
    failing_kinds: Vec<OperationKind>,
    auth_delay: Duration,
    transfer_delay: Duration,
    pub auth_calls: AtomicUsize,
    pub transfers: Mutex<Vec<(OperationKind, Vec<String>)>>,
}

impl FakeBackend {
    pub fn new(auth: AuthReply) -> Self {
        Self {
            auth,
            transfer_success: true,
            transfer_error: false,
            failing_kinds: Vec::new(),
            auth_delay: Duration::ZERO,
            transfer_delay: Duration::ZERO,
            auth_calls: AtomicUsize::new(0),
            transfers: Mutex::new(Vec::new()),
        }
    }

    pub fn linked() -> Self {
        Self::new(AuthReply::Status(AuthStatus::linked()))
    }

    pub fn transfer_succeeds(mut self, success: bool) -> Self {
        self.transfer_success = success;
        self
    }

    pub fn transfer_errors(mut self) -> Self {
        self.transfer_error = true;
        self
    }

    pub fn transfer_fails_for(mut self, kind: OperationKind) -> Self {
        self.failing_kinds.push(kind);
        self
    }

    pub fn delays(mut self, auth: Duration, transfer: Duration) -> Self {
        self.auth_delay = auth;
        self.transfer_delay = transfer;
        self
    }

    pub fn transfer_calls(&self) -> Vec<(OperationKind, Vec<String>)> {
        self.transfers.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryBackend for FakeBackend {
    async fn check_auth_status(&self) -> Result<AuthStatus> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        if !self.auth_delay.is_zero() {
            tokio::time::sleep(self.auth_delay).await;
        }
        match &self.auth {
            AuthReply::Status(status) => Ok(status.clone()),
            AuthReply::Fail => Err(DbxError::Server {
                status: 500,
                message: "account lookup failed".into(),
            }),
        }
    }

    async fn transfer(&self, kind: OperationKind, node_refs: &[String]) -> Result<TransferResponse> {
        self.transfers
            .lock()
            .unwrap()
            .push((kind, node_refs.to_vec()));
        if !self.transfer_delay.is_zero() {
            tokio::time::sleep(self.transfer_delay).await;
        }
        if self.transfer_error {
            return Err(DbxError::Application("connection reset".into()));
        }
        Ok(TransferResponse {
            success: self.transfer_success && !self.failing_kinds.contains(&kind),
        })
    }
}

// -- presenter --

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    Show(IndicatorId, String),
    Acked(IndicatorId),
    Destroy(IndicatorId),
}

#[derive(Debug, Clone, Copy)]
pub enum AckMode {
    Immediate,
    After(Duration),
    Manual,
    Never,
}

#[derive(Default)]
struct PresenterLog {
    events: Vec<PresenterEvent>,
    acked: HashSet<IndicatorId>,
    violations: Vec<IndicatorId>,
    pending: HashMap<IndicatorId, ShownSignal>,
}

pub struct RecordingPresenter {
    mode: AckMode,
    log: Arc<Mutex<PresenterLog>>,
}

impl RecordingPresenter {
    pub fn new(mode: AckMode) -> Self {
        Self {
            mode,
            log: Arc::new(Mutex::new(PresenterLog::default())),
        }
    }

    pub fn events(&self) -> Vec<PresenterEvent> {
        self.log.lock().unwrap().events.clone()
    }

    /// Destroy calls that arrived before the matching acknowledgment.
    pub fn violations(&self) -> Vec<IndicatorId> {
        self.log.lock().unwrap().violations.clone()
    }

    pub fn shown_ids(&self) -> Vec<IndicatorId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PresenterEvent::Show(id, _) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn destroy_count(&self, id: IndicatorId) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == PresenterEvent::Destroy(id))
            .count()
    }

    /// Acknowledge every indicator held back in `AckMode::Manual`.
    pub fn ack_all(&self) {
        let pending: Vec<(IndicatorId, ShownSignal)> =
            self.log.lock().unwrap().pending.drain().collect();
        for (id, signal) in pending {
            record_ack(&self.log, id);
            signal.acknowledge();
        }
    }
}

fn record_ack(log: &Mutex<PresenterLog>, id: IndicatorId) {
    let mut log = log.lock().unwrap();
    log.acked.insert(id);
    log.events.push(PresenterEvent::Acked(id));
}

impl IndicatorPresenter for RecordingPresenter {
    fn show(&self, id: IndicatorId, message: &str, shown: ShownSignal) {
        self.log
            .lock()
            .unwrap()
            .events
            .push(PresenterEvent::Show(id, message.to_string()));
        match self.mode {
            AckMode::Immediate => {
                record_ack(&self.log, id);
                shown.acknowledge();
            }
            AckMode::After(delay) => {
                let log = self.log.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    record_ack(&log, id);
                    shown.acknowledge();
                });
            }
            AckMode::Manual => {
                self.log.lock().unwrap().pending.insert(id, shown);
            }
            AckMode::Never => drop(shown),
        }
    }

    fn destroy(&self, id: IndicatorId) {
        let mut log = self.log.lock().unwrap();
        if !log.acked.contains(&id) {
            log.violations.push(id);
        }
        log.events.push(PresenterEvent::Destroy(id));
    }
}

// -- notifier / refresher / popup --

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_notification(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct CountingRefresher {
    count: AtomicUsize,
}

impl CountingRefresher {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl ListingRefresher for CountingRefresher {
    fn refresh_listing(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingPopup {
    fail: bool,
    opened: Mutex<Vec<(String, String, String)>>,
}

impl RecordingPopup {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn opened(&self) -> Vec<(String, String, String)> {
        self.opened.lock().unwrap().clone()
    }
}

impl PopupOpener for RecordingPopup {
    fn open_popup(&self, url: &str, name: &str, features: &str) -> Result<()> {
        self.opened
            .lock()
            .unwrap()
            .push((url.to_string(), name.to_string(), features.to_string()));
        if self.fail {
            return Err(DbxError::Popup("blocked".into()));
        }
        Ok(())
    }
}
