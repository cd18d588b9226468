//! One invocation of a transfer action, end to end.
//!
//! Every invocation owns an [`InvocationContext`] carrying its own indicator,
//! kind and targets, so overlapping invocations never share state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::Instrument;

use super::executor::TransferExecutor;
use super::gate::{AuthenticationGate, GateDecision};
use super::handshake::AuthorizationHandshake;
use super::indicator::LoadingIndicator;
use super::notifier::CompletionNotifier;
use super::types::{OperationKind, OperationOutcome, TargetItems};
use crate::config::DynamicConfig;
use crate::errors::DbxError;
use crate::host::{IndicatorPresenter, ListingRefresher, Notifier, PopupOpener, RepositoryBackend};
use crate::messages::MessageCatalog;

static NEXT_INVOCATION: AtomicU64 = AtomicU64::new(1);

/// The host-side collaborators a pipeline drives.
#[derive(Clone)]
pub struct Collaborators {
    pub backend: Arc<dyn RepositoryBackend>,
    pub presenter: Arc<dyn IndicatorPresenter>,
    pub notifier: Arc<dyn Notifier>,
    pub refresher: Arc<dyn ListingRefresher>,
    pub popup: Arc<dyn PopupOpener>,
}

/// State owned by exactly one invocation.
pub struct InvocationContext {
    pub id: u64,
    pub kind: OperationKind,
    pub targets: TargetItems,
    pub indicator: LoadingIndicator,
}

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum InvocationReport {
    /// The transfer ran; the outcome was notified and the listing refreshed.
    Completed { outcome: OperationOutcome },
    /// The user is not linked; the consent window was requested.
    AuthorizationRequested { auth_url: String },
    /// The status check failed; nothing was transferred.
    AuthCheckFailed { reason: String },
}

impl InvocationReport {
    /// True when the invocation ended with a failed transfer or a failed status check.
    pub fn is_failure(&self) -> bool {
        match self {
            InvocationReport::Completed { outcome } => !outcome.is_success(),
            InvocationReport::AuthorizationRequested { .. } => false,
            InvocationReport::AuthCheckFailed { .. } => true,
        }
    }

    /// The failure as an error value, for callers that propagate with `?`.
    pub fn error(&self) -> Option<DbxError> {
        match self {
            InvocationReport::Completed {
                outcome: OperationOutcome::Failure(kind),
            } => Some(DbxError::Transfer {
                kind: *kind,
                message: "the repository did not complete the batch".into(),
            }),
            InvocationReport::AuthCheckFailed { reason } => Some(DbxError::AuthCheck(reason.clone())),
            _ => None,
        }
    }
}

pub struct ActionPipeline {
    gate: AuthenticationGate,
    handshake: AuthorizationHandshake,
    executor: TransferExecutor,
    completion: CompletionNotifier,
    presenter: Arc<dyn IndicatorPresenter>,
    messages: Arc<MessageCatalog>,
    indicator_delay: Duration,
    destroy_poll: Duration,
}

impl ActionPipeline {
    pub fn new(collaborators: Collaborators, config: &DynamicConfig) -> Self {
        let messages = Arc::new(MessageCatalog::with_overrides(&config.messages));
        Self {
            gate: AuthenticationGate::new(collaborators.backend.clone()),
            handshake: AuthorizationHandshake::from_config(collaborators.popup, config),
            executor: TransferExecutor::new(collaborators.backend),
            completion: CompletionNotifier::new(
                collaborators.notifier,
                collaborators.refresher,
                messages.clone(),
            ),
            presenter: collaborators.presenter,
            messages,
            indicator_delay: config.indicator_delay(),
            destroy_poll: config.destroy_poll(),
        }
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// Create the context for a new invocation and arm its indicator.
    pub fn begin(&self, kind: OperationKind, targets: TargetItems) -> InvocationContext {
        let indicator = LoadingIndicator::new(
            self.presenter.clone(),
            self.messages.working(kind),
            self.indicator_delay,
            self.destroy_poll,
        );
        indicator.begin();
        InvocationContext {
            id: NEXT_INVOCATION.fetch_add(1, Ordering::Relaxed),
            kind,
            targets,
            indicator,
        }
    }

    /// Drive an armed context to completion. The indicator is ended on every path.
    pub async fn run(&self, ctx: &InvocationContext) -> InvocationReport {
        let span = tracing::info_span!(
            "invocation",
            id = ctx.id,
            kind = %ctx.kind,
            nodes = ctx.targets.len()
        );
        self.run_inner(ctx).instrument(span).await
    }

    pub async fn invoke(&self, kind: OperationKind, targets: TargetItems) -> InvocationReport {
        let ctx = self.begin(kind, targets);
        self.run(&ctx).await
    }

    async fn run_inner(&self, ctx: &InvocationContext) -> InvocationReport {
        let decision = match self.gate.check().await {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!("{}", e);
                ctx.indicator.end().await;
                self.completion.authentication_failed();
                return InvocationReport::AuthCheckFailed {
                    reason: e.to_string(),
                };
            }
        };

        match decision {
            GateDecision::Handshake { auth_url } => {
                ctx.indicator.end().await;
                if let Err(e) = self.handshake.open(&auth_url) {
                    tracing::warn!("could not open authorization window: {}", e);
                }
                InvocationReport::AuthorizationRequested { auth_url }
            }
            GateDecision::Proceed => {
                let outcome = self.executor.execute(ctx.kind, &ctx.targets).await;
                ctx.indicator.end().await;
                self.completion.complete(outcome);
                InvocationReport::Completed { outcome }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::indicator::IndicatorState;
    use crate::actions::{AuthStatus, TargetItem};
    use crate::host::testing::{
        AckMode, AuthReply, CountingRefresher, FakeBackend, RecordingNotifier, RecordingPopup,
        RecordingPresenter,
    };

    struct Harness {
        pipeline: ActionPipeline,
        backend: Arc<FakeBackend>,
        presenter: Arc<RecordingPresenter>,
        notifier: Arc<RecordingNotifier>,
        refresher: Arc<CountingRefresher>,
        popup: Arc<RecordingPopup>,
    }

    fn harness(backend: FakeBackend, ack: AckMode) -> Harness {
        harness_with_popup(backend, ack, RecordingPopup::default())
    }

    fn harness_with_popup(backend: FakeBackend, ack: AckMode, popup: RecordingPopup) -> Harness {
        let backend = Arc::new(backend);
        let presenter = Arc::new(RecordingPresenter::new(ack));
        let notifier = Arc::new(RecordingNotifier::default());
        let refresher = Arc::new(CountingRefresher::default());
        let popup = Arc::new(popup);
        let pipeline = ActionPipeline::new(
            Collaborators {
                backend: backend.clone(),
                presenter: presenter.clone(),
                notifier: notifier.clone(),
                refresher: refresher.clone(),
                popup: popup.clone(),
            },
            &DynamicConfig::default(),
        );
        Harness {
            pipeline,
            backend,
            presenter,
            notifier,
            refresher,
            popup,
        }
    }

    fn targets(refs: &[&str]) -> TargetItems {
        TargetItems::new(refs.iter().map(|r| TargetItem::new(*r)).collect()).unwrap()
    }

    fn slow(backend: FakeBackend) -> FakeBackend {
        backend.delays(Duration::from_millis(20), Duration::from_millis(50))
    }

    fn assert_each_shown_destroyed_once(presenter: &RecordingPresenter) {
        for id in presenter.shown_ids() {
            assert_eq!(presenter.destroy_count(id), 1, "{} destroyed once", id);
        }
        assert!(presenter.violations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn linked_single_send_succeeds() {
        let h = harness(slow(FakeBackend::linked()), AckMode::Immediate);
        let ctx = h
            .pipeline
            .begin(OperationKind::SendTo, targets(&["workspace://SpacesStore/n1"]));

        let report = h.pipeline.run(&ctx).await;

        assert_eq!(
            report,
            InvocationReport::Completed {
                outcome: OperationOutcome::Success(OperationKind::SendTo)
            }
        );
        assert!(!report.is_failure());
        assert!(report.error().is_none());
        assert_eq!(
            h.backend.transfer_calls(),
            vec![(
                OperationKind::SendTo,
                vec!["workspace://SpacesStore/n1".to_string()]
            )]
        );
        assert_eq!(h.notifier.messages(), vec!["Sent to Dropbox".to_string()]);
        assert_eq!(h.refresher.count(), 1);
        assert_eq!(ctx.indicator.state(), IndicatorState::Destroyed);
        assert_eq!(h.presenter.shown_ids(), vec![ctx.indicator.id()]);
        assert_each_shown_destroyed_once(&h.presenter);
    }

    #[tokio::test(start_paused = true)]
    async fn unlinked_user_gets_popup_and_no_transfer() {
        let h = harness(
            slow(FakeBackend::new(AuthReply::Status(AuthStatus::unlinked(
                "https://www.dropbox.com/oauth",
            )))),
            AckMode::Immediate,
        );
        let ctx = h.pipeline.begin(OperationKind::SendTo, targets(&["n1"]));

        let report = h.pipeline.run(&ctx).await;

        assert_eq!(
            report,
            InvocationReport::AuthorizationRequested {
                auth_url: "https://www.dropbox.com/oauth".into()
            }
        );
        let opened = h.popup.opened();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].0, "https://www.dropbox.com/oauth");
        assert_eq!(opened[0].1, "DBOAuthwindow");
        assert!(h.backend.transfer_calls().is_empty());
        assert!(h.notifier.messages().is_empty());
        assert_eq!(h.refresher.count(), 0);
        assert_eq!(ctx.indicator.state(), IndicatorState::Destroyed);
        assert_each_shown_destroyed_once(&h.presenter);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_check_notifies_once() {
        let h = harness(slow(FakeBackend::new(AuthReply::Fail)), AckMode::Immediate);
        let ctx = h.pipeline.begin(OperationKind::Remove, targets(&["n1", "n2"]));

        let report = h.pipeline.run(&ctx).await;

        assert!(matches!(report, InvocationReport::AuthCheckFailed { .. }));
        assert!(report.is_failure());
        assert!(matches!(report.error(), Some(DbxError::AuthCheck(_))));
        assert!(h.backend.transfer_calls().is_empty());
        assert_eq!(
            h.notifier.messages(),
            vec!["Could not verify your Dropbox account".to_string()]
        );
        assert_eq!(h.refresher.count(), 0);
        assert!(h.popup.opened().is_empty());
        assert_eq!(ctx.indicator.state(), IndicatorState::Destroyed);
        assert_each_shown_destroyed_once(&h.presenter);
    }

    #[tokio::test(start_paused = true)]
    async fn batch_failure_is_one_call_one_notification() {
        let h = harness(
            slow(FakeBackend::linked().transfer_succeeds(false)),
            AckMode::Immediate,
        );

        let report = h
            .pipeline
            .invoke(OperationKind::Remove, targets(&["n1", "n2", "n3"]))
            .await;

        assert_eq!(
            report,
            InvocationReport::Completed {
                outcome: OperationOutcome::Failure(OperationKind::Remove)
            }
        );
        assert!(matches!(
            report.error(),
            Some(DbxError::Transfer {
                kind: OperationKind::Remove,
                ..
            })
        ));
        assert_eq!(h.backend.transfer_calls().len(), 1);
        assert_eq!(h.backend.transfer_calls()[0].1.len(), 3);
        assert_eq!(
            h.notifier.messages(),
            vec!["Could not remove from Dropbox".to_string()]
        );
        assert_eq!(h.refresher.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fast_backend_never_shows_indicator_when_delayed() {
        let backend = FakeBackend::linked();
        let presenter = Arc::new(RecordingPresenter::new(AckMode::Immediate));
        let config = DynamicConfig {
            indicator_delay_ms: 500,
            ..DynamicConfig::default()
        };
        let pipeline = ActionPipeline::new(
            Collaborators {
                backend: Arc::new(backend),
                presenter: presenter.clone(),
                notifier: Arc::new(RecordingNotifier::default()),
                refresher: Arc::new(CountingRefresher::default()),
                popup: Arc::new(RecordingPopup::default()),
            },
            &config,
        );

        let ctx = pipeline.begin(OperationKind::GetFrom, targets(&["n1"]));
        pipeline.run(&ctx).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(presenter.events().is_empty());
        assert_eq!(ctx.indicator.state(), IndicatorState::Destroyed);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_waits_for_slow_acknowledgment() {
        let h = harness(
            slow(FakeBackend::linked()),
            AckMode::After(Duration::from_millis(200)),
        );

        let report = h.pipeline.invoke(OperationKind::GetFrom, targets(&["n1"])).await;

        assert!(matches!(report, InvocationReport::Completed { .. }));
        assert_eq!(h.presenter.violations(), vec![]);
        assert_each_shown_destroyed_once(&h.presenter);
        assert_eq!(h.notifier.messages(), vec!["Retrieved from Dropbox".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn popup_failure_is_not_notified() {
        let h = harness_with_popup(
            FakeBackend::new(AuthReply::Status(AuthStatus::unlinked("https://provider/auth"))),
            AckMode::Immediate,
            RecordingPopup::failing(),
        );

        let report = h.pipeline.invoke(OperationKind::SendTo, targets(&["n1"])).await;

        assert!(matches!(report, InvocationReport::AuthorizationRequested { .. }));
        assert_eq!(h.popup.opened().len(), 1);
        assert!(h.notifier.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_waits_for_transfer_to_settle() {
        let h = harness(slow(FakeBackend::linked()), AckMode::Immediate);
        let ctx = h.pipeline.begin(OperationKind::GetFrom, targets(&["n1", "n2"]));

        let midway = async {
            // Auth settles at 20ms; the transfer is in flight until 70ms.
            tokio::time::sleep(Duration::from_millis(40)).await;
            assert_eq!(h.backend.transfer_calls().len(), 1);
            assert_eq!(h.refresher.count(), 0);
            assert!(h.notifier.messages().is_empty());
        };
        let (report, ()) = tokio::join!(h.pipeline.run(&ctx), midway);

        assert!(!report.is_failure());
        assert_eq!(h.refresher.count(), 1);
        assert_eq!(h.notifier.messages(), vec!["Retrieved from Dropbox".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_invocations_keep_their_own_state() {
        let h = harness(
            slow(FakeBackend::linked().transfer_fails_for(OperationKind::Remove)),
            AckMode::After(Duration::from_millis(5)),
        );

        let send = h.pipeline.begin(OperationKind::SendTo, targets(&["node-a"]));
        let remove = h.pipeline.begin(OperationKind::Remove, targets(&["node-b"]));
        assert_ne!(send.indicator.id(), remove.indicator.id());
        assert_ne!(send.id, remove.id);

        let (send_report, remove_report) =
            tokio::join!(h.pipeline.run(&send), h.pipeline.run(&remove));

        assert_eq!(
            send_report,
            InvocationReport::Completed {
                outcome: OperationOutcome::Success(OperationKind::SendTo)
            }
        );
        assert_eq!(
            remove_report,
            InvocationReport::Completed {
                outcome: OperationOutcome::Failure(OperationKind::Remove)
            }
        );

        let mut calls = h.backend.transfer_calls();
        calls.sort_by_key(|(kind, _)| kind.as_str());
        assert_eq!(
            calls,
            vec![
                (OperationKind::Remove, vec!["node-b".to_string()]),
                (OperationKind::SendTo, vec!["node-a".to_string()]),
            ]
        );

        let mut messages = h.notifier.messages();
        messages.sort();
        assert_eq!(
            messages,
            vec![
                "Could not remove from Dropbox".to_string(),
                "Sent to Dropbox".to_string()
            ]
        );
        assert_eq!(h.refresher.count(), 2);
        assert_eq!(send.indicator.state(), IndicatorState::Destroyed);
        assert_eq!(remove.indicator.state(), IndicatorState::Destroyed);
        assert_eq!(h.presenter.shown_ids().len(), 2);
        assert_each_shown_destroyed_once(&h.presenter);
    }

    #[test]
    fn report_serializes_with_result_tag() {
        let report = InvocationReport::AuthorizationRequested {
            auth_url: "https://provider/auth".into(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["result"], "authorization_requested");
        assert_eq!(json["auth_url"], "https://provider/auth");
    }
}
