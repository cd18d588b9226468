//! Loading indicator controller.
//!
//! `begin()` arms a cancellable show timer; `end()` either cancels that
//! timer or destroys the rendered indicator. A rendered indicator is only
//! destroyed after the presenter has acknowledged that it finished
//! appearing: `end()` awaits the acknowledgment instead of polling for it.
//!
//! ```text
//! Idle --begin--> PendingShow --timer--> Showing --end+ack--> Destroyed
//!                      |
//!                      +--end before timer--> Destroyed
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::host::{IndicatorId, IndicatorPresenter, ShownSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorState {
    Idle,
    PendingShow,
    Showing,
    Destroyed,
}

struct Slot {
    show_timer: Option<CancellationToken>,
    shown: Option<watch::Receiver<bool>>,
}

struct Shared {
    state: watch::Sender<IndicatorState>,
    slot: Mutex<Slot>,
}

impl Shared {
    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current(&self) -> IndicatorState {
        *self.state.borrow()
    }

    fn fire_show(
        &self,
        id: IndicatorId,
        message: &str,
        timer: &CancellationToken,
        presenter: &dyn IndicatorPresenter,
    ) {
        let signal = {
            let mut slot = self.lock_slot();
            // The timer may have been cancelled between waking and taking the lock.
            if timer.is_cancelled() || self.current() != IndicatorState::PendingShow {
                return;
            }
            slot.show_timer = None;
            let (signal, rx) = ShownSignal::channel();
            slot.shown = Some(rx);
            self.state.send_replace(IndicatorState::Showing);
            signal
        };
        tracing::debug!(indicator = %id, "showing indicator");
        presenter.show(id, message, signal);
    }

    fn mark_destroyed(&self, id: IndicatorId) {
        let previous = self.state.send_replace(IndicatorState::Destroyed);
        if previous != IndicatorState::Destroyed {
            tracing::debug!(indicator = %id, from = ?previous, "indicator destroyed");
        }
    }

    /// Wait for the shown acknowledgment, then destroy. Any number of
    /// callers may race here; only the first one past the lock destroys.
    async fn settle(
        &self,
        id: IndicatorId,
        presenter: &dyn IndicatorPresenter,
        mut rx: watch::Receiver<bool>,
        poll: Duration,
    ) {
        let acknowledged = {
            let wait = rx.wait_for(|shown| *shown);
            tokio::pin!(wait);
            loop {
                tokio::select! {
                    res = &mut wait => break res.is_ok(),
                    _ = tokio::time::sleep(poll) => {
                        tracing::debug!(indicator = %id, "destroy deferred until indicator is shown");
                    }
                }
            }
        };

        let mut slot = self.lock_slot();
        if self.current() == IndicatorState::Destroyed {
            return;
        }
        slot.shown = None;
        if acknowledged {
            presenter.destroy(id);
        } else {
            tracing::warn!(
                indicator = %id,
                "presenter dropped the shown acknowledgment; skipping destroy"
            );
        }
        self.mark_destroyed(id);
    }
}

/// Debounced, race-safe "working…" indicator owned by one invocation.
pub struct LoadingIndicator {
    id: IndicatorId,
    message: String,
    delay: Duration,
    poll: Duration,
    presenter: Arc<dyn IndicatorPresenter>,
    shared: Arc<Shared>,
}

impl LoadingIndicator {
    /// `delay` is how long `begin()` waits before asking the presenter to
    /// render; `poll` is how often a deferred destroy logs that it is still
    /// waiting for the shown acknowledgment.
    pub fn new(
        presenter: Arc<dyn IndicatorPresenter>,
        message: impl Into<String>,
        delay: Duration,
        poll: Duration,
    ) -> Self {
        let (state, _) = watch::channel(IndicatorState::Idle);
        Self {
            id: IndicatorId::next(),
            message: message.into(),
            delay,
            poll,
            presenter,
            shared: Arc::new(Shared {
                state,
                slot: Mutex::new(Slot {
                    show_timer: None,
                    shown: None,
                }),
            }),
        }
    }

    pub fn id(&self) -> IndicatorId {
        self.id
    }

    pub fn state(&self) -> IndicatorState {
        self.shared.current()
    }

    /// Arm the show timer. Only the first call from `Idle` has an effect.
    ///
    /// The indicator is never rendered synchronously, even with a zero
    /// delay; rendering happens on a spawned task so `end()` can still
    /// cancel it.
    pub fn begin(&self) {
        let timer = {
            let mut slot = self.shared.lock_slot();
            if self.shared.current() != IndicatorState::Idle {
                tracing::debug!(indicator = %self.id, state = ?self.shared.current(), "begin ignored");
                return;
            }
            let timer = CancellationToken::new();
            slot.show_timer = Some(timer.clone());
            self.shared.state.send_replace(IndicatorState::PendingShow);
            timer
        };

        let shared = self.shared.clone();
        let presenter = self.presenter.clone();
        let id = self.id;
        let message = self.message.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => {
                    tracing::debug!(indicator = %id, "show timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    shared.fire_show(id, &message, &timer, presenter.as_ref());
                }
            }
        });
    }

    /// Tear the indicator down. Idempotent and cancel-safe.
    ///
    /// Returns once the indicator is `Destroyed`. When it is rendered but
    /// not yet acknowledged, this waits for the acknowledgment before
    /// calling `destroy` on the presenter. Dropping the returned future
    /// leaves the indicator for a later `end()` to finish.
    pub async fn end(&self) {
        let shown = {
            let mut slot = self.shared.lock_slot();
            match self.shared.current() {
                IndicatorState::Idle | IndicatorState::PendingShow => {
                    if let Some(timer) = slot.show_timer.take() {
                        timer.cancel();
                    }
                    self.shared.mark_destroyed(self.id);
                    return;
                }
                IndicatorState::Destroyed => return,
                IndicatorState::Showing => slot.shown.clone(),
            }
        };

        match shown {
            Some(rx) => {
                self.shared
                    .settle(self.id, self.presenter.as_ref(), rx, self.poll)
                    .await
            }
            None => self.shared.mark_destroyed(self.id),
        }
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        let shown = {
            let mut slot = self.shared.lock_slot();
            if let Some(timer) = slot.show_timer.take() {
                timer.cancel();
            }
            match self.shared.current() {
                IndicatorState::Showing => slot.shown.clone(),
                _ => None,
            }
        };

        // A rendered indicator still has to come down once it is shown.
        let (Some(rx), Ok(handle)) = (shown, tokio::runtime::Handle::try_current()) else {
            return;
        };
        let shared = self.shared.clone();
        let presenter = self.presenter.clone();
        let id = self.id;
        let poll = self.poll;
        handle.spawn(async move {
            shared.settle(id, presenter.as_ref(), rx, poll).await;
        });
    }
}
