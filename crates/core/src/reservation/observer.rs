//! Selection observer
//!
//! Bridges selection changes into reservation calls and keeps the held
//! reservation alive with a heartbeat.
//!
//! ```text
//!  Idle ──valid selection──▶ Active ──slot/event change──▶ Active (re-reserve)
//!   ▲                          │
//!   └──selection cleared / deactivation (release)──┘
//! ```
//!
//! The activation key is `(event type, selected timeslot)`. A changed duration
//! alone does not re-key; the next heartbeat tick picks it up because every
//! tick re-reads the current selection instead of reusing captured values.
//!
//! Lifecycle follows the scheduler conventions used across the workspace:
//! explicit `start`/`stop`, a tracked join handle, a cancellation token, and a
//! timeout on the join.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use slothold_domain::{
    impl_domain_label_conversions, EventType, EventTypeId, ReservationConfig, ReservationRequest,
    Selection, SlotHoldError,
};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::client::SlotReservationClient;

const ERROR_CHANNEL_CAPACITY: usize = 16;

/// Observer-specific errors
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("Observer already running")]
    AlreadyRunning,

    #[error("Observer not running")]
    NotRunning,

    #[error("Observer did not stop within {duration:?}")]
    Timeout { duration: Duration },

    #[error("Observer task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<ObserverError> for SlotHoldError {
    fn from(err: ObserverError) -> Self {
        match err {
            ObserverError::AlreadyRunning | ObserverError::NotRunning => {
                SlotHoldError::InvalidInput(err.to_string())
            }
            ObserverError::Timeout { .. } | ObserverError::TaskJoinFailed(_) => {
                SlotHoldError::Internal(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    /// No reservable selection; nothing is held on our behalf.
    Idle,
    /// A selection is reserved and the heartbeat is running.
    Active,
}

impl_domain_label_conversions!(ObserverState {
    Idle => "idle",
    Active => "active",
});

/// Configuration for the selection observer.
#[derive(Debug, Clone)]
pub struct ObserverConfig {
    /// Period between renewals of the held reservation.
    pub heartbeat_interval: Duration,
    /// Release the superseded reservation when the slot changes.
    pub release_on_change: bool,
    /// Timeout for awaiting the observer task on stop.
    pub join_timeout: Duration,
}

impl ObserverConfig {
    pub fn from_reservation(config: &ReservationConfig) -> Self {
        Self {
            heartbeat_interval: config.heartbeat_interval(),
            release_on_change: config.release_on_change,
            join_timeout: Duration::from_secs(5),
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self::from_reservation(&ReservationConfig::default())
    }
}

/// Watches selection state and drives a [`SlotReservationClient`].
pub struct SelectionObserver {
    client: Arc<SlotReservationClient>,
    config: ObserverConfig,
    cancellation: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
    state_tx: Arc<watch::Sender<ObserverState>>,
    errors_tx: broadcast::Sender<SlotHoldError>,
}

impl SelectionObserver {
    pub fn new(client: Arc<SlotReservationClient>, config: ObserverConfig) -> Self {
        let (state_tx, _) = watch::channel(ObserverState::Idle);
        let (errors_tx, _) = broadcast::channel(ERROR_CHANNEL_CAPACITY);
        Self {
            client,
            config,
            cancellation: CancellationToken::new(),
            task_handle: None,
            state_tx: Arc::new(state_tx),
            errors_tx,
        }
    }

    /// Activate the observer on the given event and selection sources.
    ///
    /// The current values are evaluated immediately. Dropping either sender
    /// deactivates the observer the same way [`stop`](Self::stop) does.
    #[instrument(skip_all)]
    pub fn start(
        &mut self,
        event_rx: watch::Receiver<Option<EventType>>,
        selection_rx: watch::Receiver<Selection>,
    ) -> Result<(), ObserverError> {
        if self.is_running() {
            return Err(ObserverError::AlreadyRunning);
        }

        // Fresh token so the observer can be restarted after a stop
        self.cancellation = CancellationToken::new();

        let observer_loop = ObserverLoop {
            client: Arc::clone(&self.client),
            config: self.config.clone(),
            event_rx,
            selection_rx,
            state_tx: Arc::clone(&self.state_tx),
            errors_tx: self.errors_tx.clone(),
            cancel: self.cancellation.clone(),
        };
        self.task_handle = Some(tokio::spawn(observer_loop.run()));

        info!(
            heartbeat_ms = self.config.heartbeat_interval.as_millis() as u64,
            release_on_change = self.config.release_on_change,
            "Selection observer started"
        );
        Ok(())
    }

    /// Deactivate: stop the heartbeat, release the held reservation and wait
    /// for the observer task to finish.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> Result<(), ObserverError> {
        let Some(handle) = self.task_handle.take() else {
            return Err(ObserverError::NotRunning);
        };

        self.cancellation.cancel();

        let join_timeout = self.config.join_timeout;
        match tokio::time::timeout(join_timeout, handle).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(error = %err, "Observer task panicked");
                return Err(ObserverError::TaskJoinFailed(err.to_string()));
            }
            Err(_) => {
                warn!(timeout_ms = join_timeout.as_millis() as u64, "Observer task did not stop in time");
                return Err(ObserverError::Timeout { duration: join_timeout });
            }
        }

        info!("Selection observer stopped");
        Ok(())
    }

    /// Returns true while the observer task is alive.
    pub fn is_running(&self) -> bool {
        self.task_handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn state(&self) -> ObserverState {
        *self.state_tx.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ObserverState> {
        self.state_tx.subscribe()
    }

    /// Failed reserve attempts, for optional user-facing feedback. The
    /// heartbeat retries regardless of whether anyone listens.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<SlotHoldError> {
        self.errors_tx.subscribe()
    }

    pub fn client(&self) -> &Arc<SlotReservationClient> {
        &self.client
    }
}

impl Drop for SelectionObserver {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("SelectionObserver dropped while running; cancelling");
            self.cancellation.cancel();
        }
    }
}

type ActivationKey = (EventTypeId, DateTime<Utc>);

enum Wake {
    Cancelled,
    SourceClosed,
    SelectionChanged,
    Heartbeat,
}

struct ObserverLoop {
    client: Arc<SlotReservationClient>,
    config: ObserverConfig,
    event_rx: watch::Receiver<Option<EventType>>,
    selection_rx: watch::Receiver<Selection>,
    state_tx: Arc<watch::Sender<ObserverState>>,
    errors_tx: broadcast::Sender<SlotHoldError>,
    cancel: CancellationToken,
}

impl ObserverLoop {
    async fn run(mut self) {
        let mut key: Option<ActivationKey> = None;
        let mut heartbeat: Option<Interval> = None;

        self.evaluate(&mut key, &mut heartbeat).await;

        loop {
            let wake = tokio::select! {
                biased;
                () = self.cancel.cancelled() => Wake::Cancelled,
                changed = self.event_rx.changed() => match changed {
                    Ok(()) => Wake::SelectionChanged,
                    Err(_) => Wake::SourceClosed,
                },
                changed = self.selection_rx.changed() => match changed {
                    Ok(()) => Wake::SelectionChanged,
                    Err(_) => Wake::SourceClosed,
                },
                () = next_tick(&mut heartbeat) => Wake::Heartbeat,
            };

            match wake {
                Wake::Cancelled => {
                    debug!("Observer cancelled");
                    break;
                }
                Wake::SourceClosed => {
                    debug!("Selection source closed");
                    break;
                }
                Wake::SelectionChanged => self.evaluate(&mut key, &mut heartbeat).await,
                Wake::Heartbeat => {
                    let (event, selection) = self.peek();
                    debug!("Heartbeat tick, renewing reservation");
                    self.dispatch_reserve(event, selection);
                }
            }
        }

        // No further ticks once deactivated
        drop(heartbeat);
        self.client.release().await;
        self.set_state(ObserverState::Idle);
    }

    /// Read the current sources and mark them seen.
    fn snapshot(&mut self) -> (Option<EventType>, Selection) {
        let event = *self.event_rx.borrow_and_update();
        let selection = self.selection_rx.borrow_and_update().clone();
        (event, selection)
    }

    /// Read the current sources without consuming a pending change
    /// notification.
    fn peek(&self) -> (Option<EventType>, Selection) {
        let event = *self.event_rx.borrow();
        let selection = self.selection_rx.borrow().clone();
        (event, selection)
    }

    async fn evaluate(&mut self, key: &mut Option<ActivationKey>, heartbeat: &mut Option<Interval>) {
        let (event, selection) = self.snapshot();
        let next = activation_key(event.as_ref(), &selection);
        if next == *key {
            return;
        }

        match next {
            Some((event_type_id, slot)) => {
                if key.is_some() && self.config.release_on_change {
                    self.client.release().await;
                }
                debug!(%event_type_id, %slot, "Selection changed, reserving");
                self.dispatch_reserve(event, selection);
                *heartbeat = Some(new_heartbeat(self.config.heartbeat_interval));
                self.set_state(ObserverState::Active);
            }
            None => {
                debug!("Selection cleared, releasing");
                *heartbeat = None;
                self.client.release().await;
                self.set_state(ObserverState::Idle);
            }
        }
        *key = next;
    }

    /// Fire a reserve call without waiting for it. The sequence number is
    /// taken here, before the spawn, so a release that runs before the task
    /// is first polled still fences its response. Completions may
    /// interleave; the client discards responses that were overtaken.
    fn dispatch_reserve(&self, event: Option<EventType>, selection: Selection) {
        let Some(pending) = self.client.begin_reserve(event.as_ref(), &selection) else {
            return;
        };
        let client = Arc::clone(&self.client);
        let errors = self.errors_tx.clone();
        tokio::spawn(async move {
            if let Err(err) = client.complete(pending).await {
                // No subscribers is fine
                let _ = errors.send(err);
            }
        });
    }

    fn set_state(&self, state: ObserverState) {
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                debug!(from = %current, to = %state, "Observer state transition");
                *current = state;
                true
            }
        });
    }
}

fn activation_key(event: Option<&EventType>, selection: &Selection) -> Option<ActivationKey> {
    let request = ReservationRequest::for_selection(event, selection)?;
    Some((request.event_type_id, selection.timeslot_utc()?))
}

fn new_heartbeat(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn next_tick(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
