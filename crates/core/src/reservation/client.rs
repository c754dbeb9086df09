//! Slot reservation client
//!
//! Owns the single reservation identifier held for a booker and talks to the
//! [`ReservationStore`]. Calls may overlap: a heartbeat tick and a selection
//! change can both have a `reserve` in flight. Every call takes a sequence
//! number before it suspends, and a response is applied only when it is newer
//! than the last applied response and than the last release. Anything else is
//! a stale response and is dropped.

use std::sync::Arc;

use parking_lot::Mutex;
use slothold_domain::{EventType, ReservationId, ReservationRequest, Result, Selection};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::ports::ReservationStore;
use super::stats::{ReservationStats, ReservationStatsSnapshot};

/// Result of a [`SlotReservationClient::reserve`] call that reached no error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The selection was not reservable; the store was not called.
    Skipped,
    /// The returned identifier is now the held reservation.
    Held(ReservationId),
    /// A newer call or a release overtook this one; the identifier was
    /// discarded.
    Stale(ReservationId),
}

/// A reserve call that holds a sequence number but has not reached the
/// store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReserve {
    sequence: u64,
    request: ReservationRequest,
}

impl PendingReserve {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn request(&self) -> &ReservationRequest {
        &self.request
    }
}

#[derive(Debug, Default)]
struct HoldState {
    held: Option<ReservationId>,
    /// Sequence number of the most recently issued reserve call.
    issued: u64,
    /// Sequence number of the most recently applied response.
    applied: u64,
    /// Responses numbered at or below the fence arrived after a release.
    fence: u64,
}

/// Maintains one reservation matching the booker's current selection.
pub struct SlotReservationClient {
    store: Arc<dyn ReservationStore>,
    state: Mutex<HoldState>,
    held_tx: watch::Sender<Option<ReservationId>>,
    stats: ReservationStats,
}

impl SlotReservationClient {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        let (held_tx, _) = watch::channel(None);
        Self { store, state: Mutex::new(HoldState::default()), held_tx, stats: ReservationStats::new() }
    }

    /// Reserve (or extend) the slot described by `selection`.
    ///
    /// An incomplete selection is a normal transient state and yields
    /// [`ReserveOutcome::Skipped`]. Store failures are returned to the caller
    /// and leave the held identifier untouched.
    pub async fn reserve(
        &self,
        event: Option<&EventType>,
        selection: &Selection,
    ) -> Result<ReserveOutcome> {
        match self.begin_reserve(event, selection) {
            Some(pending) => self.complete(pending).await,
            None => Ok(ReserveOutcome::Skipped),
        }
    }

    /// Take a sequence number for a reserve call without suspending.
    ///
    /// A release issued after this returns fences the call off, even if
    /// [`complete`](Self::complete) has not started yet. Returns `None` when
    /// the selection is not reservable.
    pub fn begin_reserve(
        &self,
        event: Option<&EventType>,
        selection: &Selection,
    ) -> Option<PendingReserve> {
        let Some(request) = ReservationRequest::for_selection(event, selection) else {
            debug!("selection not reservable yet, skipping");
            return None;
        };

        let pending = {
            let mut state = self.state.lock();
            state.issued += 1;
            PendingReserve {
                sequence: state.issued,
                request: request.extending(state.held.clone()),
            }
        };
        self.stats.record_issued();
        Some(pending)
    }

    /// Send a reserve call taken with [`begin_reserve`](Self::begin_reserve)
    /// and apply its response.
    #[instrument(skip_all, fields(sequence = pending.sequence, event_type_id = pending.request.event_type_id.0))]
    pub async fn complete(&self, pending: PendingReserve) -> Result<ReserveOutcome> {
        let PendingReserve { sequence, request } = pending;
        match self.store.create_or_extend(&request).await {
            Ok(id) => Ok(self.apply(sequence, id, &request)),
            Err(err) => {
                self.stats.record_failed();
                warn!(sequence, error = %err, "reservation request failed; will retry on next heartbeat");
                Err(err)
            }
        }
    }

    fn apply(&self, sequence: u64, id: ReservationId, request: &ReservationRequest) -> ReserveOutcome {
        let mut state = self.state.lock();
        if sequence <= state.fence || sequence <= state.applied {
            drop(state);
            self.stats.record_stale();
            debug!(sequence, reservation_id = %id, "discarding stale reservation response");
            return ReserveOutcome::Stale(id);
        }

        state.applied = sequence;
        state.held = Some(id.clone());
        self.held_tx.send_replace(Some(id.clone()));
        drop(state);

        self.stats.record_succeeded();
        info!(
            sequence,
            reservation_id = %id,
            start = %request.slot_utc_start_date,
            end = %request.slot_utc_end_date,
            "slot reserved"
        );
        ReserveOutcome::Held(id)
    }

    /// Release the held reservation, if any.
    ///
    /// The identifier is cleared locally before the store is asked to delete
    /// it, so a failed deletion never leaves it held; the store's expiry
    /// covers that case. Responses of reserve calls still in flight are
    /// fenced off. Returns the released identifier.
    #[instrument(skip(self))]
    pub async fn release(&self) -> Option<ReservationId> {
        let released = {
            let mut state = self.state.lock();
            state.fence = state.issued;
            let released = state.held.take();
            if released.is_some() {
                self.held_tx.send_replace(None);
            }
            released
        };

        let Some(id) = released else {
            debug!("no reservation held, nothing to release");
            return None;
        };

        self.stats.record_released();
        match self.store.delete(&id).await {
            Ok(()) => info!(reservation_id = %id, "reservation released"),
            Err(err) => {
                warn!(reservation_id = %id, error = %err, "failed to delete reservation; leaving it to expire")
            }
        }
        Some(id)
    }

    /// Currently held reservation identifier.
    pub fn held(&self) -> Option<ReservationId> {
        self.state.lock().held.clone()
    }

    /// Watch the held identifier, e.g. to display it next to the form.
    pub fn subscribe(&self) -> watch::Receiver<Option<ReservationId>> {
        self.held_tx.subscribe()
    }

    pub fn stats(&self) -> ReservationStatsSnapshot {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use slothold_domain::SlotHoldError;
    use tokio::sync::oneshot;

    use super::*;

    type Gate = oneshot::Receiver<Result<ReservationId>>;

    /// Store whose responses are scripted: either gated on a oneshot the test
    /// resolves, or answered immediately with sequential ids.
    #[derive(Default)]
    struct ScriptedStore {
        gates: Mutex<VecDeque<Gate>>,
        requests: Mutex<Vec<ReservationRequest>>,
        deletes: Mutex<Vec<ReservationId>>,
        fail_deletes: bool,
    }

    impl ScriptedStore {
        fn gate(&self) -> oneshot::Sender<Result<ReservationId>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().push_back(rx);
            tx
        }

        fn requests(&self) -> Vec<ReservationRequest> {
            self.requests.lock().clone()
        }

        fn deletes(&self) -> Vec<ReservationId> {
            self.deletes.lock().clone()
        }
    }

    #[async_trait]
    impl ReservationStore for ScriptedStore {
        async fn create_or_extend(&self, request: &ReservationRequest) -> Result<ReservationId> {
            let gate = {
                let mut requests = self.requests.lock();
                requests.push(request.clone());
                let next = requests.len();
                match self.gates.lock().pop_front() {
                    Some(gate) => gate,
                    None => return Ok(ReservationId::new(format!("rsv-{next}"))),
                }
            };
            gate.await.unwrap_or_else(|_| Err(SlotHoldError::Internal("gate dropped".into())))
        }

        async fn delete(&self, id: &ReservationId) -> Result<()> {
            self.deletes.lock().push(id.clone());
            if self.fail_deletes {
                Err(SlotHoldError::Network("connection reset".into()))
            } else {
                Ok(())
            }
        }
    }

    fn event() -> EventType {
        EventType::new(5, 30)
    }

    fn selection(slot: &str) -> Selection {
        Selection::parse(slot, Some(30)).unwrap()
    }

    #[tokio::test]
    async fn reserve_issues_exact_request_and_holds_id() {
        let store = Arc::new(ScriptedStore::default());
        let client = SlotReservationClient::new(store.clone());

        let outcome = client.reserve(Some(&event()), &selection("2024-01-01T10:00:00Z")).await;

        assert_eq!(outcome.unwrap(), ReserveOutcome::Held(ReservationId::from("rsv-1")));
        assert_eq!(client.held(), Some(ReservationId::from("rsv-1")));
        let requests = store.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].event_type_id.0, 5);
        assert_eq!(requests[0].slot_utc_start_date, "2024-01-01T10:00:00Z");
        assert_eq!(requests[0].slot_utc_end_date, "2024-01-01T10:30:00Z");
        assert_eq!(requests[0].reservation_id, None);
    }

    #[tokio::test]
    async fn reserve_without_timeslot_is_a_noop() {
        let store = Arc::new(ScriptedStore::default());
        let client = SlotReservationClient::new(store.clone());

        let outcome = client.reserve(Some(&event()), &Selection::default()).await.unwrap();

        assert_eq!(outcome, ReserveOutcome::Skipped);
        assert!(store.requests().is_empty());
        assert_eq!(client.stats().issued, 0);
    }

    #[tokio::test]
    async fn renewal_carries_held_id() {
        let store = Arc::new(ScriptedStore::default());
        let client = SlotReservationClient::new(store.clone());
        let slot = selection("2024-01-01T10:00:00Z");

        client.reserve(Some(&event()), &slot).await.unwrap();
        client.reserve(Some(&event()), &slot).await.unwrap();

        let requests = store.requests();
        assert_eq!(requests[1].reservation_id, Some(ReservationId::from("rsv-1")));
        assert_eq!(client.held(), Some(ReservationId::from("rsv-2")));
    }

    #[tokio::test]
    async fn newer_response_wins_when_it_lands_first() {
        let store = Arc::new(ScriptedStore::default());
        let client = SlotReservationClient::new(store.clone());
        let first_gate = store.gate();
        let second_gate = store.gate();
        let event = event();
        let slot_a = selection("2024-01-01T10:00:00Z");
        let slot_b = selection("2024-01-01T11:00:00Z");

        let driver = async {
            tokio::task::yield_now().await;
            second_gate.send(Ok("second".into())).ok();
            tokio::task::yield_now().await;
            first_gate.send(Ok("first".into())).ok();
        };
        let (first, second, ()) = tokio::join!(
            client.reserve(Some(&event), &slot_a),
            client.reserve(Some(&event), &slot_b),
            driver
        );

        assert_eq!(second.unwrap(), ReserveOutcome::Held("second".into()));
        assert_eq!(first.unwrap(), ReserveOutcome::Stale("first".into()));
        assert_eq!(client.held(), Some("second".into()));
        assert_eq!(client.stats().stale, 1);
    }

    #[tokio::test]
    async fn newer_response_wins_when_it_lands_last() {
        let store = Arc::new(ScriptedStore::default());
        let client = SlotReservationClient::new(store.clone());
        let first_gate = store.gate();
        let second_gate = store.gate();
        let event = event();
        let slot_a = selection("2024-01-01T10:00:00Z");
        let slot_b = selection("2024-01-01T11:00:00Z");

        let driver = async {
            tokio::task::yield_now().await;
            first_gate.send(Ok("first".into())).ok();
            tokio::task::yield_now().await;
            second_gate.send(Ok("second".into())).ok();
        };
        let (first, second, ()) = tokio::join!(
            client.reserve(Some(&event), &slot_a),
            client.reserve(Some(&event), &slot_b),
            driver
        );

        assert_eq!(first.unwrap(), ReserveOutcome::Held("first".into()));
        assert_eq!(second.unwrap(), ReserveOutcome::Held("second".into()));
        assert_eq!(client.held(), Some("second".into()));
    }

    #[tokio::test]
    async fn response_after_release_is_discarded() {
        let store = Arc::new(ScriptedStore::default());
        let client = SlotReservationClient::new(store.clone());
        let gate = store.gate();
        let event = event();
        let slot = selection("2024-01-01T10:00:00Z");

        let driver = async {
            tokio::task::yield_now().await;
            assert_eq!(client.release().await, None);
            gate.send(Ok("late".into())).ok();
        };
        let (outcome, ()) = tokio::join!(client.reserve(Some(&event), &slot), driver);

        assert_eq!(outcome.unwrap(), ReserveOutcome::Stale("late".into()));
        assert_eq!(client.held(), None);
        assert!(store.deletes().is_empty());
    }

    #[tokio::test]
    async fn release_before_send_fences_pending_reserve() {
        let store = Arc::new(ScriptedStore::default());
        let client = SlotReservationClient::new(store.clone());
        let pending =
            client.begin_reserve(Some(&event()), &selection("2024-01-01T10:00:00Z")).unwrap();

        assert_eq!(client.release().await, None);
        let outcome = client.complete(pending).await.unwrap();

        assert_eq!(outcome, ReserveOutcome::Stale("rsv-1".into()));
        assert_eq!(client.held(), None);
        assert_eq!(store.requests().len(), 1);
    }

    #[test]
    fn begin_reserve_skips_unreservable_selection() {
        let client = SlotReservationClient::new(Arc::new(ScriptedStore::default()));

        assert!(client.begin_reserve(None, &selection("2024-01-01T10:00:00Z")).is_none());
        assert_eq!(client.stats().issued, 0);
    }

    #[tokio::test]
    async fn failed_reserve_keeps_previous_hold() {
        let store = Arc::new(ScriptedStore::default());
        let client = SlotReservationClient::new(store.clone());
        let slot = selection("2024-01-01T10:00:00Z");
        client.reserve(Some(&event()), &slot).await.unwrap();

        let gate = store.gate();
        gate.send(Err(SlotHoldError::Store("503 Service Unavailable".into()))).ok();
        let err = client.reserve(Some(&event()), &slot).await.unwrap_err();

        assert!(matches!(err, SlotHoldError::Store(_)));
        assert_eq!(client.held(), Some("rsv-1".into()));
        assert_eq!(client.stats().failed, 1);
    }

    #[tokio::test]
    async fn release_deletes_held_id_once() {
        let store = Arc::new(ScriptedStore::default());
        let client = SlotReservationClient::new(store.clone());
        client.reserve(Some(&event()), &selection("2024-01-01T10:00:00Z")).await.unwrap();

        assert_eq!(client.release().await, Some("rsv-1".into()));
        assert_eq!(client.release().await, None);

        assert_eq!(store.deletes(), vec![ReservationId::from("rsv-1")]);
        assert_eq!(client.held(), None);
    }

    #[tokio::test]
    async fn failed_delete_still_clears_hold() {
        let store = Arc::new(ScriptedStore { fail_deletes: true, ..Default::default() });
        let client = SlotReservationClient::new(store.clone());
        client.reserve(Some(&event()), &selection("2024-01-01T10:00:00Z")).await.unwrap();

        assert_eq!(client.release().await, Some("rsv-1".into()));

        assert_eq!(client.held(), None);
        assert_eq!(store.deletes().len(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_held_id_changes() {
        let store = Arc::new(ScriptedStore::default());
        let client = SlotReservationClient::new(store);
        let mut held = client.subscribe();

        client.reserve(Some(&event()), &selection("2024-01-01T10:00:00Z")).await.unwrap();
        assert!(held.has_changed().unwrap());
        assert_eq!(*held.borrow_and_update(), Some("rsv-1".into()));

        client.release().await;
        assert_eq!(*held.borrow_and_update(), None);
    }
}
