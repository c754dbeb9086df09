//! Shared test helpers for `slothold-core` integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use slothold_core::{ObserverConfig, ReservationStore, SelectionObserver, SlotReservationClient};
use slothold_domain::{
    EventType, ReservationConfig, ReservationId, ReservationRequest, Result, SlotHoldError,
};

/// A call observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Create(ReservationRequest),
    Delete(String),
}

/// Store double that records every call and hands out a fixed identifier.
///
/// Extending requests get their own identifier back, like the real store.
pub struct RecordingStore {
    id: String,
    calls: Mutex<Vec<StoreCall>>,
    fail_creates: AtomicBool,
}

impl RecordingStore {
    pub fn returning(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            calls: Mutex::new(Vec::new()),
            fail_creates: AtomicBool::new(false),
        })
    }

    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn creates(&self) -> Vec<ReservationRequest> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                StoreCall::Create(request) => Some(request.clone()),
                StoreCall::Delete(_) => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                StoreCall::Delete(id) => Some(id.clone()),
                StoreCall::Create(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl ReservationStore for RecordingStore {
    async fn create_or_extend(&self, request: &ReservationRequest) -> Result<ReservationId> {
        self.calls.lock().push(StoreCall::Create(request.clone()));
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(SlotHoldError::Network("connection refused".to_string()));
        }
        Ok(request.reservation_id.clone().unwrap_or_else(|| ReservationId::new(self.id.clone())))
    }

    async fn delete(&self, id: &ReservationId) -> Result<()> {
        self.calls.lock().push(StoreCall::Delete(id.as_str().to_string()));
        Ok(())
    }
}

pub fn event(id: u32, length: u32) -> EventType {
    EventType::new(id, length)
}

/// Observer over `store` with the heartbeat derived from `minutes_to_book`.
pub fn observer(
    store: Arc<RecordingStore>,
    minutes_to_book: u64,
    release_on_change: bool,
) -> SelectionObserver {
    let reservation = ReservationConfig { minutes_to_book, release_on_change, ..Default::default() };
    let client = Arc::new(SlotReservationClient::new(store));
    SelectionObserver::new(client, ObserverConfig::from_reservation(&reservation))
}

/// Let spawned tasks run to completion without moving the paused clock.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Advance the paused clock and let woken tasks run.
pub async fn advance(duration: Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}
