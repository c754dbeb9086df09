//! In-process reservation store with expiring holds
//!
//! Holds live in a moka cache whose time-to-live matches the reservation
//! TTL, so an unrenewed hold disappears the same way it would on the server.
//! Used for local runs and end-to-end tests of the heartbeat.

use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;
use slothold_core::ReservationStore;
use slothold_domain::{ReservationConfig, ReservationId, ReservationRequest, Result};
use tracing::debug;
use uuid::Uuid;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

pub struct InMemoryReservationStore {
    holds: Cache<ReservationId, ReservationRequest>,
    ttl: Duration,
}

impl InMemoryReservationStore {
    pub fn new(config: &ReservationConfig) -> Self {
        Self::with_ttl(config.ttl())
    }

    /// Create a store whose holds expire after `ttl` (useful for testing).
    pub fn with_ttl(ttl: Duration) -> Self {
        let holds = Cache::builder().time_to_live(ttl).max_capacity(DEFAULT_MAX_CAPACITY).build();
        Self { holds, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The request a live hold was last created or extended with.
    pub fn get(&self, id: &ReservationId) -> Option<ReservationRequest> {
        self.holds.get(id)
    }

    /// Number of holds that have not expired.
    pub fn live_count(&self) -> usize {
        self.holds.iter().count()
    }
}

impl Default for InMemoryReservationStore {
    fn default() -> Self {
        Self::new(&ReservationConfig::default())
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn create_or_extend(&self, request: &ReservationRequest) -> Result<ReservationId> {
        let live = request.reservation_id.as_ref().filter(|id| self.holds.contains_key(*id));

        let id = match live {
            Some(id) => {
                debug!(reservation_id = %id, "extending hold");
                id.clone()
            }
            None => {
                let id = ReservationId::new(Uuid::new_v4().to_string());
                debug!(reservation_id = %id, "creating hold");
                id
            }
        };

        // Re-inserting restarts the time-to-live
        let mut stored = request.clone();
        stored.reservation_id = Some(id.clone());
        self.holds.insert(id.clone(), stored);
        Ok(id)
    }

    async fn delete(&self, id: &ReservationId) -> Result<()> {
        self.holds.invalidate(id);
        Ok(())
    }
}
