//! Port interfaces for the reservation store
//!
//! The store is an external, independently synchronised resource shared by
//! many clients. Its own TTL expiry is the cleanup channel of last resort.

use async_trait::async_trait;
use slothold_domain::{ReservationId, ReservationRequest, Result};

/// Trait for the store that persists slot reservations
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Create a reservation for the requested range, or extend the one named
    /// by `request.reservation_id`. Repeating a call yields a live
    /// reservation but not necessarily the same identifier.
    async fn create_or_extend(&self, request: &ReservationRequest) -> Result<ReservationId>;

    /// Delete a reservation. Unknown or expired identifiers are not an error.
    async fn delete(&self, id: &ReservationId) -> Result<()>;
}
