//! # SlotHold Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The slot reservation client and its heartbeat-driven selection observer
//! - The selection store the booker writes into
//! - Reminder message composition and fan-out
//! - Port interfaces (traits) for the reservation store and SMS sender
//!
//! ## Architecture Principles
//! - Only depends on `slothold-domain`
//! - No HTTP or storage code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod reminders;
pub mod reservation;

// Re-export specific items to avoid ambiguity
pub use reminders::ports::{SmsMessage, SmsSender};
pub use reminders::{MessageComposer, ReminderReport, ReminderService};
pub use reservation::client::{PendingReserve, ReserveOutcome, SlotReservationClient};
pub use reservation::observer::{
    ObserverConfig, ObserverError, ObserverState, SelectionObserver,
};
pub use reservation::ports::ReservationStore;
pub use reservation::selection::SelectionStore;
pub use reservation::stats::{ReservationStats, ReservationStatsSnapshot};
