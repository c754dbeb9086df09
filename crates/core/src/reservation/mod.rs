//! Slot reservation holds
//!
//! A booker reserves the slot it is looking at for as long as the booking
//! form is open. [`client::SlotReservationClient`] owns the reservation
//! identifier; [`observer::SelectionObserver`] turns selection changes and a
//! heartbeat into `reserve`/`release` calls.

pub mod client;
pub mod observer;
pub mod ports;
pub mod selection;
pub mod stats;
