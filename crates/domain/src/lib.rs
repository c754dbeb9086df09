//! # SlotHold Domain
//!
//! Business domain types and models for SlotHold.
//!
//! This crate contains:
//! - Reservation and selection types (EventType, Selection, ReservationRequest)
//! - Reminder types (CalendarEvent, Attendee, ReminderKind)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other SlotHold crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
