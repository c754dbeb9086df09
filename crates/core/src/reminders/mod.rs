//! SMS reminders for booked team events.
//!
//! [`MessageComposer`] renders the body per reminder kind and
//! [`ReminderService`] fans the messages out to attendees through an
//! [`SmsSender`](ports::SmsSender).

pub mod composer;
pub mod ports;
pub mod service;

pub use composer::MessageComposer;
pub use service::{ReminderReport, ReminderService};
