//! Commands - front end to backend bridge

mod hold;
mod reminders;

pub use hold::*;
pub use reminders::*;
