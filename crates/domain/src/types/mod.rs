//! Domain types and models

pub mod reminder;
pub mod reservation;

pub use reminder::{Attendee, CalendarEvent, Person, ReminderKind, Team};
pub use reservation::{
    EventType, EventTypeId, ReservationId, ReservationRequest, Selection, SlotRange,
};
