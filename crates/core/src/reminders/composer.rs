//! Reminder message bodies
//!
//! Every kind shares the same event context (title, organizer, attendee and
//! the event window rendered in the attendee's time zone); only the wording
//! differs per variant.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use slothold_domain::constants::REMINDER_TIME_FORMAT;
use slothold_domain::{Attendee, CalendarEvent, ReminderKind};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageComposer {
    Scheduled,
    Rescheduled,
    Cancelled,
    Requested,
}

impl MessageComposer {
    pub fn for_kind(kind: ReminderKind) -> Self {
        match kind {
            ReminderKind::Scheduled => Self::Scheduled,
            ReminderKind::Rescheduled => Self::Rescheduled,
            ReminderKind::Cancelled => Self::Cancelled,
            ReminderKind::Requested => Self::Requested,
        }
    }

    pub fn kind(self) -> ReminderKind {
        match self {
            Self::Scheduled => ReminderKind::Scheduled,
            Self::Rescheduled => ReminderKind::Rescheduled,
            Self::Cancelled => ReminderKind::Cancelled,
            Self::Requested => ReminderKind::Requested,
        }
    }

    /// Render the SMS body addressed to `attendee`.
    pub fn compose(self, event: &CalendarEvent, attendee: &Attendee) -> String {
        let when = formatted_window(event, &attendee.time_zone);
        let organizer = &event.organizer.name;
        let title = &event.title;
        let name = &attendee.name;

        match self {
            Self::Scheduled => {
                format!("Hi {name}, your event {title} with {organizer} is scheduled for {when}.")
            }
            Self::Rescheduled => {
                format!("Hi {name}, your event {title} with {organizer} has been rescheduled to {when}.")
            }
            Self::Cancelled => {
                format!("Hi {name}, your event {title} with {organizer} on {when} has been cancelled.")
            }
            Self::Requested => format!(
                "Hi {name}, your booking request for {title} with {organizer} on {when} is awaiting confirmation."
            ),
        }
    }
}

impl From<ReminderKind> for MessageComposer {
    fn from(kind: ReminderKind) -> Self {
        Self::for_kind(kind)
    }
}

/// `start - end (zone)` rendered in `time_zone`, or UTC when the zone name is
/// not recognised.
pub fn formatted_window(event: &CalendarEvent, time_zone: &str) -> String {
    let tz = time_zone.parse::<Tz>().unwrap_or_else(|_| {
        debug!(time_zone, "Unknown time zone, formatting in UTC");
        Tz::UTC
    });
    format!(
        "{} - {} ({})",
        format_in(event.start_time, tz),
        format_in(event.end_time, tz),
        tz.name()
    )
}

fn format_in(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(REMINDER_TIME_FORMAT).to_string()
}
