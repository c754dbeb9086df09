//! Reminder types
//!
//! Context shared by all reminder messages for a booked event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_label_conversions;

/// Kind of reminder sent to attendees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Scheduled,
    Rescheduled,
    Cancelled,
    Requested,
}

impl_domain_label_conversions!(ReminderKind {
    Scheduled => "scheduled",
    Rescheduled => "rescheduled",
    Cancelled => "cancelled",
    Requested => "requested",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub name: String,
    pub time_zone: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
}

/// A booked event as seen by the reminder pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer: Person,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub team: Option<Team>,
}

impl CalendarEvent {
    /// Team events are the only ones that send SMS reminders.
    pub fn team_id(&self) -> Option<u32> {
        self.team.as_ref().map(|team| team.id)
    }
}
