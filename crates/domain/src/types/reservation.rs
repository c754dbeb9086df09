//! Reservation and selection types
//!
//! A reservation is a store-side, time-boxed hold on a booking slot. The
//! client derives the slot range from the booker's current selection and the
//! event type being booked.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a bookable event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTypeId(pub u32);

impl fmt::Display for EventTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The bookable event type a slot is reserved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
    pub id: EventTypeId,
    /// Default length in minutes, used when no duration is selected.
    pub length: u32,
}

impl EventType {
    pub fn new(id: u32, length: u32) -> Self {
        Self { id: EventTypeId(id), length }
    }
}

/// Opaque reservation identifier handed out by the reservation store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReservationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ReservationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Booker selection, owned by the selection store and only observed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Chosen slot start, in whatever offset the caller works in.
    pub selected_timeslot: Option<DateTime<FixedOffset>>,
    /// Chosen duration in minutes. `None` or `0` falls back to the event
    /// length.
    pub selected_duration: Option<u32>,
}

impl Selection {
    pub fn new(timeslot: DateTime<FixedOffset>, duration: Option<u32>) -> Self {
        Self { selected_timeslot: Some(timeslot), selected_duration: duration }
    }

    /// Parse an RFC 3339 timeslot such as `2024-01-01T10:00:00Z`.
    pub fn parse(timeslot: &str, duration: Option<u32>) -> crate::Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(timeslot).map_err(|e| {
            crate::SlotHoldError::InvalidInput(format!("Invalid timeslot '{}': {}", timeslot, e))
        })?;
        Ok(Self::new(parsed, duration))
    }

    /// The selected slot start converted to UTC.
    pub fn timeslot_utc(&self) -> Option<DateTime<Utc>> {
        self.selected_timeslot.map(|slot| slot.with_timezone(&Utc))
    }

    /// Resolve the duration to book, falling back to the event default.
    pub fn resolve_duration(&self, event: &EventType) -> Option<u32> {
        self.selected_duration.filter(|minutes| *minutes > 0).or_else(|| {
            if event.length > 0 {
                Some(event.length)
            } else {
                None
            }
        })
    }
}

/// Half-open UTC range `[start, end)` covered by a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SlotRange {
    pub fn starting_at(start: DateTime<Utc>, minutes: u32) -> Self {
        Self { start, end: start + Duration::minutes(i64::from(minutes)) }
    }
}

/// Create-or-extend request sent to the reservation store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub event_type_id: EventTypeId,
    pub slot_utc_start_date: String,
    pub slot_utc_end_date: String,
    /// Identifier of the reservation being extended, if one is held.
    #[serde(rename = "uid", default, skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<ReservationId>,
}

impl ReservationRequest {
    /// Build the request for a selection, or `None` when the selection is not
    /// reservable yet (no event, no timeslot, or no resolvable duration).
    pub fn for_selection(event: Option<&EventType>, selection: &Selection) -> Option<Self> {
        let event = event?;
        let start = selection.timeslot_utc()?;
        let minutes = selection.resolve_duration(event)?;
        let range = SlotRange::starting_at(start, minutes);

        Some(Self {
            event_type_id: event.id,
            slot_utc_start_date: format_utc(range.start),
            slot_utc_end_date: format_utc(range.end),
            reservation_id: None,
        })
    }

    /// Attach the identifier of the reservation this request extends.
    pub fn extending(mut self, id: Option<ReservationId>) -> Self {
        self.reservation_id = id;
        self
    }

    /// Parsed slot range of this request.
    pub fn range(&self) -> crate::Result<SlotRange> {
        let parse = |value: &str| {
            DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| crate::SlotHoldError::InvalidInput(format!("{}: {}", value, e)))
        };
        Ok(SlotRange { start: parse(&self.slot_utc_start_date)?, end: parse(&self.slot_utc_end_date)? })
    }
}

/// ISO-8601 UTC with second precision and a `Z` suffix.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
