//! Slot selection and hold commands

use std::time::Instant;

use chrono::DateTime;
use serde::Serialize;
use slothold_core::ObserverState;
use slothold_domain::{EventType, ReservationId, Result, SlotHoldError};
use tracing::info;

use crate::utils::logging::{error_label, log_command_execution};
use crate::AppContext;

/// Snapshot of the hold for display next to the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldStatus {
    pub reservation_id: Option<ReservationId>,
    pub state: String,
    pub event: Option<EventType>,
    pub selected_timeslot: Option<String>,
}

fn finish<T>(command: &str, start: Instant, result: Result<T>) -> Result<T> {
    let elapsed = start.elapsed();
    if let Err(err) = &result {
        info!(command, error_type = error_label(err), error = %err, "command rejected");
    }
    log_command_execution(command, elapsed, result.is_ok());
    result
}

/// Set (or clear) the event type being booked.
pub async fn select_event(ctx: &AppContext, event: Option<EventType>) -> Result<()> {
    let command_name = "hold::select_event";
    let start = Instant::now();

    let result = match event {
        Some(event) if event.length == 0 => {
            Err(SlotHoldError::InvalidInput("event length must be positive".into()))
        }
        event => {
            ctx.set_event(event);
            Ok(())
        }
    };

    finish(command_name, start, result)
}

/// Select a timeslot given as an RFC 3339 timestamp with offset.
pub async fn select_slot(ctx: &AppContext, timeslot: &str) -> Result<()> {
    let command_name = "hold::select_slot";
    let start = Instant::now();

    let result = DateTime::parse_from_rfc3339(timeslot.trim())
        .map(|slot| ctx.selection.select_timeslot(slot))
        .map_err(|err| SlotHoldError::InvalidInput(format!("invalid timeslot '{timeslot}': {err}")));

    finish(command_name, start, result)
}

/// Select a duration in minutes; `None` falls back to the event length.
pub async fn select_duration(ctx: &AppContext, minutes: Option<u32>) -> Result<()> {
    let command_name = "hold::select_duration";
    let start = Instant::now();

    ctx.selection.select_duration(minutes);

    finish(command_name, start, Ok(()))
}

/// Drop the selected timeslot, releasing the hold.
pub async fn clear_selection(ctx: &AppContext) -> Result<()> {
    let command_name = "hold::clear_selection";
    let start = Instant::now();

    ctx.selection.clear();

    finish(command_name, start, Ok(()))
}

pub async fn current_hold(ctx: &AppContext) -> Result<HoldStatus> {
    let command_name = "hold::current_hold";
    let start = Instant::now();

    let state = ctx.observer_state();
    let status = HoldStatus {
        reservation_id: ctx.client.held(),
        state: state.to_string(),
        event: ctx.event(),
        selected_timeslot: ctx.selection.current().selected_timeslot.map(|slot| slot.to_rfc3339()),
    };

    finish(command_name, start, Ok(status))
}

/// True while a selection is being held.
pub fn is_holding(ctx: &AppContext) -> bool {
    ctx.observer_state() == ObserverState::Active
}
