//! Reminder commands

use std::time::Instant;

use slothold_core::ReminderReport;
use slothold_domain::{CalendarEvent, ReminderKind, Result};

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Send the `kind` SMS reminder to the attendees of a booked event.
///
/// Delivery failures are counted in the report, not returned.
pub async fn send_reminders(
    ctx: &AppContext,
    kind: ReminderKind,
    event: &CalendarEvent,
) -> Result<ReminderReport> {
    let command_name = "reminders::send_reminders";
    let start = Instant::now();

    let report = ctx.reminders.send_to_attendees(kind, event).await;

    log_command_execution(command_name, start.elapsed(), report.failed == 0);
    Ok(report)
}
