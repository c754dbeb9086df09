//! Reminder fan-out

use std::sync::Arc;

use futures::future::join_all;
use slothold_domain::{Attendee, CalendarEvent, ReminderConfig, ReminderKind};
use tracing::{debug, instrument, warn};

use super::composer::MessageComposer;
use super::ports::{SmsMessage, SmsSender};

/// Per-call delivery counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderReport {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum Delivery {
    Sent,
    Skipped,
    Failed,
}

pub struct ReminderService {
    sender: Arc<dyn SmsSender>,
    sender_id: String,
}

impl ReminderService {
    pub fn new(sender: Arc<dyn SmsSender>, config: &ReminderConfig) -> Self {
        Self { sender, sender_id: config.sender_id.clone() }
    }

    /// Send the `kind` reminder to every attendee with a phone number.
    ///
    /// Only team events send SMS. Delivery failures are logged and counted.
    #[instrument(skip(self, event), fields(kind = %kind, attendees = event.attendees.len()))]
    pub async fn send_to_attendees(&self, kind: ReminderKind, event: &CalendarEvent) -> ReminderReport {
        let mut report = ReminderReport::default();

        let Some(team_id) = event.team_id() else {
            debug!("Not a team event, skipping SMS reminders");
            report.skipped = event.attendees.len();
            return report;
        };

        let composer = MessageComposer::for_kind(kind);
        let deliveries = event
            .attendees
            .iter()
            .map(|attendee| self.send_to_attendee(composer, event, attendee, team_id));

        for delivery in join_all(deliveries).await {
            match delivery {
                Delivery::Sent => report.sent += 1,
                Delivery::Skipped => report.skipped += 1,
                Delivery::Failed => report.failed += 1,
            }
        }

        debug!(sent = report.sent, skipped = report.skipped, failed = report.failed, "Reminders dispatched");
        report
    }

    async fn send_to_attendee(
        &self,
        composer: MessageComposer,
        event: &CalendarEvent,
        attendee: &Attendee,
        team_id: u32,
    ) -> Delivery {
        let Some(phone) = attendee.phone_number.as_deref().filter(|p| !p.trim().is_empty()) else {
            return Delivery::Skipped;
        };

        let message = SmsMessage {
            to: phone.to_string(),
            body: composer.compose(event, attendee),
            sender_id: self.sender_id.clone(),
            team_id,
        };

        match self.sender.send(&message).await {
            Ok(()) => Delivery::Sent,
            Err(err) => {
                warn!(error = %err, team_id, "SMS delivery failed");
                Delivery::Failed
            }
        }
    }
}
