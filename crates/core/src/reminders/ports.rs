//! Outbound SMS port

use async_trait::async_trait;
use slothold_domain::Result;

/// A single rendered SMS ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    pub to: String,
    pub body: String,
    pub sender_id: String,
    /// Team the message is billed and rate limited against.
    pub team_id: u32,
}

/// Delivers SMS messages through a provider.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, message: &SmsMessage) -> Result<()>;
}
