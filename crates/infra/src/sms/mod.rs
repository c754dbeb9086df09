//! SMS sender adapters
//!
//! No provider is wired in; [`LogSmsSender`] writes each message to the log
//! and keeps a bounded copy so the reminder pipeline can run end to end.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use slothold_core::{SmsMessage, SmsSender};
use slothold_domain::Result;
use tracing::info;

/// Messages kept by [`LogSmsSender::new`].
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

#[derive(Debug)]
pub struct LogSmsSender {
    outbox: Mutex<VecDeque<SmsMessage>>,
    capacity: usize,
}

impl Default for LogSmsSender {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSmsSender {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_OUTBOX_CAPACITY)
    }

    /// Keep at most `capacity` messages; the oldest is dropped first.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { outbox: Mutex::new(VecDeque::with_capacity(capacity)), capacity }
    }

    /// Most recent messages handed to this sender, oldest first.
    pub fn sent(&self) -> Vec<SmsMessage> {
        self.outbox.lock().iter().cloned().collect()
    }
}

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, message: &SmsMessage) -> Result<()> {
        info!(
            to = %message.to,
            sender_id = %message.sender_id,
            team_id = message.team_id,
            chars = message.body.chars().count(),
            "SMS queued"
        );
        let mut outbox = self.outbox.lock();
        if outbox.len() == self.capacity {
            outbox.pop_front();
        }
        outbox.push_back(message.clone());
        Ok(())
    }
}
