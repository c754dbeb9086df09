//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MINUTES_TO_BOOK, DEFAULT_SMS_SENDER_ID, DEFAULT_STORE_MAX_ATTEMPTS,
    DEFAULT_STORE_TIMEOUT_SECS, DEFAULT_STORE_URL, HEARTBEAT_SAFETY_MARGIN_MS,
};
use crate::{Result, SlotHoldError};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub reservation: ReservationConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
}

impl Config {
    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.store.base_url.trim().is_empty() {
            return Err(SlotHoldError::Config("store.base_url must not be empty".into()));
        }
        if self.store.max_attempts == 0 {
            return Err(SlotHoldError::Config("store.max_attempts must be at least 1".into()));
        }
        self.reservation.validate()
    }
}

/// Reservation store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STORE_URL.to_string(),
            timeout_seconds: DEFAULT_STORE_TIMEOUT_SECS,
            max_attempts: DEFAULT_STORE_MAX_ATTEMPTS,
            api_key: None,
        }
    }
}

/// Reservation hold settings
///
/// `minutes_to_book` drives both the store-side TTL and the client heartbeat:
/// the heartbeat fires `safety_margin_ms` before the TTL would lapse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationConfig {
    #[serde(default = "default_minutes_to_book")]
    pub minutes_to_book: u64,
    #[serde(default = "default_safety_margin_ms")]
    pub safety_margin_ms: u64,
    /// Release the superseded reservation when the selection moves to another
    /// slot instead of leaving it to expire.
    #[serde(default)]
    pub release_on_change: bool,
}

impl ReservationConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.minutes_to_book.saturating_mul(60))
    }

    pub fn safety_margin(&self) -> Duration {
        Duration::from_millis(self.safety_margin_ms)
    }

    /// Interval between renewals, always strictly shorter than the TTL for a
    /// validated config.
    pub fn heartbeat_interval(&self) -> Duration {
        self.ttl().saturating_sub(self.safety_margin())
    }

    pub fn validate(&self) -> Result<()> {
        if self.minutes_to_book == 0 {
            return Err(SlotHoldError::Config("minutes_to_book must be positive".into()));
        }
        if self.safety_margin_ms == 0 {
            return Err(SlotHoldError::Config("safety_margin_ms must be positive".into()));
        }
        if self.safety_margin() >= self.ttl() {
            return Err(SlotHoldError::Config(format!(
                "safety margin of {}ms must be shorter than the {}s reservation TTL",
                self.safety_margin_ms,
                self.ttl().as_secs()
            )));
        }
        Ok(())
    }
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            minutes_to_book: DEFAULT_MINUTES_TO_BOOK,
            safety_margin_ms: HEARTBEAT_SAFETY_MARGIN_MS,
            release_on_change: false,
        }
    }
}

/// SMS reminder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_sender_id")]
    pub sender_id: String,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self { sender_id: default_sender_id() }
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_STORE_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_STORE_MAX_ATTEMPTS
}

fn default_minutes_to_book() -> u64 {
    DEFAULT_MINUTES_TO_BOOK
}

fn default_safety_margin_ms() -> u64 {
    HEARTBEAT_SAFETY_MARGIN_MS
}

fn default_sender_id() -> String {
    DEFAULT_SMS_SENDER_ID.to_string()
}
