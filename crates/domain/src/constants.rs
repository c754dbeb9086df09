//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Reservation hold configuration
pub const DEFAULT_MINUTES_TO_BOOK: u64 = 5;
pub const HEARTBEAT_SAFETY_MARGIN_MS: u64 = 2_000;

// Reservation store defaults
pub const DEFAULT_STORE_URL: &str = "http://localhost:5555/v2";
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STORE_MAX_ATTEMPTS: usize = 3;

// Reminders
pub const DEFAULT_SMS_SENDER_ID: &str = "Cal";
pub const REMINDER_TIME_FORMAT: &str = "%A, %B %-d, %Y | %-I:%M%P";
