use std::time::Duration;

use slothold_domain::SlotHoldError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Log the outcome of a command execution with structured fields.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `SlotHoldError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &SlotHoldError) -> &'static str {
    match error {
        SlotHoldError::Config(_) => "config",
        SlotHoldError::Network(_) => "network",
        SlotHoldError::Store(_) => "store",
        SlotHoldError::NotFound(_) => "not_found",
        SlotHoldError::InvalidInput(_) => "invalid_input",
        SlotHoldError::Internal(_) => "internal",
    }
}

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` (default `info`); `SLOTHOLD_LOG_JSON=1`
/// switches to JSON lines. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("SLOTHOLD_LOG_JSON")
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let result = if json { builder.json().try_init() } else { builder.try_init() };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
