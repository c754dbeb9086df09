//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the store URL is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SLOTHOLD_STORE_URL`: Reservation store base URL (required)
//! - `SLOTHOLD_STORE_TIMEOUT`: Per-request timeout in seconds
//! - `SLOTHOLD_STORE_MAX_ATTEMPTS`: Attempts for create/extend calls
//! - `SLOTHOLD_STORE_API_KEY`: Bearer token for the store
//! - `SLOTHOLD_MINUTES_TO_BOOK`: Reservation TTL in minutes
//! - `SLOTHOLD_SAFETY_MARGIN_MS`: Heartbeat lead time before the TTL lapses
//! - `SLOTHOLD_RELEASE_ON_CHANGE`: Release superseded holds (true/false)
//! - `SLOTHOLD_SMS_SENDER_ID`: Alphanumeric SMS sender id
//!
//! Only the store URL is required; the rest fall back to defaults.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./slothold.json` or `./slothold.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use slothold_domain::{
    Config, ReminderConfig, ReservationConfig, Result, SlotHoldError, StoreConfig,
};

/// Load configuration with automatic fallback strategy
///
/// Uses environment variables when `SLOTHOLD_STORE_URL` is set. Only when it
/// is absent does the loader fall back to a config file, so a malformed
/// optional variable is reported instead of hidden behind a file lookup.
///
/// # Errors
/// Returns `SlotHoldError::Config` if:
/// - The store URL is set but another variable is invalid
/// - No config file is found and the store URL is not set
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    if std::env::var_os("SLOTHOLD_STORE_URL").is_none() {
        tracing::debug!("SLOTHOLD_STORE_URL not set, loading configuration from file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// `SLOTHOLD_STORE_URL` must be present; optional variables that are set
/// must parse.
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `SlotHoldError::Config` if the store URL is missing, a variable
/// has an invalid value, or the resulting config fails validation.
pub fn load_from_env() -> Result<Config> {
    let store_defaults = StoreConfig::default();
    let reservation_defaults = ReservationConfig::default();
    let reminder_defaults = ReminderConfig::default();

    let config = Config {
        store: StoreConfig {
            base_url: env_var("SLOTHOLD_STORE_URL")?,
            timeout_seconds: env_parse("SLOTHOLD_STORE_TIMEOUT", store_defaults.timeout_seconds)?,
            max_attempts: env_parse("SLOTHOLD_STORE_MAX_ATTEMPTS", store_defaults.max_attempts)?,
            api_key: std::env::var("SLOTHOLD_STORE_API_KEY").ok().filter(|key| !key.is_empty()),
        },
        reservation: ReservationConfig {
            minutes_to_book: env_parse(
                "SLOTHOLD_MINUTES_TO_BOOK",
                reservation_defaults.minutes_to_book,
            )?,
            safety_margin_ms: env_parse(
                "SLOTHOLD_SAFETY_MARGIN_MS",
                reservation_defaults.safety_margin_ms,
            )?,
            release_on_change: env_bool(
                "SLOTHOLD_RELEASE_ON_CHANGE",
                reservation_defaults.release_on_change,
            ),
        },
        reminders: ReminderConfig {
            sender_id: std::env::var("SLOTHOLD_SMS_SENDER_ID")
                .unwrap_or(reminder_defaults.sender_id),
        },
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `SlotHoldError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SlotHoldError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SlotHoldError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SlotHoldError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Arguments
/// * `contents` - File contents as string
/// * `path` - Path to the file (for format detection and error messages)
///
/// # Errors
/// Returns `SlotHoldError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SlotHoldError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SlotHoldError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(SlotHoldError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./slothold.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("slothold.json"),
            cwd.join("slothold.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("slothold.json"),
                exe_dir.join("slothold.toml"),
                exe_dir.join("../config.json"),
                exe_dir.join("../config.toml"),
                exe_dir.join("../../config.json"),
                exe_dir.join("../../config.toml"),
            ]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `SlotHoldError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SlotHoldError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, falling back to `default` when unset
///
/// # Errors
/// Returns `SlotHoldError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| SlotHoldError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Arguments
/// * `key` - Environment variable name
/// * `default` - Default value if variable is not set
///
/// # Returns
/// The parsed boolean value, or `default` if not set.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
