//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use slothold_infra::config;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "store": {
            "base_url": "https://api.example.com/v2",
            "timeout_seconds": 4,
            "max_attempts": 2,
            "api_key": "json-secret"
        },
        "reservation": {
            "minutes_to_book": 15,
            "safety_margin_ms": 2000,
            "release_on_change": false
        },
        "reminders": {
            "sender_id": "Cal"
        }
    }"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();

    let config = result.expect("Failed to load config from JSON file");

    assert_eq!(config.store.base_url, "https://api.example.com/v2");
    assert_eq!(config.store.timeout().as_secs(), 4);
    assert_eq!(config.store.max_attempts, 2);
    assert_eq!(config.store.api_key.as_deref(), Some("json-secret"));

    // 15 minute holds renew 2s before they lapse
    assert_eq!(config.reservation.heartbeat_interval().as_millis(), 898_000);
    assert_eq!(config.reminders.sender_id, "Cal");
}

#[test]
fn test_load_config_from_minimal_toml_file() {
    let toml_content = r#"
[store]
base_url = "http://localhost:5555/v2"
"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();

    let config = result.expect("Failed to load config from TOML file");
    assert_eq!(config.reservation.minutes_to_book, 5);
    assert_eq!(config.reservation.heartbeat_interval().as_millis(), 298_000);
    assert!(!config.reservation.release_on_change);
}

#[test]
fn test_api_key_is_never_serialized() {
    let toml_content = r#"
[store]
base_url = "http://localhost:5555/v2"
api_key = "do-not-leak"
"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();

    let config = result.expect("Failed to load config from TOML file");
    let json = serde_json::to_string(&config).expect("config serializes");
    assert!(!json.contains("do-not-leak"));
}
