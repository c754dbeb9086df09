//! # SlotHold Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The HTTP reservation store and the in-memory store used for local runs
//! - The retrying HTTP client the HTTP store is built on
//! - A logging SMS sender
//! - Configuration loading from the environment and config files
//!
//! ## Architecture
//! - Implements traits defined in `slothold-core`
//! - Contains all "impure" code (network, environment, files)

pub mod config;
pub mod errors;
pub mod http;
pub mod sms;
pub mod store;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::HttpClient;
pub use sms::LogSmsSender;
pub use store::{HttpReservationStore, InMemoryReservationStore};
