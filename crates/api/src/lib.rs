//! # SlotHold App
//!
//! Application layer - commands and main entry point.
//!
//! This crate contains:
//! - Commands the booking front end calls as the booker picks a slot
//! - Application context (dependency injection)
//! - Logging setup for the binary
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
