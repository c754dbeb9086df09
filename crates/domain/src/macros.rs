//! Macro for implementing Display and FromStr for label enums
//!
//! Reminder kinds and observer states travel as lowercase labels in logs,
//! config files and CLI arguments. This macro keeps both directions of that
//! mapping in one place.
//!
//! # Example
//!
//! ```rust
//! use slothold_domain::impl_domain_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum HoldPhase {
//!     Idle,
//!     Active,
//! }
//!
//! impl_domain_label_conversions!(HoldPhase {
//!     Idle => "idle",
//!     Active => "active",
//! });
//!
//! assert_eq!(HoldPhase::Active.to_string(), "active");
//! assert_eq!("IDLE".parse::<HoldPhase>().unwrap(), HoldPhase::Idle);
//! ```

/// Implements Display and FromStr traits for label enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase labels
///
/// Parsing is case-insensitive; the error names the enum and the rejected
/// input.
#[macro_export]
macro_rules! impl_domain_label_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
