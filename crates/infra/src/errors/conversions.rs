//! Conversions from external infrastructure errors into domain errors.

use reqwest::{Error as HttpError, StatusCode};
use serde_json::Error as JsonError;
use slothold_domain::SlotHoldError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SlotHoldError);

impl From<InfraError> for SlotHoldError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SlotHoldError> for InfraError {
    fn from(value: SlotHoldError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSlotHoldError {
    fn into_slothold(self) -> SlotHoldError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SlotHoldError */
/* -------------------------------------------------------------------------- */

impl IntoSlotHoldError for HttpError {
    fn into_slothold(self) -> SlotHoldError {
        if self.is_timeout() {
            return SlotHoldError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return SlotHoldError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status, "");
        }

        if self.is_decode() {
            return SlotHoldError::Store(format!("malformed response body: {self}"));
        }

        SlotHoldError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_slothold())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → SlotHoldError */
/* -------------------------------------------------------------------------- */

impl IntoSlotHoldError for JsonError {
    fn into_slothold(self) -> SlotHoldError {
        SlotHoldError::Store(format!("malformed response body: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_slothold())
    }
}

/* -------------------------------------------------------------------------- */
/* HTTP status → SlotHoldError */
/* -------------------------------------------------------------------------- */

/// Map a non-success status returned by the reservation store.
pub fn status_error(status: StatusCode, body: &str) -> SlotHoldError {
    let code = status.as_u16();
    let mut message =
        format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
    let body = body.trim();
    if !body.is_empty() {
        message.push_str(": ");
        message.push_str(body);
    }

    match code {
        404 => SlotHoldError::NotFound(message),
        429 => SlotHoldError::Network(message),
        400..=499 => SlotHoldError::InvalidInput(message),
        _ => SlotHoldError::Store(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
