//! Reservation store backed by the booking API
//!
//! ```text
//! POST   {base}/slots/reserve                 { eventTypeId, slotUtcStartDate, slotUtcEndDate, uid? }
//!        -> { "status": "success", "data": "<uid>" }
//! DELETE {base}/slots/selected-slot?uid=<uid> -> 2xx, or 404 when already gone
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use slothold_core::ReservationStore;
use slothold_domain::{ReservationId, ReservationRequest, Result, SlotHoldError, StoreConfig};
use tracing::{debug, instrument};

use crate::errors::{status_error, InfraError};
use crate::http::HttpClient;

const RESERVE_PATH: &str = "/slots/reserve";
const RELEASE_PATH: &str = "/slots/selected-slot";

#[derive(Debug, Deserialize)]
struct ReserveResponse {
    status: String,
    data: Option<String>,
}

/// [`ReservationStore`] talking to the booking API over HTTP.
pub struct HttpReservationStore {
    http: HttpClient,
    base_url: String,
}

impl HttpReservationStore {
    /// Build the store from connection settings.
    ///
    /// # Errors
    /// Returns `SlotHoldError::Config` when the API key is not a valid header
    /// value, or the underlying client cannot be constructed.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let mut builder =
            HttpClient::builder().timeout(config.timeout()).max_attempts(config.max_attempts);

        if let Some(api_key) = config.api_key.as_deref().filter(|key| !key.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|_| SlotHoldError::Config("store api key is not a valid header".into()))?;
            value.set_sensitive(true);
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        Ok(Self::with_client(builder.build()?, &config.base_url))
    }

    pub fn with_client(http: HttpClient, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ReservationStore for HttpReservationStore {
    #[instrument(skip(self, request), fields(event_type_id = %request.event_type_id, extending = request.reservation_id.is_some()))]
    async fn create_or_extend(&self, request: &ReservationRequest) -> Result<ReservationId> {
        let builder = self.http.request(Method::POST, self.url(RESERVE_PATH)).json(request);
        let response = self.http.send(builder).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let bytes = response.bytes().await.map_err(|err| SlotHoldError::from(InfraError::from(err)))?;
        let body: ReserveResponse =
            serde_json::from_slice(&bytes).map_err(|err| SlotHoldError::from(InfraError::from(err)))?;

        if body.status == "success" {
            if let Some(uid) = body.data.filter(|uid| !uid.is_empty()) {
                debug!(reservation_id = %uid, "store accepted reservation");
                return Ok(ReservationId::new(uid));
            }
        }

        Err(SlotHoldError::Store(format!(
            "reserve returned status '{}' without a reservation id",
            body.status
        )))
    }

    #[instrument(skip(self), fields(reservation_id = %id))]
    async fn delete(&self, id: &ReservationId) -> Result<()> {
        let builder =
            self.http.request(Method::DELETE, self.url(RELEASE_PATH)).query(&[("uid", id.as_str())]);
        let response = self.http.send_once(builder).await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                debug!("reservation already gone");
                Ok(())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(status_error(status, &body))
            }
        }
    }
}
