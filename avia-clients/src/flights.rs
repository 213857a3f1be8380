use async_trait::async_trait;
use reqwest::StatusCode;

use avia_shared::{FlightResponse, Page};

use crate::error::{check_status, ClientError};

/// Read-only access to the flights catalog service.
#[async_trait]
pub trait FlightsApi: Send + Sync {
    async fn healthcheck(&self) -> Result<(), ClientError>;

    async fn list_flights(
        &self,
        page: Option<i32>,
        size: Option<i32>,
    ) -> Result<Page<FlightResponse>, ClientError>;

    /// Returns `Ok(None)` when the catalog has no such flight.
    async fn get_flight(&self, flight_number: &str) -> Result<Option<FlightResponse>, ClientError>;
}

pub struct FlightsClient {
    base_url: String,
    http: reqwest::Client,
}

impl FlightsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, crate::DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self {
            base_url: base_url.into(),
            http: crate::http_client(timeout),
        }
    }
}

#[async_trait]
impl FlightsApi for FlightsClient {
    async fn healthcheck(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(format!("{}/manage/health", self.base_url))
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    async fn list_flights(
        &self,
        page: Option<i32>,
        size: Option<i32>,
    ) -> Result<Page<FlightResponse>, ClientError> {
        let mut query: Vec<(&str, i32)> = Vec::new();
        if let Some(page) = page {
            query.push(("page", page));
        }
        if let Some(size) = size {
            query.push(("size", size));
        }

        let response = self
            .http
            .get(format!("{}/flights", self.base_url))
            .query(&query)
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    async fn get_flight(&self, flight_number: &str) -> Result<Option<FlightResponse>, ClientError> {
        let response = self
            .http
            .get(format!("{}/flights/{}", self.base_url, flight_number))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            // Catalog misses are routine; the caller decides severity.
            tracing::debug!("flight {} is not in the catalog", flight_number);
            return Ok(None);
        }
        let response = check_status(response)?;
        Ok(Some(response.json().await?))
    }
}
