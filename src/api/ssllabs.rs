//! SSL Labs API v3 client.
//!
//! Issues a single `GET /analyze` per call. Retrying is left to the
//! extractor.

use super::ScanApi;
use crate::config::ApiSettings;
use crate::error::ApiError;
use crate::types::Hostname;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the SSL Labs assessment API.
pub struct SslLabsClient {
    client: Client,
    base_url: String,
}

impl SslLabsClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://api.ssllabs.com/api/v3`
    /// * `timeout` - Bound on each request, connect included
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sslscan-etl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from API settings.
    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        Self::new(settings.base_url.clone(), settings.timeout)
    }

    /// Full URL of the analyze endpoint.
    pub fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url)
    }
}

#[async_trait]
impl ScanApi for SslLabsClient {
    async fn analyze(&self, host: &Hostname) -> Result<Value, ApiError> {
        let url = self.analyze_url();
        debug!(%url, host = %host, "requesting assessment");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("host", host.as_str()),
                ("fromCache", "on"),
                ("all", "done"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
