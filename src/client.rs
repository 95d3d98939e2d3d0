//! HTTP backend client for the record-store API.
//!
//! [`HttpBackend`] implements [`Backend`] over `reqwest`: one GET per call,
//! HTTP Basic authentication, a fixed request timeout, and `where[...]` /
//! `per_page` filters sent as the query string.
//!
//! # Outcome mapping
//!
//! | Response | Outcome |
//! |----------|---------|
//! | 200 with records | `Records` |
//! | 200 with no records | `Empty` |
//! | 200 with an undecodable body | `TransportFailure` |
//! | 403 | `AuthDenied` |
//! | any other status | `UnexpectedStatus(code)` |
//! | timeout / connection error | `TransportFailure` |
//!
//! There are no retries here; the people retry lives in the orchestrator.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use shepherd_core::backend::Backend;
use shepherd_core::models::{parse_payload, BackendOutcome, Filters};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{BackendConfig, Credentials};

/// Record-store client holding an immutable credential pair and base URL.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig, credentials: Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("shepherd/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn call(&self, endpoint: &str, filters: &Filters) -> BackendOutcome {
        let url = self.url_for(endpoint);
        debug!(%url, filters = ?filters.pairs(), "backend request");

        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.credentials.app_id, Some(&self.credentials.secret))
            .query(filters.pairs())
            .send()
            .await;

        let response = match resp {
            Ok(r) => r,
            Err(e) => {
                warn!(%url, error = %e, "backend request failed");
                let detail = if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.without_url().to_string()
                };
                return BackendOutcome::TransportFailure(detail);
            }
        };

        match response.status() {
            StatusCode::OK => {}
            StatusCode::FORBIDDEN => {
                warn!(%url, "backend denied access (403)");
                return BackendOutcome::AuthDenied;
            }
            status => {
                warn!(%url, %status, "unexpected backend status");
                return BackendOutcome::UnexpectedStatus(status.as_u16());
            }
        }

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                warn!(%url, error = %e, "failed to read backend response body");
                return BackendOutcome::TransportFailure(e.without_url().to_string());
            }
        };

        match parse_payload(&body) {
            Ok(records) => {
                debug!(%url, count = records.len(), "backend response decoded");
                BackendOutcome::from_records(records)
            }
            Err(e) => {
                warn!(%url, error = %e, "malformed backend payload");
                BackendOutcome::TransportFailure(format!("malformed payload: {}", e))
            }
        }
    }
}
