//! Typed client for the control plane's sync endpoint.
//!
//! # Responsibilities
//! - Build the endpoint URL from the configured domain
//! - Fetch the pending sync state (GET)
//! - Acknowledge an applied state by its timestamp (POST)

use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::config::ControlPlaneConfig;
use crate::resilience::{RequestOutcome, ResilientHttpClient};

/// Errors raised while constructing the control plane client.
#[derive(Debug, Error)]
pub enum ControlPlaneError {
    #[error("Invalid control plane endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP client construction failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Client for `GET`/`POST {scheme}://{domain}{path}`.
#[derive(Debug, Clone)]
pub struct ControlPlaneClient {
    http: reqwest::Client,
    endpoint: Url,
    retry: ResilientHttpClient,
    fetch_retries: u32,
    ack_retries: u32,
}

impl ControlPlaneClient {
    /// Create a client for the given domain.
    pub fn new(config: &ControlPlaneConfig, domain: &str) -> Result<Self, ControlPlaneError> {
        let endpoint = endpoint_url(config, domain)?;

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.request_timeout_secs));
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            endpoint,
            retry: ResilientHttpClient::new(Duration::from_millis(config.retry_delay_ms)),
            fetch_retries: config.fetch_retries,
            ack_retries: config.ack_retries,
        })
    }

    /// The sync endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Ask the control plane whether a configuration change is pending.
    pub async fn fetch_state(&self) -> RequestOutcome {
        tracing::debug!(endpoint = %self.endpoint, "Fetching sync state");
        self.retry
            .execute(
                || self.http.get(self.endpoint.clone()).send(),
                true,
                self.fetch_retries,
            )
            .await
    }

    /// Report that the state identified by `state_timestamp` was applied.
    pub async fn acknowledge(&self, state_timestamp: f64) -> RequestOutcome {
        let body = json!({ "state_timestamp": state_timestamp });
        tracing::debug!(endpoint = %self.endpoint, state_timestamp, "Sending acknowledgment");
        self.retry
            .execute(
                || self.http.post(self.endpoint.clone()).json(&body).send(),
                false,
                self.ack_retries,
            )
            .await
    }
}

/// Compose the endpoint URL from scheme, domain and path.
pub fn endpoint_url(config: &ControlPlaneConfig, domain: &str) -> Result<Url, ControlPlaneError> {
    let endpoint = format!("{}://{}{}", config.scheme, domain, config.path);
    Url::parse(&endpoint).map_err(|source| ControlPlaneError::InvalidEndpoint { endpoint, source })
}
