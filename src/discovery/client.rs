//! Control-plane topology fetch.
//!
//! # Responsibilities
//! - Issue one bounded-timeout GET to the discovery endpoint
//! - Decode the topology payload into a `DiscoverySnapshot`
//!
//! # Design Decisions
//! - No internal retry; the refresh scheduler owns the retry cadence
//!   through its fixed interval
//! - Never touches the routing table store

use std::time::Duration;

use thiserror::Error;

use crate::config::RoutingMode;
use crate::routing::table::DiscoverySnapshot;

/// A failed discovery cycle. Recovered by the scheduler: logged, cycle
/// skipped, previous table retained.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("discovery request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("discovery endpoint returned an error status: {0}")]
    Status(#[source] reqwest::Error),

    #[error("failed to decode discovery payload: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Fetches the current broker topology from the control plane.
pub struct DiscoveryClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl DiscoveryClient {
    pub fn new(base_url: &str, mode: RoutingMode, timeout: Duration) -> Self {
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), mode.discovery_path());
        Self {
            http: reqwest::Client::new(),
            endpoint,
            timeout,
        }
    }

    /// The full discovery endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch and decode one topology snapshot.
    pub async fn fetch(&self) -> Result<DiscoverySnapshot, DiscoveryError> {
        let response = self
            .http
            .get(&self.endpoint)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(DiscoveryError::Transport)?;
        let response = response.error_for_status().map_err(DiscoveryError::Status)?;
        response.json().await.map_err(DiscoveryError::Decode)
    }
}
