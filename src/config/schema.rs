//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the query gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Control-plane connection and topology refresh settings.
    pub controller: ControllerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Control-plane configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Base URL of the controller (e.g., "http://controller:9000").
    /// Required; the gateway refuses to start without it.
    pub base_url: String,

    /// Which key the routing table is built around.
    pub routing_mode: RoutingMode,

    /// Delay between topology refresh cycles in milliseconds.
    pub refresh_interval_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            routing_mode: RoutingMode::Tables,
            refresh_interval_ms: 60_000,
        }
    }
}

/// Routing key strategy for query requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Key queries by the table name extracted from the SQL text.
    #[default]
    Tables,
    /// Key queries by the `tenant` field of the request body.
    Tenants,
}

impl RoutingMode {
    /// Sub-path of the controller discovery endpoint for this mode.
    pub fn discovery_path(&self) -> &'static str {
        match self {
            RoutingMode::Tables => "/v2/brokers/tables",
            RoutingMode::Tenants => "/v2/brokers/tenants",
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Broker connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Controller discovery request timeout in seconds.
    pub discovery_secs: u64,

    /// TCP keep-alive interval for broker connections in seconds.
    pub keepalive_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
            discovery_secs: 10,
            keepalive_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Build commit identifier reported by the health endpoint.
    pub commit: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            commit: String::new(),
        }
    }
}
