//! Broker endpoint model.

use serde::Deserialize;

/// Synthetic instance-id prefix the control plane prepends to broker hosts.
/// It is not part of the network address and must be stripped before dialing.
pub const HOST_PREFIX: &str = "Broker_";

/// A single broker network endpoint as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BrokerEndpoint {
    pub host: String,
    pub port: u16,
}

impl BrokerEndpoint {
    /// Host with the synthetic instance-id prefix stripped.
    pub fn stripped_host(&self) -> &str {
        self.host.strip_prefix(HOST_PREFIX).unwrap_or(&self.host)
    }

    /// Network address for dialing this broker.
    pub fn dial_addr(&self) -> String {
        format!("{}:{}", self.stripped_host(), self.port)
    }
}
