//! Immutable routing table built from a discovery snapshot.
//!
//! # Responsibilities
//! - Validate raw topology entries into typed broker targets
//! - Preserve discovery order (it is the failover priority order)
//! - Own one keep-alive client per candidate slot
//!
//! # Design Decisions
//! - A table is built whole and never patched; replacement happens at the
//!   store level as a single atomic swap
//! - Clients belong to one table generation and are dropped with it

use std::collections::HashMap;
use std::time::Duration;

use axum::body::Body;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

use crate::config::TimeoutConfig;
use crate::routing::endpoint::BrokerEndpoint;

/// Raw decoded control-plane payload; exists only inside one refresh cycle.
pub type DiscoverySnapshot = HashMap<String, Vec<BrokerEndpoint>>;

/// A structurally invalid topology entry.
///
/// The caller must keep the previously published table rather than publish
/// a partial one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("routing key '{key}' has no broker candidates")]
    NoCandidates { key: String },

    #[error("routing key '{key}' has a broker entry with an empty host")]
    EmptyHost { key: String },
}

/// Dialing parameters applied to every broker client of a table generation.
#[derive(Debug, Clone, Copy)]
pub struct DialConfig {
    pub connect_timeout: Duration,
    pub keepalive: Duration,
}

impl From<&TimeoutConfig> for DialConfig {
    fn from(timeouts: &TimeoutConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(timeouts.connect_secs),
            keepalive: Duration::from_secs(timeouts.keepalive_secs),
        }
    }
}

impl Default for DialConfig {
    fn default() -> Self {
        Self::from(&TimeoutConfig::default())
    }
}

/// One dialable broker slot: the resolved address plus a dedicated
/// keep-alive client, so repeated requests to the same candidate reuse
/// warm connections across invocations.
#[derive(Debug)]
pub struct BrokerTarget {
    addr: String,
    client: Client<HttpConnector, Body>,
}

impl BrokerTarget {
    fn new(addr: String, dial: &DialConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(dial.connect_timeout));
        connector.set_keepalive(Some(dial.keepalive));
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { addr, client }
    }

    /// The `host:port` address this slot dials.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// The slot's own HTTP client.
    pub fn client(&self) -> &Client<HttpConnector, Body> {
        &self.client
    }
}

/// Ordered broker candidates for one routing key. Never empty; index 0 is
/// the highest-priority candidate.
#[derive(Debug)]
pub struct RouteCandidates {
    targets: Vec<BrokerTarget>,
}

impl RouteCandidates {
    /// Candidates in failover priority order.
    pub fn targets(&self) -> &[BrokerTarget] {
        &self.targets
    }

    /// Dial addresses in failover priority order.
    pub fn addrs(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.addr())
    }
}

/// Mapping from routing key to ordered broker candidates. Immutable once
/// built.
#[derive(Debug)]
pub struct RoutingTable {
    routes: HashMap<String, RouteCandidates>,
}

impl RoutingTable {
    /// Build a table from a discovery snapshot.
    ///
    /// Candidate order within a key follows the snapshot; an invalid entry
    /// fails the whole build so a partial table is never produced.
    pub fn build(snapshot: &DiscoverySnapshot, dial: &DialConfig) -> Result<Self, BuildError> {
        let mut routes = HashMap::with_capacity(snapshot.len());
        for (key, endpoints) in snapshot {
            if endpoints.is_empty() {
                return Err(BuildError::NoCandidates { key: key.clone() });
            }
            let mut targets = Vec::with_capacity(endpoints.len());
            for endpoint in endpoints {
                if endpoint.stripped_host().is_empty() {
                    return Err(BuildError::EmptyHost { key: key.clone() });
                }
                targets.push(BrokerTarget::new(endpoint.dial_addr(), dial));
            }
            routes.insert(key.clone(), RouteCandidates { targets });
        }
        Ok(Self { routes })
    }

    /// Candidates for a routing key; exact, case-sensitive match.
    pub fn candidates(&self, key: &str) -> Option<&RouteCandidates> {
        self.routes.get(key)
    }

    /// Number of routing keys in the table.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// All routing keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(|k| k.as_str())
    }
}
