//! Periodic topology refresh.
//!
//! # Responsibilities
//! - Run discovery → build → publish cycles on a fixed interval
//! - Keep the previously published table when any step of a cycle fails
//! - Stop promptly on shutdown without leaving a cycle half-applied
//!
//! # Design Decisions
//! - The first cycle runs immediately on start, then the loop sleeps
//! - Cancellation is raced against the inter-cycle sleep, never observed
//!   mid-cycle; a cycle always completes or fails cleanly
//! - This task is the sole writer to the store

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time;

use crate::discovery::{DiscoveryClient, DiscoveryError};
use crate::routing::store::RoutingTableStore;
use crate::routing::table::{BuildError, DialConfig, RoutingTable};

/// A failed refresh cycle. Never fatal; the previous table stays published.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Background task refreshing the routing table from the control plane.
pub struct RefreshScheduler {
    discovery: DiscoveryClient,
    store: Arc<RoutingTableStore>,
    interval: Duration,
    dial: DialConfig,
}

impl RefreshScheduler {
    pub fn new(
        discovery: DiscoveryClient,
        store: Arc<RoutingTableStore>,
        interval: Duration,
        dial: DialConfig,
    ) -> Self {
        Self {
            discovery,
            store,
            interval,
            dial,
        }
    }

    /// Run refresh cycles until a shutdown signal is observed.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            endpoint = %self.discovery.endpoint(),
            interval_ms = self.interval.as_millis() as u64,
            "Topology refresh starting"
        );

        loop {
            self.refresh_once().await;

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Topology refresh received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One discovery → build → publish cycle. Failures leave the
    /// previously published table in place.
    pub async fn refresh_once(&self) {
        match self.cycle().await {
            Ok(routes) => {
                tracing::info!(routes, "Routing table updated");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh routing table, keeping previous");
            }
        }
    }

    async fn cycle(&self) -> Result<usize, RefreshError> {
        let snapshot = self.discovery.fetch().await?;
        let table = RoutingTable::build(&snapshot, &self.dial)?;
        let routes = table.len();
        self.store.publish(table);
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutingMode;
    use crate::routing::endpoint::BrokerEndpoint;
    use crate::routing::table::DiscoverySnapshot;

    fn unreachable_scheduler(store: Arc<RoutingTableStore>) -> RefreshScheduler {
        // Port 1 is never listening in the test environment.
        let discovery = DiscoveryClient::new(
            "http://127.0.0.1:1",
            RoutingMode::Tables,
            Duration::from_millis(200),
        );
        RefreshScheduler::new(discovery, store, Duration::from_secs(60), DialConfig::default())
    }

    #[tokio::test]
    async fn failed_cycle_keeps_previous_table() {
        let store = Arc::new(RoutingTableStore::new());

        let snapshot: DiscoverySnapshot = [(
            "orders".to_string(),
            vec![BrokerEndpoint {
                host: "127.0.0.1".to_string(),
                port: 8099,
            }],
        )]
        .into_iter()
        .collect();
        store.publish(RoutingTable::build(&snapshot, &DialConfig::default()).unwrap());

        let scheduler = unreachable_scheduler(store.clone());
        scheduler.refresh_once().await;

        let table = store.current().expect("table must survive a failed cycle");
        assert!(table.candidates("orders").is_some());
    }

    #[tokio::test]
    async fn failed_first_cycle_leaves_store_unpopulated() {
        let store = Arc::new(RoutingTableStore::new());
        let scheduler = unreachable_scheduler(store.clone());

        scheduler.refresh_once().await;

        assert!(!store.is_populated());
    }

    #[tokio::test]
    async fn shutdown_stops_the_loop_promptly() {
        let store = Arc::new(RoutingTableStore::new());
        let scheduler = unreachable_scheduler(store);

        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(scheduler.run(rx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(()).unwrap();

        time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler must stop within one tick")
            .unwrap();
    }
}
