//! Process-wide holder of the current routing table.
//!
//! Uses `ArcSwapOption` so request tasks read the table with a single
//! atomic load (no lock, no torn state) while the refresh scheduler
//! replaces it with a single atomic swap. `None` means the store has never
//! been populated.
//!
//! The refresh scheduler is the sole writer; readers at different times may
//! observe different generations, and a reader keeps the generation it
//! loaded for as long as it holds the `Arc`.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::routing::table::RoutingTable;

#[derive(Default)]
pub struct RoutingTableStore {
    current: ArcSwapOption<RoutingTable>,
}

impl RoutingTableStore {
    /// Create an unpopulated store.
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::const_empty(),
        }
    }

    /// Lock-free read of the latest fully published table.
    pub fn current(&self) -> Option<Arc<RoutingTable>> {
        self.current.load_full()
    }

    /// Atomically replace the current table. Single-writer only.
    pub fn publish(&self, table: RoutingTable) {
        self.current.store(Some(Arc::new(table)));
    }

    /// Whether any generation has ever been published.
    pub fn is_populated(&self) -> bool {
        self.current.load().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::endpoint::BrokerEndpoint;
    use crate::routing::table::{DialConfig, DiscoverySnapshot};

    fn table(keys: &[&str]) -> RoutingTable {
        let snapshot: DiscoverySnapshot = keys
            .iter()
            .map(|key| {
                (
                    key.to_string(),
                    vec![BrokerEndpoint {
                        host: "127.0.0.1".to_string(),
                        port: 8099,
                    }],
                )
            })
            .collect();
        RoutingTable::build(&snapshot, &DialConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn starts_unpopulated() {
        let store = RoutingTableStore::new();
        assert!(!store.is_populated());
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn publish_replaces_wholesale() {
        let store = RoutingTableStore::new();

        store.publish(table(&["orders"]));
        let first = store.current().unwrap();
        assert!(first.candidates("orders").is_some());

        store.publish(table(&["users"]));
        let second = store.current().unwrap();
        assert!(second.candidates("orders").is_none());
        assert!(second.candidates("users").is_some());
    }

    #[tokio::test]
    async fn readers_keep_their_generation() {
        let store = RoutingTableStore::new();
        store.publish(table(&["orders"]));

        // A request that captured generation N keeps using it even after
        // generation N+1 is published.
        let captured = store.current().unwrap();
        store.publish(table(&["users"]));

        assert!(captured.candidates("orders").is_some());
        assert!(store.current().unwrap().candidates("orders").is_none());
    }
}
