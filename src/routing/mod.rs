//! Routing-table subsystem.
//!
//! # Data Flow
//! ```text
//! refresh.rs (background task, fixed interval)
//!     → discovery client (fetch topology snapshot)
//!     → table.rs (validate & build immutable table)
//!     → store.rs (atomic publish)
//!
//! Request path:
//!     resolver.rs (derive routing key from request body)
//!     → store.rs (lock-free read)
//!     → candidate list for the key (failover order)
//! ```
//!
//! # Design Decisions
//! - The store is the only cross-task mutable state; one writer, many
//!   lock-free readers
//! - A table generation is immutable; its per-candidate clients live and
//!   die with it

pub mod endpoint;
pub mod refresh;
pub mod resolver;
pub mod store;
pub mod table;

pub use endpoint::BrokerEndpoint;
pub use refresh::RefreshScheduler;
pub use resolver::{resolve_key, ResolveError};
pub use store::RoutingTableStore;
pub use table::{DialConfig, RouteCandidates, RoutingTable};
