//! SQL-aware routing gateway for a distributed query engine's broker tier.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────────────┐
//!                      │                  QUERY GATEWAY                      │
//!                      │                                                     │
//!   Query Request      │  ┌─────────┐   ┌──────────┐   ┌──────────────┐     │
//!   ──────────────────▶│  │  http   │──▶│ resolver │──▶│ table store  │     │
//!   POST /query/sql    │  │ server  │   │ (key)    │   │ (atomic read)│     │
//!                      │  └─────────┘   └──────────┘   └──────┬───────┘     │
//!                      │                                      │             │
//!                      │                                      ▼             │
//!   Query Response     │                              ┌──────────────┐      │
//!   ◀──────────────────┼──────────────────────────────│   failover   │◀─────┼── Brokers
//!                      │                              │   forward    │      │
//!                      │                              └──────────────┘      │
//!                      │                                                     │
//!   Other Request      │  ┌──────────────┐                                  │
//!   ──────────────────▶│  │   fallback   │◀─────────────────────────────────┼── Controller
//!                      │  └──────────────┘                                  │
//!                      │                                                     │
//!                      │  Background:                                        │
//!                      │  ┌───────────┐   ┌───────────┐   ┌──────────────┐  │
//!                      │  │  refresh  │──▶│ discovery │──▶│ table build  │  │
//!                      │  │ scheduler │   │  client   │   │  + publish   │  │
//!                      │  └───────────┘   └───────────┘   └──────────────┘  │
//!                      └────────────────────────────────────────────────────┘
//! ```
//!
//! The routing table store is the single cross-task shared resource:
//! written atomically by the refresh scheduler, read lock-free by every
//! request task. A failed refresh cycle never regresses a populated table.

// Core subsystems
pub mod config;
pub mod discovery;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;

pub use config::GatewayConfig;
pub use discovery::DiscoveryClient;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RefreshScheduler, RoutingTableStore};
