//! Control-plane topology discovery.

pub mod client;

pub use client::{DiscoveryClient, DiscoveryError};
