//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared with the server and the refresh scheduler at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields except the controller URL have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ControllerConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, RoutingMode,
    TimeoutConfig,
};
