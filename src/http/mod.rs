//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → /query/sql: resolver derives key → forward.rs (failover dialing)
//!     → any other path: fallback.rs (controller passthrough)
//!     → response streamed back to the client
//! ```

pub mod fallback;
pub mod forward;
pub mod server;

pub use fallback::ControllerProxy;
pub use forward::QUERY_PATH;
pub use server::{AppState, HttpServer};
