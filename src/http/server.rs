//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the query, health and fallback handlers
//! - Wire up middleware (tracing, request timeout, request ID)
//! - Resolve routing keys and dispatch to the failover or fallback proxy
//! - Graceful shutdown via the lifecycle broadcast channel

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{GatewayConfig, RoutingMode};
use crate::http::fallback::{ControllerProxy, ControllerUrlError};
use crate::http::forward::{forward_query, QUERY_PATH};
use crate::routing::resolver::resolve_key;
use crate::routing::store::RoutingTableStore;

/// Largest accepted query request body.
const MAX_QUERY_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RoutingTableStore>,
    pub controller: Arc<ControllerProxy>,
    pub mode: RoutingMode,
    pub commit: String,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and routing
    /// table store.
    pub fn new(
        config: GatewayConfig,
        store: Arc<RoutingTableStore>,
    ) -> Result<Self, ControllerUrlError> {
        let controller = Arc::new(ControllerProxy::new(&config.controller.base_url)?);

        let state = AppState {
            store,
            controller,
            mode: config.controller.routing_mode,
            commit: config.observability.commit.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route(QUERY_PATH, any(query_handler))
            .route("/health", get(health_handler))
            .fallback(passthrough_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Query handler: derive a routing key, pick the candidate list from the
/// current table generation, and forward with failover.
async fn query_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, MAX_QUERY_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to buffer query body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let key = match resolve_key(state.mode, &body) {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!(
                error = %e,
                body = %String::from_utf8_lossy(&body),
                "Rejecting unroutable query request"
            );
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    // Snapshot the current generation; the request completes against it
    // even if a refresh publishes a newer table mid-flight.
    let table = match state.store.current() {
        Some(table) => table,
        None => {
            tracing::warn!(key = %key, "Routing table not yet populated");
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
    };

    let candidates = match table.candidates(&key) {
        Some(candidates) => candidates,
        None => {
            tracing::warn!(key = %key, "No broker route for key");
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
    };

    match forward_query(candidates, &parts, &body).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!(key = %key, error = %e, "Failed to forward query to brokers");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Health handler; served by the gateway itself, never proxied.
async fn health_handler(State(state): State<AppState>) -> Response {
    Json(json!({ "commit": state.commit })).into_response()
}

/// Everything that is not a query goes straight to the controller.
async fn passthrough_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    match state.controller.forward(request).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to proxy request to controller");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
