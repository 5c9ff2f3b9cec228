use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use query_gateway::config::load_config;
use query_gateway::routing::DialConfig;
use query_gateway::{DiscoveryClient, HttpServer, RefreshScheduler, RoutingTableStore, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("GATEWAY_CONFIG").ok())
        .unwrap_or_else(|| "gateway.toml".to_string());
    let mut config = load_config(Path::new(&config_path))?;

    if let Ok(commit) = std::env::var("COMMIT") {
        config.observability.commit = commit;
    }

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.observability.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        config = %config_path,
        controller = %config.controller.base_url,
        mode = ?config.controller.routing_mode,
        "query-gateway v0.1.0 starting"
    );

    let store = Arc::new(RoutingTableStore::new());
    let shutdown = Shutdown::new();

    // Background topology refresh
    let discovery = DiscoveryClient::new(
        &config.controller.base_url,
        config.controller.routing_mode,
        Duration::from_secs(config.timeouts.discovery_secs),
    );
    let scheduler = RefreshScheduler::new(
        discovery,
        store.clone(),
        Duration::from_millis(config.controller.refresh_interval_ms),
        DialConfig::from(&config.timeouts),
    );
    let refresh_shutdown = shutdown.subscribe();
    tokio::spawn(async move { scheduler.run(refresh_shutdown).await });

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // Create the HTTP server
    let server = HttpServer::new(config, store)?;
    let server_shutdown = shutdown.subscribe();

    // Ctrl+C triggers a coordinated shutdown of the server and the scheduler
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
