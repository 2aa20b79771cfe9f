use std::sync::Arc;

use clinica_core::{ClinicService, CoreConfig, couch_url_from_env_value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Clinica REST server
///
/// Connects to CouchDB once, then serves the REST API until Ctrl+C.
/// A failed connection does not stop the server: it keeps running and every data endpoint
/// answers with a structured 500 naming the unavailable database.
///
/// # Environment Variables
/// - `COUCHDB_URL`: CouchDB connection string with credentials
///   (default: "http://127.0.0.1:5984/")
/// - `CLINICA_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `RUST_LOG`: log filter, added to the default `info` level for the Clinica crates
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration is invalid or the address cannot be bound
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinica_run=info".parse()?)
                .add_directive("clinica_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("CLINICA_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());
    let cfg = Arc::new(CoreConfig::new(&couch_url_from_env_value(
        std::env::var("COUCHDB_URL").ok(),
    ))?);

    tracing::info!("++ Connecting to CouchDB at {}", cfg.redacted_couch_url());
    let service = ClinicService::bootstrap(cfg).await;
    if !service.is_connected() {
        tracing::warn!("-- Starting without a document store; data endpoints will answer 500");
    }

    let app = api_rest::router(service);

    tracing::info!("++ Starting Clinica REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl+C received, starting graceful shutdown");
}
