/**
 * tsuite Gateway Entry Point
 *
 * This is the main entry point for the tsuite API gateway. It loads the
 * configuration, builds the Axum app, and serves it until SIGINT/SIGTERM.
 */

use tsuite::backend::server::{create_app, shutdown_signal, GatewayConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Gateway initialization started");

    let config = GatewayConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;

    // Create the Axum app
    let (app, app_state) = create_app(&config).await?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    // Run the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = app_state.db_pool {
        pool.close().await;
        tracing::info!("Database connections closed");
    }

    tracing::info!("Server stopped");
    Ok(())
}
