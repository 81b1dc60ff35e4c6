use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use metro_server::config::ServerConfig;
use metro_server::metro::MetroService;
use metro_server::network::SnapshotFile;
use metro_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Load the network (fail fast if the file is unusable)
    let source = SnapshotFile::new(config.network_file.clone());
    info!(path = %source.path().display(), "loading network");
    let metro = MetroService::load(&source, config.tariff.clone(), &config.cache)?;

    let app = create_router(AppState::new(metro));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Metro route finder listening");
    info!("  GET  /health             - Health check");
    info!("  GET  /api/network        - Routing graph status");
    info!("  *    /api/lines[/:id]    - Manage lines and their stations");
    info!("  GET  /api/stations       - All stations");
    info!("  POST /api/route/find     - Find a route");

    axum::serve(listener, app).await?;
    Ok(())
}
