use anyhow::{Context, Result};
use tracing::info;

use bizcard_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting Bizcard API v{}", env!("CARGO_PKG_VERSION"));

    let catalog = app::load_catalog(&config.catalog).context("Failed to load template catalog")?;
    info!(
        templates = catalog.len(),
        business_types = ?catalog.business_types(),
        "Template catalog loaded"
    );

    let addr = config
        .socket_addr()
        .with_context(|| format!("Invalid listen address {}", config.server.host))?;
    let app = app::create_app(config, catalog);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
