//! Exosky HTTP server
//!
//! Loads the exoplanet catalog, connects a star source, and serves the
//! `/api` routes.
//!
//! Usage:
//!   cargo run --bin exosky -- --catalog exoplanet_data.csv
//!   cargo run --bin exosky -- --star-source synthetic --bind 0.0.0.0:5000

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use exosky::config::ServerConfig;
use exosky::server::{serve, AppState};
use exosky::ExoplanetCatalog;

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() -> Result<()> {
    let config = ServerConfig::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = config.projection_settings()?;

    let start = Instant::now();
    let catalog = ExoplanetCatalog::from_path(&config.catalog).map_err(|e| {
        log::error!("Cannot load {}: {}", config.catalog.display(), e);
        e
    })?;
    log::info!(
        "Catalog ready: {} exoplanets in {:.2?}",
        catalog.len(),
        start.elapsed()
    );

    // Built before the runtime; the Gaia client wraps a blocking HTTP client
    let stars = config.build_star_source()?;
    let state = Arc::new(AppState::new(
        Arc::new(catalog),
        Arc::clone(&stars),
        settings,
    ));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let served = runtime.block_on(serve(config.bind, state));
    drop(runtime);

    // Last handle to the star source, released outside the runtime
    drop(stars);

    served?;
    Ok(())
}
