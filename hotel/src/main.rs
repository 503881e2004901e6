//! Interactive hotel reservation system.
//!
//! Runs the text menu on stdin/stdout. Logs go to stderr.

use anyhow::Context;
use hotel::config::DEFAULT_LOG_LEVEL;
use hotel::{Config, Hotel, Menu};
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.runtime.log_level)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!(
        rooms = config.inventory.rooms.len(),
        request_timeout_secs = config.runtime.request_timeout_secs,
        "Configuration loaded"
    );

    let hotel = Hotel::from_config(&config)
        .await
        .context("Failed to register seed rooms")?;

    let mut menu = Menu::new(hotel.clone(), io::stdin().lock(), io::stdout().lock());
    menu.run().await.context("Menu I/O failed")?;

    if let Err(error) = hotel.shutdown(config.shutdown_timeout()).await {
        warn!(%error, "Shutdown did not complete cleanly");
    }

    Ok(())
}
