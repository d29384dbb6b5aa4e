#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]
//! `ot-server` – OpenTrip trip service entrypoint
//!
//! Parses [`ServerConfig`] from the command line, sets up logging and launches the Rocket instance
//! built by [`ot_server::build`]. See binary --help for the options.

use anyhow::{
    anyhow,
    Result,
};
use clap::Parser;
use ot_server::ServerConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    ot_core::logging::setup(&config.verbosity);
    info!(
        broker = %config.broker_url,
        address = %config.address,
        port = config.port,
        "starting trip service"
    );

    let broker = config.broker_client()?;
    ot_server::build(broker, config.rocket_config())
        .launch()
        .await
        .map_err(|e| anyhow!("trip service failed: {e}"))?;

    Ok(())
}
