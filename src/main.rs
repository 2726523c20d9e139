//! Application entry point for goss-bot.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use goss_bot::bot::Bot;
use goss_bot::config::Config;
use goss_bot::logging::setup_logging;
use log::debug;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    let config = load_config()?;

    let mut bot = Bot::new(config)?;
    bot.start()?;

    run(init_start).await
}

fn load_config() -> Result<Arc<Config>> {
    let config = Arc::new(Config::load()?);
    setup_logging(&config)?;
    debug!("Configuration loaded.");
    info!("Starting goss-bot...");
    Ok(config)
}

async fn run(init_start: Instant) -> Result<()> {
    info!(
        "goss-bot is up in {:.2}s. Press Ctrl+C to stop.",
        init_start.elapsed().as_secs_f64()
    );

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, shutting down.");

    Ok(())
}
