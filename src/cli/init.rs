use anyhow::{Context, Result};
use moodgraph::config::Config;

use crate::cli::Handler;
use crate::commands;

/// Load the configuration and render the requested graph
pub async fn start() -> Result<()> {
    tracing::info!("[INIT] Starting moodgraph");

    let config = Config::from_env().context("Invalid configuration")?;
    let handler = Handler::new(config)?;

    commands::graph::run(&handler).await
}
