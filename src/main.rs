mod cli;
mod commands;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(why) = cli::init::start().await {
        tracing::error!("[ERROR] {why:#}");
        return Err(why);
    }

    Ok(())
}
