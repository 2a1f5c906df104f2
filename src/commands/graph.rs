use anyhow::{Context, Result};
use moodgraph::utils::mood::load_records;

use crate::cli::Handler;

/// Render the configured graph and write it to the configured output path.
pub async fn run(handler: &Handler) -> Result<()> {
    let config = &handler.config;

    let records = load_records(&config.records_path)
        .await
        .with_context(|| format!("Could not read {}", config.records_path.display()))?;

    let date_range = handler.graph_service.resolve_range(config.range);
    tracing::info!(
        "[GRAPH] Rendering {} graph for {} ({} ..= {})",
        config.mode,
        config.range,
        date_range.start,
        date_range.end
    );

    let bytes = handler
        .graph_service
        .save_graph(
            &records,
            config.mode,
            &date_range,
            &config.render,
            &config.output_path,
        )
        .await
        .context("Failed to render graph")?;

    tracing::info!(
        "[GRAPH] Wrote {} bytes to {}",
        bytes.len(),
        config.output_path.display()
    );
    Ok(())
}
