use anyhow::{Context, Result};
use std::sync::Arc;

use moodgraph::config::Config;
use moodgraph::utils::clock::SystemClock;
use moodgraph::utils::files::FsFileWriter;
use moodgraph::utils::graph::LineGraphGenerator;
use moodgraph::utils::graph::canvas::RasterBackend;
use moodgraph::utils::graph::service::LineGraphService;
use moodgraph::utils::graph::transform::GraphDataTransformer;

/// Everything a command needs to run.
pub struct Handler {
    pub config: Config,
    pub graph_service: LineGraphService<RasterBackend>,
}

impl Handler {
    pub fn new(config: Config) -> Result<Self> {
        let backend = match &config.font_path {
            Some(path) => {
                tracing::info!("[INIT] Using font {}", path.display());
                RasterBackend::with_font_file(path)
            }
            None => RasterBackend::new(),
        }
        .context("Failed to load font")?;

        let graph_service = LineGraphService::new(
            GraphDataTransformer::new(),
            LineGraphGenerator::new(backend, Arc::new(FsFileWriter)),
            Arc::new(SystemClock::from_name(&config.timezone)),
        );

        Ok(Handler {
            config,
            graph_service,
        })
    }
}
