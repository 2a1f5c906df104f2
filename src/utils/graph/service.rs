use image::Rgba;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::LineGraphGenerator;
use super::canvas::{CanvasBackend, RasterBackend};
use super::transform::GraphDataTransformer;
use super::types::{Background, GraphMode, RenderOptions};
use crate::error::Result;
use crate::utils::clock::Clock;
use crate::utils::date_range::{DateRange, DateRangeSelector};
use crate::utils::mood::MoodRecord;

/// Entry point for turning mood records into chart images.
///
/// Every method runs the same pipeline: transform the records for the requested mode, then
/// render. Rendering is synchronous; the `async` surface only awaits the file writer.
pub struct LineGraphService<B: CanvasBackend = RasterBackend> {
    transformer: GraphDataTransformer,
    generator: LineGraphGenerator<B>,
    clock: Arc<dyn Clock>,
}

impl<B: CanvasBackend> LineGraphService<B> {
    pub fn new(
        transformer: GraphDataTransformer,
        generator: LineGraphGenerator<B>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        LineGraphService {
            transformer,
            generator,
            clock,
        }
    }

    pub fn generator(&self) -> &LineGraphGenerator<B> {
        &self.generator
    }

    /// Resolves `selector` against the injected clock's "today".
    pub fn resolve_range(&self, selector: DateRangeSelector) -> DateRange {
        selector.resolve(self.clock.today())
    }

    pub async fn generate_graph(
        &self,
        records: &[MoodRecord],
        mode: GraphMode,
        date_range: &DateRange,
        options: &RenderOptions,
    ) -> Result<Vec<u8>> {
        tracing::info!("[SERVICE] Generating {} graph", mode);
        let graph_data = self.transformer.transform(records, mode, date_range)?;
        self.generator.generate(&graph_data, date_range, options)
    }

    pub async fn save_graph(
        &self,
        records: &[MoodRecord],
        mode: GraphMode,
        date_range: &DateRange,
        options: &RenderOptions,
        path: impl AsRef<Path>,
    ) -> Result<Vec<u8>> {
        tracing::info!(
            "[SERVICE] Saving {} graph to {}",
            mode,
            path.as_ref().display()
        );
        let graph_data = self.transformer.transform(records, mode, date_range)?;
        self.generator
            .save(&graph_data, date_range, options, path)
            .await
    }

    /// Like [`generate_graph`](Self::generate_graph), drawing `background_path` under the chart
    /// in place of the background and color carried by `options`.
    pub async fn generate_graph_with_background(
        &self,
        records: &[MoodRecord],
        mode: GraphMode,
        date_range: &DateRange,
        background_path: impl Into<PathBuf>,
        line_color: Rgba<u8>,
        options: &RenderOptions,
    ) -> Result<Vec<u8>> {
        let options = with_background(options, background_path.into(), line_color);
        self.generate_graph(records, mode, date_range, &options).await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn save_graph_with_background(
        &self,
        records: &[MoodRecord],
        mode: GraphMode,
        date_range: &DateRange,
        background_path: impl Into<PathBuf>,
        line_color: Rgba<u8>,
        options: &RenderOptions,
        path: impl AsRef<Path>,
    ) -> Result<Vec<u8>> {
        let options = with_background(options, background_path.into(), line_color);
        self.save_graph(records, mode, date_range, &options, path).await
    }

    pub async fn generate_impact_graph(
        &self,
        records: &[MoodRecord],
        date_range: &DateRange,
        options: &RenderOptions,
    ) -> Result<Vec<u8>> {
        self.generate_graph(records, GraphMode::Impact, date_range, options)
            .await
    }

    pub async fn generate_average_graph(
        &self,
        records: &[MoodRecord],
        date_range: &DateRange,
        options: &RenderOptions,
    ) -> Result<Vec<u8>> {
        self.generate_graph(records, GraphMode::Average, date_range, options)
            .await
    }

    pub async fn generate_raw_graph(
        &self,
        records: &[MoodRecord],
        date_range: &DateRange,
        options: &RenderOptions,
    ) -> Result<Vec<u8>> {
        self.generate_graph(records, GraphMode::RawData, date_range, options)
            .await
    }

    pub async fn save_impact_graph(
        &self,
        records: &[MoodRecord],
        date_range: &DateRange,
        options: &RenderOptions,
        path: impl AsRef<Path>,
    ) -> Result<Vec<u8>> {
        self.save_graph(records, GraphMode::Impact, date_range, options, path)
            .await
    }

    pub async fn save_average_graph(
        &self,
        records: &[MoodRecord],
        date_range: &DateRange,
        options: &RenderOptions,
        path: impl AsRef<Path>,
    ) -> Result<Vec<u8>> {
        self.save_graph(records, GraphMode::Average, date_range, options, path)
            .await
    }

    pub async fn save_raw_graph(
        &self,
        records: &[MoodRecord],
        date_range: &DateRange,
        options: &RenderOptions,
        path: impl AsRef<Path>,
    ) -> Result<Vec<u8>> {
        self.save_graph(records, GraphMode::RawData, date_range, options, path)
            .await
    }
}

fn with_background(options: &RenderOptions, path: PathBuf, line_color: Rgba<u8>) -> RenderOptions {
    RenderOptions {
        background: Background::ImageFile(path),
        line_color,
        ..options.clone()
    }
}
