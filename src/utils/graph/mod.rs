pub mod canvas;
pub(crate) mod drawing;
mod helpers;
pub mod layout;
pub mod service;
pub mod transform;
pub mod trend;
pub mod types;

use canvas::{Canvas, CanvasBackend, RasterBackend};
use drawing::{
    Palette, draw_axes, draw_axis_titles, draw_center_line, draw_date_labels, draw_day_separators,
    draw_markers, draw_polyline, draw_title, draw_trend_line, draw_value_grid,
};
use layout::{PlotArea, XScale, YScale, axis_ticks};
use types::{Background, GraphData, RenderOptions};

use crate::error::{GraphError, Result};
use crate::utils::date_range::DateRange;
use crate::utils::files::FileWriter;
use chrono::NaiveDate;
use image::Rgba;
use std::path::Path;
use std::sync::Arc;

const WHITE: Rgba<u8> = Rgba([255u8, 255u8, 255u8, 255u8]);

/// Renders [`GraphData`] into PNG images.
pub struct LineGraphGenerator<B: CanvasBackend = RasterBackend> {
    backend: B,
    writer: Arc<dyn FileWriter>,
}

impl<B: CanvasBackend> LineGraphGenerator<B> {
    pub fn new(backend: B, writer: Arc<dyn FileWriter>) -> Self {
        LineGraphGenerator { backend, writer }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Draws the chart and returns the encoded PNG bytes.
    pub fn generate(
        &self,
        graph_data: &GraphData,
        date_range: &DateRange,
        options: &RenderOptions,
    ) -> Result<Vec<u8>> {
        tracing::info!(
            "[GRAPH] Starting '{}' graph ({}x{}, {} points)",
            graph_data.title,
            options.width,
            options.height,
            graph_data.points.len()
        );

        let mut canvas = self.backend.allocate(options.width, options.height).map_err(|e| {
            tracing::error!("[GRAPH] Failed to allocate surface: {}", e);
            e
        })?;

        paint_background(&mut canvas, &options.background)?;

        let palette = Palette::default();
        let width = options.width as f32;
        let height = options.height as f32;
        let area = PlotArea::new(options.width, options.height);

        let title_size = (height * 0.045).clamp(12.0, 36.0);
        let label_size = (height.min(width) * 0.028).clamp(9.0, 20.0);
        let marker_radius = if graph_data.points.len() < 60 { 5.0 } else { 3.0 };
        let line_thickness = 2.0;

        let x_scale = XScale::new(date_range, &graph_data.points, area.inner_left, area.inner_width());
        let y_scale = YScale::new(graph_data.y_axis_range, area.inner_top, area.inner_bottom);

        tracing::debug!(
            "[GRAPH] Y-axis range: {:.1} to {:.1}, x domain: {:?}",
            graph_data.y_axis_range.min,
            graph_data.y_axis_range.max,
            x_scale.domain()
        );

        if options.show_axes_and_grid {
            let ticks = axis_ticks(graph_data.y_axis_range, graph_data.y_axis_label_step);
            draw_value_grid(&mut canvas, &area, &y_scale, &ticks, label_size, &palette);
            draw_center_line(
                &mut canvas,
                &area,
                &y_scale,
                graph_data.center_line_value,
                &palette,
            );
            if graph_data.is_raw_data {
                draw_day_separators(&mut canvas, &area, &x_scale, &graph_data.points, &palette);
            }
            draw_axes(&mut canvas, &area, &palette);
            draw_date_labels(
                &mut canvas,
                &area,
                &x_scale,
                &label_dates(graph_data, date_range),
                label_size,
                &palette,
            );
            draw_axis_titles(
                &mut canvas,
                &area,
                &graph_data.y_axis_label,
                &graph_data.x_axis_label,
                label_size,
                &palette,
            );
        }

        let points_px: Vec<(f32, f32)> = graph_data
            .points
            .iter()
            .map(|p| (x_scale.to_px(p.timestamp), y_scale.to_px(p.value)))
            .collect();

        for (point, px) in graph_data.points.iter().zip(&points_px) {
            tracing::trace!(
                "[GRAPH] Point {} = {:.2} at ({:.1}, {:.1})",
                point.timestamp,
                point.value,
                px.0,
                px.1
            );
        }

        draw_polyline(&mut canvas, &points_px, options.line_color, line_thickness);

        if options.show_data_points {
            draw_markers(&mut canvas, &points_px, marker_radius, options.line_color, &palette);
        }

        if options.show_trend_line {
            let samples: Vec<(f64, f64)> = graph_data
                .points
                .iter()
                .map(|p| (x_scale.ordinal(p.timestamp), f64::from(p.value)))
                .collect();

            match trend::fit(&samples) {
                Some(line) => {
                    tracing::debug!(
                        "[GRAPH] Trend line slope {:.3}, intercept {:.3}",
                        line.slope,
                        line.intercept
                    );
                    draw_trend_line(&mut canvas, &line, &x_scale, &y_scale, &palette);
                }
                None => tracing::debug!("[GRAPH] No points, skipping trend line"),
            }
        }

        if options.show_title {
            draw_title(&mut canvas, &graph_data.title, &area, title_size, &palette);
        }

        let out_buf = canvas.encode_png()?;

        tracing::info!(
            "[GRAPH] Successfully generated graph ({} bytes)",
            out_buf.len()
        );
        Ok(out_buf)
    }

    /// Renders like [`generate`](Self::generate) and writes the bytes to `path`.
    pub async fn save(
        &self,
        graph_data: &GraphData,
        date_range: &DateRange,
        options: &RenderOptions,
        path: impl AsRef<Path>,
    ) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let out_buf = self.generate(graph_data, date_range, options)?;

        self.writer.write(path, &out_buf).await.map_err(|source| {
            tracing::error!("[GRAPH] Failed to save PNG to {}: {}", path.display(), source);
            GraphError::Write {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::info!("[GRAPH] Saved graph to {}", path.display());
        Ok(out_buf)
    }
}

fn paint_background(canvas: &mut impl Canvas, background: &Background) -> Result<()> {
    match background {
        Background::None => Ok(()),
        Background::SolidWhite => {
            let size = (canvas.width() as f32, canvas.height() as f32);
            canvas.draw_rect((0.0, 0.0), size, WHITE, true);
            Ok(())
        }
        Background::ImageFile(path) => {
            tracing::debug!("[GRAPH] Drawing background image {}", path.display());
            canvas.draw_image_file(path)
        }
    }
}

/// Days that get an x-axis label: each day holding data, or the range ends when there is none.
fn label_dates(graph_data: &GraphData, date_range: &DateRange) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = graph_data
        .points
        .iter()
        .map(|p| p.timestamp.date())
        .filter(|d| date_range.contains(*d))
        .collect();
    dates.dedup();

    if dates.is_empty() {
        dates.push(date_range.start);
        if date_range.end != date_range.start {
            dates.push(date_range.end);
        }
    }
    dates
}
