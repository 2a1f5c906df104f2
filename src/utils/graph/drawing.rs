use chrono::NaiveDate;
use image::Rgba;

use super::canvas::Canvas;
use super::helpers::{draw_centered_text, draw_dashed_line, draw_dashed_vertical_line};
use super::layout::{PlotArea, XScale, YScale};
use super::trend::TrendLine;
use super::types::DataPoint;

/// Colors shared by every chart element except the data line itself.
pub struct Palette {
    pub grid: Rgba<u8>,
    pub axis: Rgba<u8>,
    pub text: Rgba<u8>,
    pub dim: Rgba<u8>,
    pub center_line: Rgba<u8>,
    pub day_separator: Rgba<u8>,
    pub trend: Rgba<u8>,
    pub marker_outline: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            grid: Rgba([226u8, 230u8, 235u8, 255u8]),
            axis: Rgba([96u8, 104u8, 116u8, 255u8]),
            text: Rgba([33u8, 37u8, 41u8, 255u8]),
            dim: Rgba([108u8, 117u8, 125u8, 255u8]),
            center_line: Rgba([150u8, 156u8, 164u8, 255u8]),
            day_separator: Rgba([200u8, 205u8, 212u8, 255u8]),
            trend: Rgba([244u8, 67u8, 54u8, 255u8]),
            marker_outline: Rgba([255u8, 255u8, 255u8, 255u8]),
        }
    }
}

/// Draw the left and bottom axis lines
pub fn draw_axes(canvas: &mut impl Canvas, area: &PlotArea, palette: &Palette) {
    canvas.draw_line((area.left, area.top), (area.left, area.bottom), palette.axis, 1.0);
    canvas.draw_line(
        (area.left, area.bottom),
        (area.right, area.bottom),
        palette.axis,
        1.0,
    );
}

/// Draw horizontal gridlines with their value labels on the left
pub fn draw_value_grid(
    canvas: &mut impl Canvas,
    area: &PlotArea,
    y_scale: &YScale,
    ticks: &[f32],
    label_size: f32,
    palette: &Palette,
) {
    for &value in ticks {
        let y_px = y_scale.to_px(value);

        if y_px > area.inner_top - 0.5 && y_px < area.inner_bottom + 0.5 {
            canvas.draw_line(
                (area.inner_left, y_px),
                (area.inner_right, y_px),
                palette.grid,
                1.0,
            );
        }

        let label = format_value(value);
        let (text_w, text_h) = canvas.measure_text(&label, label_size);
        canvas.draw_text(
            &label,
            (area.left - text_w - 8.0, y_px - text_h / 2.0),
            label_size,
            palette.text,
        );
    }
}

/// Draw the dashed reference line at the mode's baseline value
pub fn draw_center_line(
    canvas: &mut impl Canvas,
    area: &PlotArea,
    y_scale: &YScale,
    value: f32,
    palette: &Palette,
) {
    let y_px = y_scale.to_px(value);
    draw_dashed_line(
        canvas,
        (area.inner_left, y_px),
        (area.inner_right, y_px),
        palette.center_line,
        1.0,
        8.0,
        6.0,
    );
}

/// Draw date labels under the x axis, skipping labels that would collide
pub fn draw_date_labels(
    canvas: &mut impl Canvas,
    area: &PlotArea,
    x_scale: &XScale,
    dates: &[NaiveDate],
    label_size: f32,
    palette: &Palette,
) {
    let mut placed: Vec<(f32, String)> = Vec::new();

    for (i, date) in dates.iter().enumerate() {
        let x_center = x_scale.to_px(date.and_time(chrono::NaiveTime::MIN));
        let label = date.format("%m/%d").to_string();
        let (text_w, _) = canvas.measure_text(&label, label_size);
        let min_label_distance = text_w + 12.0;

        let fits = match placed.last() {
            None => true,
            Some((last_x, _)) => (x_center - last_x).abs() >= min_label_distance,
        };
        let is_last = i == dates.len() - 1;

        if fits {
            placed.push((x_center, label));
        } else if is_last && placed.len() >= 2 {
            // The newest date always wins over its crowded neighbour.
            placed.pop();
            placed.push((x_center, label));
        }
    }

    for (x_center, label) in &placed {
        canvas.draw_line(
            (*x_center, area.bottom),
            (*x_center, area.bottom + 4.0),
            palette.axis,
            1.0,
        );
        draw_centered_text(canvas, label, *x_center, area.bottom + 8.0, label_size, palette.text);
    }
}

/// Draw the axis titles: the y title above the value labels, the x title under the dates
pub fn draw_axis_titles(
    canvas: &mut impl Canvas,
    area: &PlotArea,
    y_axis_label: &str,
    x_axis_label: &str,
    label_size: f32,
    palette: &Palette,
) {
    let (_, text_h) = canvas.measure_text(y_axis_label, label_size);
    canvas.draw_text(
        y_axis_label,
        (area.left - 8.0, area.top - text_h - 6.0),
        label_size,
        palette.dim,
    );

    let center_x = (area.left + area.right) / 2.0;
    draw_centered_text(
        canvas,
        x_axis_label,
        center_x,
        area.bottom + label_size + 16.0,
        label_size,
        palette.dim,
    );
}

/// Draw dashed vertical separators where the calendar day changes between points
pub fn draw_day_separators(
    canvas: &mut impl Canvas,
    area: &PlotArea,
    x_scale: &XScale,
    points: &[DataPoint],
    palette: &Palette,
) {
    let mut prev_date: Option<NaiveDate> = None;

    for point in points {
        let current_date = point.timestamp.date();
        if let Some(prev) = prev_date {
            if current_date != prev {
                let x = x_scale.to_px(current_date.and_time(chrono::NaiveTime::MIN));
                draw_dashed_vertical_line(
                    canvas,
                    x,
                    area.inner_top,
                    area.inner_bottom,
                    palette.day_separator,
                    6.0,
                    6.0,
                );
            }
        }
        prev_date = Some(current_date);
    }
}

/// Draw the line connecting all points in order
pub fn draw_polyline(canvas: &mut impl Canvas, points_px: &[(f32, f32)], color: Rgba<u8>, thickness: f32) {
    for pair in points_px.windows(2) {
        canvas.draw_line(pair[0], pair[1], color, thickness);
    }
}

/// Draw a filled marker with a light outline at every point
pub fn draw_markers(
    canvas: &mut impl Canvas,
    points_px: &[(f32, f32)],
    radius: f32,
    color: Rgba<u8>,
    palette: &Palette,
) {
    for &center in points_px {
        canvas.draw_circle(center, radius + 1.5, palette.marker_outline);
        canvas.draw_circle(center, radius, color);
    }
}

/// Draw the fitted trend line across the plotted span, cut where it leaves the value axis
pub fn draw_trend_line(
    canvas: &mut impl Canvas,
    trend: &TrendLine,
    x_scale: &XScale,
    y_scale: &YScale,
    palette: &Palette,
) {
    let (lo, hi) = x_scale.domain();
    let axis = y_scale.range();
    let Some((start, end)) = trend.clip(lo, hi, f64::from(axis.min), f64::from(axis.max)) else {
        tracing::debug!("[GRAPH] Trend line lies outside the value axis, skipping");
        return;
    };

    let from = (x_scale.ordinal_to_px(start), y_scale.to_px(trend.value_at(start) as f32));
    let mut to = (x_scale.ordinal_to_px(end), y_scale.to_px(trend.value_at(end) as f32));

    // A span of zero still gets a visible flat segment.
    if (to.0 - from.0).abs() < 1.0 && (to.1 - from.1).abs() < 1.0 {
        to = (from.0 + 1.0, from.1);
    }

    draw_dashed_line(canvas, from, to, palette.trend, 2.0, 12.0, 6.0);
}

/// Draw the chart title centered in the top margin
pub fn draw_title(canvas: &mut impl Canvas, title: &str, area: &PlotArea, size: f32, palette: &Palette) {
    let center_x = canvas.width() as f32 / 2.0;
    let (_, text_h) = canvas.measure_text(title, size);
    let y = ((area.top - text_h) / 2.0 - size * 0.4).max(2.0);
    draw_centered_text(canvas, title, center_x, y, size, palette.text);
}

/// Labels keep one decimal only when the value needs it
pub fn format_value(value: f32) -> String {
    if value.fract().abs() < f32::EPSILON {
        format!("{}", value as i32)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_labels() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(-9.0), "-9");
        assert_eq!(format_value(5.5), "5.5");
        assert_eq!(format_value(0.0), "0");
    }
}
