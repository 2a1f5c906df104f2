use image::Rgba;

use super::canvas::Canvas;

/// Draw a dashed vertical line on the canvas
pub fn draw_dashed_vertical_line(
    canvas: &mut impl Canvas,
    x: f32,
    y_start: f32,
    y_end: f32,
    color: Rgba<u8>,
    dash_length: f32,
    gap_length: f32,
) {
    let mut y = y_start;
    let mut drawing_dash = true;

    while y < y_end {
        if drawing_dash {
            let dash_end = (y + dash_length).min(y_end);
            canvas.draw_line((x, y), (x, dash_end), color, 1.0);
            y += dash_length;
        } else {
            y += gap_length;
        }
        drawing_dash = !drawing_dash;
    }
}

/// Draw a dashed line between two arbitrary points
#[allow(clippy::too_many_arguments)]
pub fn draw_dashed_line(
    canvas: &mut impl Canvas,
    from: (f32, f32),
    to: (f32, f32),
    color: Rgba<u8>,
    thickness: f32,
    dash_length: f32,
    gap_length: f32,
) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= 0.0 || dash_length <= 0.0 {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);

    let mut travelled = 0.0_f32;
    while travelled < length {
        let dash_end = (travelled + dash_length).min(length);
        canvas.draw_line(
            (from.0 + ux * travelled, from.1 + uy * travelled),
            (from.0 + ux * dash_end, from.1 + uy * dash_end),
            color,
            thickness,
        );
        travelled += dash_length + gap_length;
    }
}

/// Draw text horizontally centered on `center_x`
pub fn draw_centered_text(
    canvas: &mut impl Canvas,
    text: &str,
    center_x: f32,
    y: f32,
    size: f32,
    color: Rgba<u8>,
) {
    let (text_w, _) = canvas.measure_text(text, size);
    canvas.draw_text(text, (center_x - text_w / 2.0, y), size, color);
}
