use ab_glyph::{FontArc, PxScale};
use image::imageops::FilterType;
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
    draw_text_mut, text_size,
};
use imageproc::rect::Rect;
use std::io::Cursor;
use std::path::Path;

use crate::error::{GraphError, Result};

/// Font used when no other font file is configured.
const BUNDLED_FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");

/// Largest surface edge we agree to allocate.
pub const MAX_DIMENSION: u32 = 16_384;

/// Drawing surface the generator paints on.
///
/// Coordinates are in pixels from the top-left corner.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba<u8>, thickness: f32);
    fn draw_circle(&mut self, center: (f32, f32), radius: f32, color: Rgba<u8>);
    fn draw_rect(&mut self, origin: (f32, f32), size: (f32, f32), color: Rgba<u8>, filled: bool);
    /// Draws `text` with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: (f32, f32), size: f32, color: Rgba<u8>);
    /// Width and height `text` would occupy at `size`.
    fn measure_text(&self, text: &str, size: f32) -> (f32, f32);
    /// Decodes the image at `path` and draws it over the whole surface, cropping to keep
    /// its aspect ratio.
    fn draw_image_file(&mut self, path: &Path) -> Result<()>;
    fn encode_png(&self) -> Result<Vec<u8>>;
}

/// Hands out fresh surfaces, one per render.
pub trait CanvasBackend: Send + Sync {
    type Surface: Canvas;

    fn allocate(&self, width: u32, height: u32) -> Result<Self::Surface>;
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(GraphError::Surface(format!(
            "canvas must not be empty, got {width}x{height}"
        )));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(GraphError::Surface(format!(
            "canvas {width}x{height} exceeds the {MAX_DIMENSION}px limit"
        )));
    }
    Ok(())
}

/// Software rasterizer backed by `image` and `imageproc`.
#[derive(Clone)]
pub struct RasterBackend {
    font: FontArc,
}

impl RasterBackend {
    /// Uses the bundled DejaVu Sans font.
    pub fn new() -> Result<Self> {
        let font = FontArc::try_from_slice(BUNDLED_FONT)
            .map_err(|_| GraphError::Font("bundled font is not a valid TrueType font".into()))?;
        Ok(RasterBackend { font })
    }

    pub fn with_font_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let font_bytes = std::fs::read(path)
            .map_err(|e| GraphError::Font(format!("{}: {}", path.display(), e)))?;
        let font = FontArc::try_from_vec(font_bytes)
            .map_err(|_| GraphError::Font(format!("{}: failed to parse font", path.display())))?;
        Ok(RasterBackend { font })
    }
}

impl CanvasBackend for RasterBackend {
    type Surface = RasterSurface;

    fn allocate(&self, width: u32, height: u32) -> Result<RasterSurface> {
        check_dimensions(width, height)?;
        Ok(RasterSurface {
            image: RgbaImage::new(width, height),
            font: self.font.clone(),
        })
    }
}

pub struct RasterSurface {
    image: RgbaImage,
    font: FontArc,
}

impl RasterSurface {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl Canvas for RasterSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba<u8>, thickness: f32) {
        let strokes = thickness.round().max(1.0) as i32;
        if strokes == 1 {
            draw_line_segment_mut(&mut self.image, from, to, color);
            return;
        }

        // Thick lines are parallel 1px segments offset along the normal.
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dy * dy).sqrt();
        let (nx, ny) = if length > 0.0 {
            (-dy / length, dx / length)
        } else {
            (0.0, 1.0)
        };

        for i in 0..strokes {
            let offset = i as f32 - (strokes - 1) as f32 / 2.0;
            draw_line_segment_mut(
                &mut self.image,
                (from.0 + nx * offset, from.1 + ny * offset),
                (to.0 + nx * offset, to.1 + ny * offset),
                color,
            );
        }
    }

    fn draw_circle(&mut self, center: (f32, f32), radius: f32, color: Rgba<u8>) {
        draw_filled_circle_mut(
            &mut self.image,
            (center.0.round() as i32, center.1.round() as i32),
            radius.round().max(1.0) as i32,
            color,
        );
    }

    fn draw_rect(&mut self, origin: (f32, f32), size: (f32, f32), color: Rgba<u8>, filled: bool) {
        let (w, h) = (size.0.round(), size.1.round());
        if w < 1.0 || h < 1.0 {
            return;
        }
        let rect = Rect::at(origin.0.round() as i32, origin.1.round() as i32).of_size(w as u32, h as u32);
        if filled {
            draw_filled_rect_mut(&mut self.image, rect, color);
        } else {
            draw_hollow_rect_mut(&mut self.image, rect, color);
        }
    }

    fn draw_text(&mut self, text: &str, origin: (f32, f32), size: f32, color: Rgba<u8>) {
        draw_text_mut(
            &mut self.image,
            color,
            origin.0.round() as i32,
            origin.1.round() as i32,
            PxScale::from(size),
            &self.font,
            text,
        );
    }

    fn measure_text(&self, text: &str, size: f32) -> (f32, f32) {
        let (w, h) = text_size(PxScale::from(size), &self.font, text);
        (w as f32, h as f32)
    }

    fn draw_image_file(&mut self, path: &Path) -> Result<()> {
        let decoded = image::open(path).map_err(|source| {
            tracing::error!(
                "[GRAPH] Failed to decode background image {}: {}",
                path.display(),
                source
            );
            GraphError::BackgroundDecode {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let filled = decoded
            .resize_to_fill(self.image.width(), self.image.height(), FilterType::Triangle)
            .to_rgba8();
        image::imageops::overlay(&mut self.image, &filled, 0, 0);
        Ok(())
    }

    fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out_buf: Vec<u8> = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut out_buf), ImageFormat::Png)
            .map_err(|e| {
                tracing::error!("[GRAPH] Failed to encode PNG: {}", e);
                GraphError::Encode(e)
            })?;
        Ok(out_buf)
    }
}

/// Backend that records drawing calls instead of rasterizing them.
#[cfg(test)]
pub mod recording {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawOp {
        Line {
            from: (f32, f32),
            to: (f32, f32),
            color: Rgba<u8>,
        },
        Circle {
            center: (f32, f32),
            radius: f32,
            color: Rgba<u8>,
        },
        Rect {
            origin: (f32, f32),
            size: (f32, f32),
            color: Rgba<u8>,
            filled: bool,
        },
        Text {
            text: String,
            origin: (f32, f32),
        },
        Image(PathBuf),
    }

    #[derive(Clone, Default)]
    pub struct RecordingBackend {
        pub ops: Arc<Mutex<Vec<DrawOp>>>,
    }

    impl RecordingBackend {
        pub fn ops(&self) -> Vec<DrawOp> {
            self.ops.lock().unwrap().clone()
        }
    }

    pub struct RecordingSurface {
        width: u32,
        height: u32,
        ops: Arc<Mutex<Vec<DrawOp>>>,
    }

    impl CanvasBackend for RecordingBackend {
        type Surface = RecordingSurface;

        fn allocate(&self, width: u32, height: u32) -> Result<RecordingSurface> {
            check_dimensions(width, height)?;
            self.ops.lock().unwrap().clear();
            Ok(RecordingSurface {
                width,
                height,
                ops: Arc::clone(&self.ops),
            })
        }
    }

    impl RecordingSurface {
        fn push(&self, op: DrawOp) {
            self.ops.lock().unwrap().push(op);
        }
    }

    impl Canvas for RecordingSurface {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba<u8>, _thickness: f32) {
            self.push(DrawOp::Line { from, to, color });
        }

        fn draw_circle(&mut self, center: (f32, f32), radius: f32, color: Rgba<u8>) {
            self.push(DrawOp::Circle {
                center,
                radius,
                color,
            });
        }

        fn draw_rect(&mut self, origin: (f32, f32), size: (f32, f32), color: Rgba<u8>, filled: bool) {
            self.push(DrawOp::Rect {
                origin,
                size,
                color,
                filled,
            });
        }

        fn draw_text(&mut self, text: &str, origin: (f32, f32), _size: f32, _color: Rgba<u8>) {
            self.push(DrawOp::Text {
                text: text.to_string(),
                origin,
            });
        }

        fn measure_text(&self, text: &str, size: f32) -> (f32, f32) {
            (text.chars().count() as f32 * size * 0.6, size)
        }

        fn draw_image_file(&mut self, path: &Path) -> Result<()> {
            if !path.exists() {
                return Err(GraphError::BackgroundDecode {
                    path: path.to_path_buf(),
                    source: image::ImageError::IoError(std::io::Error::from(
                        std::io::ErrorKind::NotFound,
                    )),
                });
            }
            self.push(DrawOp::Image(path.to_path_buf()));
            Ok(())
        }

        fn encode_png(&self) -> Result<Vec<u8>> {
            let mut bytes = PNG_SIGNATURE.to_vec();
            bytes.extend(format!("{:?}", self.ops.lock().unwrap()).into_bytes());
            Ok(bytes)
        }
    }
}
