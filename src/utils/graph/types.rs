use chrono::NaiveDateTime;
use image::Rgba;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::GraphError;

/// How mood records are interpreted on the chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphMode {
    /// Within-day change, end of work minus start of work.
    Impact,
    /// Per-day adjusted average of both scores.
    Average,
    /// Both raw scores as separate timestamped points.
    RawData,
}

impl GraphMode {
    pub const ALL: [GraphMode; 3] = [Self::Impact, Self::Average, Self::RawData];

    pub fn tag(self) -> i32 {
        match self {
            Self::Impact => 0,
            Self::Average => 1,
            Self::RawData => 2,
        }
    }
}

impl fmt::Display for GraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Impact => "impact",
            Self::Average => "average",
            Self::RawData => "raw",
        };
        f.write_str(name)
    }
}

impl TryFrom<i32> for GraphMode {
    type Error = GraphError;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Impact),
            1 => Ok(Self::Average),
            2 => Ok(Self::RawData),
            other => Err(GraphError::UnsupportedMode(other.to_string())),
        }
    }
}

impl FromStr for GraphMode {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "impact" => Ok(Self::Impact),
            "average" | "avg" => Ok(Self::Average),
            "raw" | "rawdata" | "raw_data" => Ok(Self::RawData),
            _ => Err(GraphError::UnsupportedMode(s.to_string())),
        }
    }
}

/// A single plotted value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataPoint {
    pub timestamp: NaiveDateTime,
    pub value: f32,
}

impl DataPoint {
    pub fn new(timestamp: NaiveDateTime, value: f32) -> Self {
        DataPoint { timestamp, value }
    }
}

/// Fixed vertical bounds of a chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

impl AxisRange {
    pub const fn new(min: f32, max: f32) -> Self {
        AxisRange { min, max }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Everything the generator needs to draw one chart.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphData {
    pub title: String,
    /// Sorted ascending by timestamp.
    pub points: Vec<DataPoint>,
    pub y_axis_range: AxisRange,
    pub center_line_value: f32,
    pub y_axis_label: String,
    pub x_axis_label: String,
    pub is_raw_data: bool,
    pub y_axis_label_step: f32,
    pub description: String,
}

/// What to paint under the chart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Background {
    /// Leave the surface transparent.
    None,
    #[default]
    SolidWhite,
    /// Decode the image and stretch it over the whole surface.
    ImageFile(PathBuf),
}

impl FromStr for Background {
    type Err = std::convert::Infallible;

    /// `none` and `white` select the plain variants; anything else is taken as an image path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "none" | "transparent" => Background::None,
            "white" | "" => Background::SolidWhite,
            _ => Background::ImageFile(PathBuf::from(s.trim())),
        })
    }
}

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_LINE_COLOR: Rgba<u8> = Rgba([33u8, 150u8, 243u8, 255u8]);

#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    pub show_data_points: bool,
    pub show_axes_and_grid: bool,
    pub show_title: bool,
    pub show_trend_line: bool,
    pub line_color: Rgba<u8>,
    pub width: u32,
    pub height: u32,
    pub background: Background,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            show_data_points: true,
            show_axes_and_grid: true,
            show_title: true,
            show_trend_line: false,
            line_color: DEFAULT_LINE_COLOR,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: Background::SolidWhite,
        }
    }
}

impl RenderOptions {
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn line_color(mut self, color: Rgba<u8>) -> Self {
        self.line_color = color;
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn trend_line(mut self, show: bool) -> Self {
        self.show_trend_line = show;
        self
    }

    pub fn data_points(mut self, show: bool) -> Self {
        self.show_data_points = show;
        self
    }

    pub fn axes_and_grid(mut self, show: bool) -> Self {
        self.show_axes_and_grid = show;
        self
    }

    pub fn title(mut self, show: bool) -> Self {
        self.show_title = show;
        self
    }
}

/// Parses `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
pub fn parse_hex_color(input: &str) -> Result<Rgba<u8>, GraphError> {
    let hex = input.trim().trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(GraphError::InvalidColor(input.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| GraphError::InvalidColor(input.to_string()))
    };

    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}
