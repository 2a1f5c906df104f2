use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// Raised when a mode name or tag does not map to one of the known graph modes.
    #[error("Unsupported graph mode: {0}")]
    UnsupportedMode(String),
    /// The drawing surface could not be allocated (for example a zero-sized canvas).
    #[error("Failed to allocate drawing surface: {0}")]
    Surface(String),
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    /// Represents a background image that could not be opened or decoded.
    ///
    /// Rendering aborts when this happens, there is no fallback to a plain background.
    #[error("Failed to decode background image {}: {source}", path.display())]
    BackgroundDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to load font: {0}")]
    Font(String),
    #[error("Failed to write graph to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Failed to load mood records: {0}")]
    Records(String),
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
