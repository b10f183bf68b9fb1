//! Error types for figure rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid image size {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Figure margins leave no room for the plot in a {width}x{height} image")]
    NoPlotArea { width: u32, height: u32 },

    #[error("Cannot render an empty {rows}x{cols} grid")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("Coordinates for {what} have {found} entries, grid needs {expected}")]
    CoordinateMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid {what}: {message}")]
    InvalidCoordinates { what: &'static str, message: String },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
