//! Error types for map file parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for map file operations.
pub type MapFormatResult<T> = Result<T, MapFormatError>;

/// Error types for map file parsing.
///
/// Line numbers are 1-based and refer to the whole file, so they can be
/// looked up directly in an editor.
#[derive(Error, Debug)]
pub enum MapFormatError {
    /// File could not be opened or read
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header ended before all eight lines were read
    #[error("Unexpected end of file: header line {line} is missing")]
    UnexpectedEof { line: usize },

    /// A header line did not contain the expected token
    #[error("Missing {what} on line {line}")]
    MissingToken { line: usize, what: &'static str },

    /// A token that should be an integer is not
    #[error("Invalid integer '{token}' on line {line}")]
    InvalidInteger { line: usize, token: String },

    /// A token that should be a float is not
    #[error("Invalid number '{token}' on line {line}")]
    InvalidFloat { line: usize, token: String },

    /// A grid dimension of zero
    #[error("Invalid {what} on line {line}: must be positive")]
    InvalidCount { line: usize, what: &'static str },

    /// A range line that does not hold exactly two values
    #[error("Expected 2 values for {what} on line {line}, found {found}")]
    RangeArity {
        line: usize,
        what: &'static str,
        found: usize,
    },

    /// Not exactly two '#'-delimited grid blocks after the header
    #[error("Expected 2 '#'-delimited grid blocks after the header, found {found}")]
    BlockCount { found: usize },

    /// A grid row whose width differs from the first row of its block
    #[error("Ragged row in {block} block on line {line}: expected {expected} values, found {found}")]
    RaggedRow {
        block: &'static str,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A grid block whose shape disagrees with the header counts
    #[error("{block} block is {rows}x{cols}, header declares {expected_rows}x{expected_cols}")]
    ShapeMismatch {
        block: &'static str,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    /// A range bound that cannot be placed on a logarithmic axis
    #[error("Invalid {what} bound {value}: logarithmic axes need positive finite bounds")]
    NonPositiveBound { what: &'static str, value: f64 },
}

impl MapFormatError {
    /// Whether the error came from the filesystem rather than the file content.
    pub fn is_io(&self) -> bool {
        matches!(self, MapFormatError::Io { .. })
    }
}
