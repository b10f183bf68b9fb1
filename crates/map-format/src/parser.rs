//! Parser for the map snapshot text format.
//!
//! A map file is an eight-line header followed by two grid blocks:
//!
//! ```text
//! <label>
//! <temperature count> ...
//! <label>
//! <surface density count> ...
//! <label>
//! <T low> <T high>
//! <label>
//! <Sigma low> <Sigma high>
//! # <heating rate title>
//! <row 0: density_count values>
//! ...
//! # <optical depth title>
//! <row 0: density_count values>
//! ...
//! ```
//!
//! Odd header lines are labels and are ignored. Everything after the header
//! is split on `#`; the text before the first `#` is discarded and exactly
//! two blocks must follow.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{MapFormatError, MapFormatResult};
use crate::grid::{Extent, Grid, ValueRange};

/// Number of header lines before the grid blocks.
pub const HEADER_LINES: usize = 8;

const HEATING_BLOCK: &str = "heating rate";
const OPTICAL_DEPTH_BLOCK: &str = "optical depth";

/// File name of the snapshot with the given index, e.g. `map_00042.dat`.
pub fn map_file_name(index: u32) -> String {
    format!("map_{:05}.dat", index)
}

/// Path of the snapshot with the given index inside `dir`.
pub fn map_file_path<P: AsRef<Path>>(dir: P, index: u32) -> PathBuf {
    dir.as_ref().join(map_file_name(index))
}

/// One parsed simulation snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFile {
    /// Number of temperature samples (grid rows)
    pub temperature_count: usize,
    /// Number of surface-density samples (grid columns)
    pub density_count: usize,
    /// Temperature bounds in header order
    pub temperature_range: ValueRange,
    /// Surface-density bounds in header order
    pub density_range: ValueRange,
    /// Net heating rate Q+ - Q-
    pub heating: Grid,
    /// Optical depth tau
    pub optical_depth: Grid,
}

impl MapFile {
    /// Read and parse a map file from disk.
    ///
    /// The whole file is read before parsing starts, so the handle is closed
    /// whether or not parsing succeeds.
    pub fn from_path<P: AsRef<Path>>(path: P) -> MapFormatResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MapFormatError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), bytes = content.len(), "Read map file");
        Self::parse(&content)
    }

    /// Parse map file content.
    pub fn parse(content: &str) -> MapFormatResult<Self> {
        let (header, body) = split_header(content)?;

        let temperature_count = parse_count(header[1], 2, "temperature count")?;
        let density_count = parse_count(header[3], 4, "surface density count")?;
        let temperature_range = parse_range(header[5], 6, "temperature range")?;
        let density_range = parse_range(header[7], 8, "surface density range")?;

        debug!(
            temperature_count,
            density_count,
            t_low = temperature_range.low,
            t_high = temperature_range.high,
            sigma_low = density_range.low,
            sigma_high = density_range.high,
            "Parsed map header"
        );

        let mut segments = body.split('#');
        // split always yields at least one segment
        let leading = segments.next().unwrap_or("");
        if !leading.trim().is_empty() {
            warn!(
                chars = leading.trim().len(),
                "Ignoring text between the header and the first '#'"
            );
        }

        let blocks: Vec<&str> = segments.collect();
        if blocks.len() != 2 {
            return Err(MapFormatError::BlockCount {
                found: blocks.len(),
            });
        }

        let heating_line = HEADER_LINES + 1 + leading.matches('\n').count();
        let tau_line = heating_line + blocks[0].matches('\n').count();

        let heating = parse_block(blocks[0], heating_line, HEATING_BLOCK)?;
        check_shape(&heating, HEATING_BLOCK, temperature_count, density_count)?;

        let optical_depth = parse_block(blocks[1], tau_line, OPTICAL_DEPTH_BLOCK)?;
        check_shape(&optical_depth, OPTICAL_DEPTH_BLOCK, temperature_count, density_count)?;

        Ok(Self {
            temperature_count,
            density_count,
            temperature_range,
            density_range,
            heating,
            optical_depth,
        })
    }

    /// Image extent `(Sigma low, Sigma high, T low, T high)`.
    pub fn extent(&self) -> Extent {
        Extent::new(self.density_range, self.temperature_range)
    }
}

impl FromStr for MapFile {
    type Err = MapFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split content into the eight header lines and the remaining body text.
fn split_header(content: &str) -> MapFormatResult<(Vec<&str>, &str)> {
    let mut header = Vec::with_capacity(HEADER_LINES);
    let mut body_start = 0;

    for line in content.split_inclusive('\n').take(HEADER_LINES) {
        body_start += line.len();
        header.push(line.trim_end_matches(['\n', '\r']));
    }

    if header.len() < HEADER_LINES {
        return Err(MapFormatError::UnexpectedEof {
            line: header.len() + 1,
        });
    }

    Ok((header, &content[body_start..]))
}

/// Parse the first token of a header line as a positive grid dimension.
fn parse_count(text: &str, line: usize, what: &'static str) -> MapFormatResult<usize> {
    let token = text
        .split_whitespace()
        .next()
        .ok_or(MapFormatError::MissingToken { line, what })?;

    let count: usize = token.parse().map_err(|_| MapFormatError::InvalidInteger {
        line,
        token: token.to_string(),
    })?;

    if count == 0 {
        return Err(MapFormatError::InvalidCount { line, what });
    }
    Ok(count)
}

/// Parse a header line holding exactly two bounds.
fn parse_range(text: &str, line: usize, what: &'static str) -> MapFormatResult<ValueRange> {
    let values = parse_floats(text, line)?;
    match values[..] {
        [low, high] => Ok(ValueRange::new(low, high)),
        [] => Err(MapFormatError::MissingToken { line, what }),
        _ => Err(MapFormatError::RangeArity {
            line,
            what,
            found: values.len(),
        }),
    }
}

fn parse_floats(text: &str, line: usize) -> MapFormatResult<Vec<f64>> {
    text.split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| MapFormatError::InvalidFloat {
                line,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Parse one `#`-delimited block into a grid.
///
/// `start_line` is the file line holding the `#`. The first line of the
/// segment is the block title; trailing blank lines are dropped. Every other
/// line must hold the same number of values as the first data row.
fn parse_block(segment: &str, start_line: usize, block: &'static str) -> MapFormatResult<Grid> {
    let lines: Vec<&str> = segment.split('\n').collect();
    let mut data_lines = lines.get(1..).unwrap_or(&[]);
    while let Some((last, rest)) = data_lines.split_last() {
        if !last.trim().is_empty() {
            break;
        }
        data_lines = rest;
    }

    let mut width = None;
    let mut data = Vec::new();

    for (offset, text) in data_lines.iter().enumerate() {
        let line = start_line + 1 + offset;
        let row = parse_floats(text, line)?;

        match width {
            None => width = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(MapFormatError::RaggedRow {
                    block,
                    line,
                    expected,
                    found: row.len(),
                });
            }
            Some(_) => {}
        }
        data.extend(row);
    }

    let cols = width.unwrap_or(0);
    debug!(block, rows = data_lines.len(), cols, "Parsed grid block");
    Ok(Grid::from_parts(data_lines.len(), cols, data))
}

fn check_shape(
    grid: &Grid,
    block: &'static str,
    expected_rows: usize,
    expected_cols: usize,
) -> MapFormatResult<()> {
    if grid.shape() != (expected_rows, expected_cols) {
        return Err(MapFormatError::ShapeMismatch {
            block,
            rows: grid.rows(),
            cols: grid.cols(),
            expected_rows,
            expected_cols,
        });
    }
    Ok(())
}
