//! Reader for accretion-disk simulation map snapshots.
//!
//! A snapshot holds two quantities sampled on the same temperature by
//! surface-density grid: the net heating rate `Q+ - Q-` and the optical
//! depth `tau`. This crate parses the text format and derives the
//! logarithmic axes used to plot it.

pub mod axes;
pub mod error;
pub mod grid;
pub mod parser;

pub use axes::{log_space, MapAxes};
pub use error::{MapFormatError, MapFormatResult};
pub use grid::{Extent, Grid, ValueRange};
pub use parser::{map_file_name, map_file_path, MapFile, HEADER_LINES};
