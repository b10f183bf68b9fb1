//! Figure generation for accretion-disk map snapshots.
//!
//! Reads `map_NNNNN.dat` from a map directory and writes two PNG figures:
//! the net heating rate and the optical depth, each with the heating zero
//! contour and the optical-depth 0.06 and 1 contours overlaid.

pub mod config;
pub mod plot;

pub use config::{OutputPaths, PlotConfig};
pub use plot::{render_map, run, RenderedMap};
