//! Figure rendering for accretion-disk maps.
//!
//! Implements the pieces of a map figure:
//! - Symmetric-log colour normalization
//! - Viridis heatmaps
//! - Contour lines (marching squares) with inline labels
//! - Log-scaled axes and a colour bar
//! - PNG encoding with text metadata

pub mod contour;
pub mod error;
pub mod figure;
pub mod gradient;
pub mod norm;
pub mod png;
pub mod text;

pub use contour::{ContourConfig, ContourLevel};
pub use error::{RenderError, RenderResult};
pub use figure::{render_figure, ContourOverlay, Figure, FigureSpec, FigureStyle};
pub use gradient::{viridis, Color};
pub use norm::SymLogNorm;
