//! Gradient/heatmap rendering for map grids.

use map_format::Grid;
use rayon::prelude::*;

use crate::norm::SymLogNorm;

/// Minimum output rows before heatmap filling is split across threads
const PARALLEL_ROWS: usize = 256;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Viridis colour map sampled at eleven evenly spaced stops.
const VIRIDIS: [Color; 11] = [
    Color::rgb(68, 1, 84),
    Color::rgb(72, 36, 117),
    Color::rgb(65, 68, 135),
    Color::rgb(53, 95, 141),
    Color::rgb(42, 120, 142),
    Color::rgb(33, 145, 140),
    Color::rgb(34, 168, 132),
    Color::rgb(68, 191, 112),
    Color::rgb(122, 209, 81),
    Color::rgb(189, 223, 38),
    Color::rgb(253, 231, 37),
];

/// Viridis colour for a normalized value in `[0, 1]`.
///
/// Values outside the range are clamped.
pub fn viridis(t: f64) -> Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    interpolate_color(VIRIDIS[idx], VIRIDIS[idx + 1], (scaled - idx as f64) as f32)
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// Render a grid as a heatmap of `width` x `height` pixels.
///
/// Each grid cell covers an equal block of pixels with no interpolation
/// between cells. Row 0 of the grid lands at the top of the image.
/// Non-finite cells are left transparent.
///
/// # Returns
/// RGBA pixel data (4 bytes per pixel)
pub fn render_grid<F>(grid: &Grid, width: usize, height: usize, color_fn: F) -> Vec<u8>
where
    F: Fn(f64) -> Option<Color> + Sync,
{
    let mut pixels = vec![0u8; width * height * 4];
    if grid.is_empty() || width == 0 || height == 0 {
        return pixels;
    }

    let (rows, cols) = grid.shape();
    // Column lookup is the same for every output row
    let col_for_x: Vec<usize> = (0..width).map(|x| (x * cols / width).min(cols - 1)).collect();

    let fill_row = |(y, out): (usize, &mut [u8])| {
        let row = (y * rows / height).min(rows - 1);
        let Some(values) = grid.row(row) else { return };
        for (x, pixel) in out.chunks_exact_mut(4).enumerate() {
            let color = color_fn(values[col_for_x[x]]).unwrap_or(Color::transparent());
            pixel.copy_from_slice(&color.to_array());
        }
    };

    if height >= PARALLEL_ROWS {
        pixels.par_chunks_mut(width * 4).enumerate().for_each(fill_row);
    } else {
        pixels.chunks_mut(width * 4).enumerate().for_each(fill_row);
    }

    pixels
}

/// Render a grid with a symmetric-log norm and the viridis colour map.
pub fn render_symlog(grid: &Grid, width: usize, height: usize, norm: &SymLogNorm) -> Vec<u8> {
    render_grid(grid, width, height, |value| norm.normalize(value).map(viridis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(viridis(0.0), Color::rgb(68, 1, 84));
        assert_eq!(viridis(1.0), Color::rgb(253, 231, 37));
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
    }

    #[test]
    fn test_viridis_hits_stops() {
        assert_eq!(viridis(0.5), Color::rgb(33, 145, 140));
    }

    #[test]
    fn test_interpolate_color_midpoint() {
        let c = interpolate_color(Color::rgb(0, 0, 0), Color::rgb(200, 100, 50), 0.5);
        assert_eq!(c, Color::rgb(100, 50, 25));
    }
}
