//! Test data generators for synthetic map grids.
//!
//! These generators create predictable, verifiable grids shaped like the
//! simulation output: a heating rate that changes sign across the map and an
//! optical depth spanning several decades.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `row * 1000 + col`
///
/// # Example
///
/// ```
/// use test_utils::create_test_rows;
///
/// let rows = create_test_rows(3, 2);
/// assert_eq!(rows.len(), 3);
/// assert_eq!(rows[2][1], 2001.0);
/// ```
pub fn create_test_rows(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|row| (0..cols).map(|col| (row * 1000 + col) as f64).collect())
        .collect()
}

/// Creates a heating-rate-like grid.
///
/// Values are negative (net cooling) in the upper-left and positive in the
/// lower-right, crossing zero along the anti-diagonal. Magnitudes reach
/// about `1e15` so that a symmetric-log scale has several decades to show.
pub fn create_heating_rows(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    let x = col as f64 / cols.max(2).saturating_sub(1) as f64;
                    let y = row as f64 / rows.max(2).saturating_sub(1) as f64;
                    let s = x + y - 1.0;
                    s.signum() * 1.0e15 * s.abs().powi(3)
                })
                .collect()
        })
        .collect()
}

/// Creates an optical-depth-like grid.
///
/// Values grow log-linearly from `1e-3` at the top-left to `1e2` at the
/// bottom-right, so the 0.06 and 1 contours both cross the grid.
pub fn create_optical_depth_rows(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    let x = col as f64 / cols.max(2).saturating_sub(1) as f64;
                    let y = row as f64 / rows.max(2).saturating_sub(1) as f64;
                    10f64.powf(-3.0 + 2.5 * (x + y))
                })
                .collect()
        })
        .collect()
}

/// Flatten rows into row-major order.
pub fn flatten_rows(rows: &[Vec<f64>]) -> Vec<f64> {
    rows.iter().flatten().copied().collect()
}
