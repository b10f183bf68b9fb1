//! Grid and range types for map snapshots.

/// A rectangular grid of values in row-major order.
///
/// Rows correspond to temperature samples and columns to surface-density
/// samples. Row 0 is the highest temperature, matching the image layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Create a grid from row-major data.
    ///
    /// Returns `None` if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    /// Build a grid from individual rows, which must all have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let n_rows = rows.len();
        let data = rows.into_iter().flatten().collect();
        Some(Self {
            rows: n_rows,
            cols,
            data,
        })
    }

    /// Caller guarantees `data.len() == rows * cols`.
    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// Number of rows (temperature samples).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (surface-density samples).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Grid shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Borrow a single row.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    /// Iterate over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on zero, and an empty grid has no rows anyway
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Minimum and maximum of the finite values, or `None` if there are none.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

/// A pair of bounds as written in the file header.
///
/// The order is preserved: `low` is the first value on the line and `high`
/// the second, even if the file lists them descending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Whether the range is ascending as written.
    pub fn is_ascending(&self) -> bool {
        self.low < self.high
    }
}

/// Four-corner image extent in data coordinates.
///
/// Surface density runs along x, temperature along y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    pub fn new(density: ValueRange, temperature: ValueRange) -> Self {
        Self {
            x_min: density.low,
            x_max: density.high,
            y_min: temperature.low,
            y_max: temperature.high,
        }
    }
}
