//! Logarithmic coordinate axes derived from the map header.

use crate::error::{MapFormatError, MapFormatResult};
use crate::grid::{Extent, ValueRange};
use crate::parser::MapFile;

/// `n` points evenly spaced in log10 between `start` and `stop`, inclusive.
///
/// Both bounds must be positive and finite. The sequence runs from `start`
/// to `stop` in that order, so `start > stop` gives a descending axis.
/// A single point yields `[start]`.
pub fn log_space(start: f64, stop: f64, n: usize) -> MapFormatResult<Vec<f64>> {
    check_bound(start, "start")?;
    check_bound(stop, "stop")?;

    let (log_start, log_stop) = (start.log10(), stop.log10());
    let values = match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (log_stop - log_start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    // pin the endpoints so they match the header exactly
                    if i == 0 {
                        start
                    } else if i == n - 1 {
                        stop
                    } else {
                        10f64.powf(log_start + step * i as f64)
                    }
                })
                .collect()
        }
    };
    Ok(values)
}

fn check_bound(value: f64, what: &'static str) -> MapFormatResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MapFormatError::NonPositiveBound { what, value })
    }
}

/// Sample coordinates of a map's grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MapAxes {
    /// Surface density per column, from `density_range.low` to `.high`
    pub density: Vec<f64>,
    /// Temperature per row, from `temperature_range.high` down to `.low`
    pub temperature: Vec<f64>,
    pub extent: Extent,
}

impl MapAxes {
    pub fn new(
        density_range: ValueRange,
        density_count: usize,
        temperature_range: ValueRange,
        temperature_count: usize,
    ) -> MapFormatResult<Self> {
        let density = log_space(density_range.low, density_range.high, density_count).map_err(
            |e| rename_bound(e, "surface density"),
        )?;
        let temperature = log_space(
            temperature_range.high,
            temperature_range.low,
            temperature_count,
        )
        .map_err(|e| rename_bound(e, "temperature"))?;

        Ok(Self {
            density,
            temperature,
            extent: Extent::new(density_range, temperature_range),
        })
    }

    /// Axes matching the header of a parsed map file.
    pub fn from_map(map: &MapFile) -> MapFormatResult<Self> {
        Self::new(
            map.density_range,
            map.density_count,
            map.temperature_range,
            map.temperature_count,
        )
    }
}

fn rename_bound(err: MapFormatError, what: &'static str) -> MapFormatError {
    match err {
        MapFormatError::NonPositiveBound { value, .. } => {
            MapFormatError::NonPositiveBound { what, value }
        }
        other => other,
    }
}
