//! Common test fixtures for map file tests.
//!
//! Provides a small literal snapshot and a builder that renders arbitrary
//! grids into the map text format.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// A 2x2 snapshot with increasing integer values in both blocks.
pub const TWO_BY_TWO_MAP: &str = "\
label
2 nb_T
label
2 nb_S
label
1.0 2.0
label
10.0 100.0
# Q^+ - Q^-
1 2
3 4
# tau
5 6
7 8
";

/// Builds map file text from grids and header values.
///
/// Counts default to the shape of the heating grid; override them with
/// [`MapFileBuilder::counts`] to produce a file whose header disagrees with
/// its data.
#[derive(Debug, Clone)]
pub struct MapFileBuilder {
    temperature_range: (f64, f64),
    density_range: (f64, f64),
    counts: Option<(usize, usize)>,
    heating: Vec<Vec<f64>>,
    optical_depth: Vec<Vec<f64>>,
}

impl MapFileBuilder {
    pub fn new(heating: Vec<Vec<f64>>, optical_depth: Vec<Vec<f64>>) -> Self {
        Self {
            temperature_range: (1.0e4, 1.0e8),
            density_range: (1.0, 1.0e4),
            counts: None,
            heating,
            optical_depth,
        }
    }

    pub fn temperature_range(mut self, low: f64, high: f64) -> Self {
        self.temperature_range = (low, high);
        self
    }

    pub fn density_range(mut self, low: f64, high: f64) -> Self {
        self.density_range = (low, high);
        self
    }

    /// Override the header counts as `(temperature, density)`.
    pub fn counts(mut self, temperature: usize, density: usize) -> Self {
        self.counts = Some((temperature, density));
        self
    }

    /// Render the file content.
    pub fn build(&self) -> String {
        let (nb_t, nb_s) = self.counts.unwrap_or_else(|| {
            let rows = self.heating.len();
            let cols = self.heating.first().map(Vec::len).unwrap_or(0);
            (rows, cols)
        });

        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(out, "# number of temperature points");
        let _ = writeln!(out, "{} nb_T", nb_t);
        let _ = writeln!(out, "# number of surface density points");
        let _ = writeln!(out, "{} nb_S", nb_s);
        let _ = writeln!(out, "# temperature range");
        let _ = writeln!(out, "{} {}", self.temperature_range.0, self.temperature_range.1);
        let _ = writeln!(out, "# surface density range");
        let _ = writeln!(out, "{} {}", self.density_range.0, self.density_range.1);

        write_block(&mut out, "Q^+ - Q^-", &self.heating);
        write_block(&mut out, "tau", &self.optical_depth);
        out
    }

    /// Write the file as `map_{index:05}.dat` inside `dir`.
    ///
    /// Panics on I/O failure; this is test support code.
    pub fn write_to(&self, dir: &Path, index: u32) -> PathBuf {
        write_map_file(dir, index, &self.build())
    }
}

fn write_block(out: &mut String, title: &str, rows: &[Vec<f64>]) {
    let _ = writeln!(out, "# {}", title);
    for row in rows {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }
}

/// Write raw map content as `map_{index:05}.dat` inside `dir`.
pub fn write_map_file(dir: &Path, index: u32, content: &str) -> PathBuf {
    let path = dir.join(format!("map_{:05}.dat", index));
    fs::write(&path, content)
        .unwrap_or_else(|e| panic!("failed to write {}: {}", path.display(), e));
    path
}
