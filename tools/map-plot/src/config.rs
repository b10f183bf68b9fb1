//! Run configuration for map plotting.

use std::path::PathBuf;

use map_format::map_file_path;

/// Default symmetric-log linear threshold for the heating rate
pub const DEFAULT_HEATING_LINTHRESH: f64 = 5.0e13;

/// Default symmetric-log linear threshold for the optical depth
pub const DEFAULT_TAU_LINTHRESH: f64 = 1.0e-5;

/// Everything a plotting run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Snapshot index, formatted as five zero-padded digits in file names
    pub index: u32,
    pub map_dir: PathBuf,
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub heating_linthresh: f64,
    pub tau_linthresh: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            index: 1,
            map_dir: PathBuf::from("maps"),
            output_dir: PathBuf::from("."),
            width: 800,
            height: 600,
            heating_linthresh: DEFAULT_HEATING_LINTHRESH,
            tau_linthresh: DEFAULT_TAU_LINTHRESH,
        }
    }
}

/// Where the two figures of a run are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub heating: PathBuf,
    pub optical_depth: PathBuf,
}

impl PlotConfig {
    /// Path of the map file to read.
    pub fn input_path(&self) -> PathBuf {
        map_file_path(&self.map_dir, self.index)
    }

    pub fn output_paths(&self) -> OutputPaths {
        let stem = format!("map_{:05}", self.index);
        OutputPaths {
            heating: self.output_dir.join(format!("{}_heating.png", stem)),
            optical_depth: self.output_dir.join(format!("{}_optical_depth.png", stem)),
        }
    }
}
