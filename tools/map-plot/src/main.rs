//! map-plot
//!
//! Renders the heating-rate and optical-depth maps of one simulation
//! snapshot to PNG files.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use map_plot::config::{DEFAULT_HEATING_LINTHRESH, DEFAULT_TAU_LINTHRESH};
use map_plot::PlotConfig;

/// Plot data from the output of the black hole accretion simulation
#[derive(Parser, Debug)]
#[command(name = "map-plot")]
#[command(about = "Plot heating rate and optical depth maps from simulation output")]
struct Args {
    /// Index of the map to plot
    #[arg(long, default_value_t = 1)]
    index: u32,

    /// Directory containing the map files
    #[arg(long, default_value = "maps", env = "MAP_DIR")]
    map_dir: PathBuf,

    /// Directory the figures are written to
    #[arg(long, default_value = ".", env = "MAP_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Figure width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Linear threshold of the heating rate colour scale
    #[arg(long, default_value_t = DEFAULT_HEATING_LINTHRESH)]
    heating_linthresh: f64,

    /// Linear threshold of the optical depth colour scale
    #[arg(long, default_value_t = DEFAULT_TAU_LINTHRESH)]
    tau_linthresh: f64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for PlotConfig {
    fn from(args: Args) -> Self {
        Self {
            index: args.index,
            map_dir: args.map_dir,
            output_dir: args.output_dir,
            width: args.width,
            height: args.height,
            heating_linthresh: args.heating_linthresh,
            tau_linthresh: args.tau_linthresh,
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();

    let config = PlotConfig::from(args);
    info!(index = config.index, map_dir = %config.map_dir.display(), "Starting map-plot");

    if let Err(e) = map_plot::run(&config) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
