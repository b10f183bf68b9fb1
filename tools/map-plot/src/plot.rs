//! Building and writing the heating-rate and optical-depth figures.

use anyhow::{Context, Result};
use map_format::{Grid, MapAxes, MapFile};
use renderer::{
    render_figure, ContourConfig, ContourLevel, ContourOverlay, Figure, FigureSpec, FigureStyle,
    SymLogNorm,
};
use tracing::{debug, info};

use crate::config::{OutputPaths, PlotConfig};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];
const MAGENTA: [u8; 4] = [255, 0, 255, 255];

/// Heating rate contour where net heating changes sign
const HEATING_LEVELS: [(f64, [u8; 4]); 1] = [(0.0, WHITE)];

/// Optical depth contours
const TAU_LEVELS: [(f64, [u8; 4]); 2] = [(0.06, RED), (1.0, MAGENTA)];

/// Both figures of one snapshot
#[derive(Debug, Clone)]
pub struct RenderedMap {
    pub heating: Figure,
    pub optical_depth: Figure,
}

fn contour_config(levels: &[(f64, [u8; 4])]) -> ContourConfig {
    ContourConfig::with_levels(
        levels
            .iter()
            .map(|&(value, color)| ContourLevel::new(value, color))
            .collect(),
    )
}

/// Heating and optical-depth contours, shared by both figures.
fn overlays<'a>(map: &'a MapFile, axes: &'a MapAxes) -> Vec<ContourOverlay<'a>> {
    vec![
        ContourOverlay {
            grid: &map.heating,
            x_coords: &axes.density,
            y_coords: &axes.temperature,
            config: contour_config(&HEATING_LEVELS),
        },
        ContourOverlay {
            grid: &map.optical_depth,
            x_coords: &axes.density,
            y_coords: &axes.temperature,
            config: contour_config(&TAU_LEVELS),
        },
    ]
}

fn figure_spec<'a>(
    title: &str,
    image: &'a Grid,
    linthresh: f64,
    map: &'a MapFile,
    axes: &'a MapAxes,
) -> FigureSpec<'a> {
    FigureSpec {
        title: title.to_string(),
        x_label: "Sigma".to_string(),
        y_label: "T".to_string(),
        image,
        extent: axes.extent,
        norm: SymLogNorm::autoscale(linthresh, image.values()),
        overlays: overlays(map, axes),
    }
}

/// Render both figures of a parsed map.
pub fn render_map(map: &MapFile, config: &PlotConfig) -> Result<RenderedMap> {
    let axes = MapAxes::from_map(map).context("Failed to build map axes")?;
    let style = FigureStyle::with_size(config.width, config.height);

    let heating_spec = figure_spec(
        "Q+ - Q-",
        &map.heating,
        config.heating_linthresh,
        map,
        &axes,
    );
    debug!(
        vmin = heating_spec.norm.vmin,
        vmax = heating_spec.norm.vmax,
        linthresh = heating_spec.norm.linthresh,
        "Heating norm"
    );
    let heating = render_figure(&heating_spec, &style).context("Failed to render heating figure")?;

    let tau_spec = figure_spec("tau", &map.optical_depth, config.tau_linthresh, map, &axes);
    debug!(
        vmin = tau_spec.norm.vmin,
        vmax = tau_spec.norm.vmax,
        linthresh = tau_spec.norm.linthresh,
        "Optical depth norm"
    );
    let optical_depth =
        render_figure(&tau_spec, &style).context("Failed to render optical depth figure")?;

    Ok(RenderedMap {
        heating,
        optical_depth,
    })
}

/// Read the configured map file and write both figures.
pub fn run(config: &PlotConfig) -> Result<OutputPaths> {
    let input = config.input_path();
    info!(path = %input.display(), "Reading map file");

    let map = MapFile::from_path(&input)
        .with_context(|| format!("Failed to load map file {}", input.display()))?;
    info!(
        temperature_count = map.temperature_count,
        density_count = map.density_count,
        "Loaded map"
    );

    let rendered = render_map(&map, config)?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let paths = config.output_paths();
    rendered
        .heating
        .save(&paths.heating)
        .context("Failed to write heating figure")?;
    rendered
        .optical_depth
        .save(&paths.optical_depth)
        .context("Failed to write optical depth figure")?;

    info!(
        heating = %paths.heating.display(),
        optical_depth = %paths.optical_depth.display(),
        "Wrote figures"
    );
    Ok(paths)
}
