//! Figure composition.
//!
//! A figure is a heatmap of one grid on log-scaled axes with contour
//! overlays, a frame with decade ticks and a colour bar on the right:
//!
//! ```text
//! +-----------------------------------------+
//! |          margin_top                     |
//! |       +---------------------+   +--+    |
//! |  1e8 -|                     |   |  |- 1e15
//! |       |  heatmap + contours |   |  |- 0
//! |  1e4 -|                     |   |  |- -1e15
//! |       +---------------------+   +--+    |
//! |        1     1e2    1e4                 |
//! +-----------------------------------------+
//! ```

use std::path::Path;

use map_format::{Extent, Grid};
use tiny_skia::{
    IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};
use tracing::debug;

use crate::contour::{self, ContourConfig, LabelBounds, Point};
use crate::error::{RenderError, RenderResult};
use crate::gradient::{render_symlog, viridis, Color};
use crate::norm::SymLogNorm;
use crate::png;
use crate::text::{self, Anchor, TextStyle};

/// Maximum decade ticks on an axis before thinning
const MAX_AXIS_TICKS: usize = 8;

/// Layout and colours of a figure
#[derive(Debug, Clone)]
pub struct FigureStyle {
    pub width: u32,
    pub height: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub colorbar_width: u32,
    pub colorbar_gap: u32,
    pub background: [u8; 4],
    pub frame_color: [u8; 4],
    pub font_size: f32,
    pub tick_length: f32,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margin_left: 80,
            margin_right: 120,
            margin_top: 30,
            margin_bottom: 50,
            colorbar_width: 18,
            colorbar_gap: 16,
            background: [255, 255, 255, 255],
            frame_color: [0, 0, 0, 255],
            font_size: 11.0,
            tick_length: 5.0,
        }
    }
}

impl FigureStyle {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

/// Contour lines of a grid sampled at the given coordinates
#[derive(Debug, Clone)]
pub struct ContourOverlay<'a> {
    pub grid: &'a Grid,
    /// Coordinate of each column
    pub x_coords: &'a [f64],
    /// Coordinate of each row
    pub y_coords: &'a [f64],
    pub config: ContourConfig,
}

/// Everything needed to draw one figure
#[derive(Debug, Clone)]
pub struct FigureSpec<'a> {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Grid shown as the heatmap
    pub image: &'a Grid,
    /// Data coordinates of the image corners
    pub extent: Extent,
    pub norm: SymLogNorm,
    pub overlays: Vec<ContourOverlay<'a>>,
}

/// A rendered figure with straight (non-premultiplied) RGBA pixels
#[derive(Debug, Clone)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    /// PNG `tEXt` entries as (keyword, value)
    pub metadata: Vec<(String, String)>,
}

impl Figure {
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        let text: Vec<(&str, &str)> = self
            .metadata
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        png::create_png_with_text(
            &self.pixels,
            self.width as usize,
            self.height as usize,
            &text,
        )
    }

    /// Encode as PNG and write to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        let bytes = self.to_png()?;
        std::fs::write(path, &bytes).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote figure");
        Ok(())
    }

    /// Straight RGBA value of a pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let p = self.pixels.get(idx..idx + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// Pixel rectangle of the plot area
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl PlotArea {
    fn from_style(style: &FigureStyle) -> RenderResult<Self> {
        let used_w = style.margin_left + style.margin_right;
        let used_h = style.margin_top + style.margin_bottom;
        if style.width <= used_w + 1 || style.height <= used_h + 1 {
            return Err(RenderError::NoPlotArea {
                width: style.width,
                height: style.height,
            });
        }
        Ok(Self {
            x: style.margin_left,
            y: style.margin_top,
            width: style.width - used_w,
            height: style.height - used_h,
        })
    }

    fn left(&self) -> f32 {
        self.x as f32
    }

    fn top(&self) -> f32 {
        self.y as f32
    }

    fn right(&self) -> f32 {
        (self.x + self.width) as f32
    }

    fn bottom(&self) -> f32 {
        (self.y + self.height) as f32
    }
}

/// Logarithmic mapping from data values to pixel positions.
///
/// `from` lands on `pixel_from` and `to` on `pixel_to`, so an axis can run
/// in either direction on screen.
#[derive(Debug, Clone, Copy)]
struct LogAxis {
    log_from: f64,
    log_to: f64,
    pixel_from: f32,
    pixel_to: f32,
}

impl LogAxis {
    fn new(from: f64, to: f64, pixel_from: f32, pixel_to: f32) -> Self {
        Self {
            log_from: from.log10(),
            log_to: to.log10(),
            pixel_from,
            pixel_to,
        }
    }

    fn to_pixel(&self, value: f64) -> f32 {
        let span = self.log_to - self.log_from;
        let frac = if span == 0.0 {
            0.5
        } else {
            (value.log10() - self.log_from) / span
        };
        self.pixel_from + frac as f32 * (self.pixel_to - self.pixel_from)
    }
}

/// Render a figure.
pub fn render_figure(spec: &FigureSpec<'_>, style: &FigureStyle) -> RenderResult<Figure> {
    validate(spec)?;
    let area = PlotArea::from_style(style)?;

    let mut pixmap = Pixmap::new(style.width, style.height).ok_or(
        RenderError::InvalidDimensions {
            width: style.width,
            height: style.height,
        },
    )?;
    let [r, g, b, a] = style.background;
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

    let x_axis = LogAxis::new(spec.extent.x_min, spec.extent.x_max, area.left(), area.right());
    // Highest temperature at the top, matching grid row 0
    let y_axis = LogAxis::new(spec.extent.y_max, spec.extent.y_min, area.top(), area.bottom());

    // Heatmap
    let heat = render_symlog(
        spec.image,
        area.width as usize,
        area.height as usize,
        &spec.norm,
    );
    blit(&mut pixmap, heat, area.x, area.y, area.width, area.height);

    // Contours
    let bounds = LabelBounds {
        x0: area.left(),
        y0: area.top(),
        x1: area.right(),
        y1: area.bottom(),
    };
    for overlay in &spec.overlays {
        let (rows, cols) = overlay.grid.shape();
        let mut contours =
            contour::generate_all_contours(overlay.grid.values(), cols, rows, &overlay.config);

        for c in &mut contours {
            for p in &mut c.points {
                *p = Point::new(
                    x_axis.to_pixel(interp_log(overlay.x_coords, p.x)),
                    y_axis.to_pixel(interp_log(overlay.y_coords, p.y)),
                );
            }
        }

        debug!(
            levels = overlay.config.levels.len(),
            contours = contours.len(),
            points = contours.iter().map(|c| c.points.len()).sum::<usize>(),
            "Generated contours"
        );
        contour::draw_contours(&mut pixmap, &contours, &overlay.config, bounds);
    }

    draw_frame(&mut pixmap, &area, &x_axis, &y_axis, spec.extent, style);
    draw_colorbar(&mut pixmap, &area, &spec.norm, style);

    let pixels = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    Ok(Figure {
        width: style.width,
        height: style.height,
        pixels,
        metadata: vec![
            ("Title".to_string(), spec.title.clone()),
            ("X-Axis".to_string(), spec.x_label.clone()),
            ("Y-Axis".to_string(), spec.y_label.clone()),
            (
                "Extent".to_string(),
                format!(
                    "{} {} {} {}",
                    spec.extent.x_min, spec.extent.x_max, spec.extent.y_min, spec.extent.y_max
                ),
            ),
        ],
    })
}

fn validate(spec: &FigureSpec<'_>) -> RenderResult<()> {
    if spec.image.is_empty() {
        return Err(RenderError::EmptyGrid {
            rows: spec.image.rows(),
            cols: spec.image.cols(),
        });
    }

    let e = spec.extent;
    for (name, value) in [
        ("x_min", e.x_min),
        ("x_max", e.x_max),
        ("y_min", e.y_min),
        ("y_max", e.y_max),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(RenderError::InvalidCoordinates {
                what: "extent",
                message: format!("{} = {} cannot be shown on a log axis", name, value),
            });
        }
    }

    for overlay in &spec.overlays {
        let (rows, cols) = overlay.grid.shape();
        check_coords("contour x coordinates", overlay.x_coords, cols)?;
        check_coords("contour y coordinates", overlay.y_coords, rows)?;
    }
    Ok(())
}

fn check_coords(what: &'static str, coords: &[f64], expected: usize) -> RenderResult<()> {
    if coords.len() != expected {
        return Err(RenderError::CoordinateMismatch {
            what,
            expected,
            found: coords.len(),
        });
    }
    if let Some(bad) = coords.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
        return Err(RenderError::InvalidCoordinates {
            what,
            message: format!("{} cannot be shown on a log axis", bad),
        });
    }
    Ok(())
}

/// Interpolate a fractional grid index into log-spaced coordinates.
fn interp_log(coords: &[f64], index: f32) -> f64 {
    match coords {
        [] => f64::NAN,
        [only] => *only,
        _ => {
            let max = (coords.len() - 2) as f64;
            let index = index as f64;
            let i = index.floor().clamp(0.0, max);
            let t = index - i;
            let lo = coords[i as usize].log10();
            let hi = coords[i as usize + 1].log10();
            10f64.powf(lo + t * (hi - lo))
        }
    }
}

/// Copy straight RGBA pixels onto the pixmap at (x, y).
///
/// Input alpha is either 0 or 255, so the data is also valid premultiplied.
fn blit(pixmap: &mut Pixmap, rgba: Vec<u8>, x: u32, y: u32, width: u32, height: u32) {
    let Some(size) = IntSize::from_wh(width, height) else {
        return;
    };
    let Some(layer) = Pixmap::from_vec(rgba, size) else {
        return;
    };
    pixmap.draw_pixmap(
        x as i32,
        y as i32,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

fn stroke_paint(color: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = false;
    paint
}

fn stroke_line(pixmap: &mut Pixmap, from: (f32, f32), to: (f32, f32), paint: &Paint) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
}

fn stroke_rect(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, paint: &Paint) {
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        let path = PathBuilder::from_rect(rect);
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
}

/// Powers of ten within `[a, b]` (either order), thinned to a readable
/// count. Falls back to the two bounds when no power of ten is inside.
pub fn decade_ticks(a: f64, b: f64) -> Vec<f64> {
    let (lo, hi) = (a.min(b), a.max(b));
    if !(lo > 0.0 && hi.is_finite()) {
        return Vec::new();
    }

    let first = (lo.log10() - 1e-9).ceil() as i32;
    let last = (hi.log10() + 1e-9).floor() as i32;
    if last < first {
        return if lo == hi { vec![lo] } else { vec![lo, hi] };
    }

    let count = (last - first + 1) as usize;
    let stride = count.div_ceil(MAX_AXIS_TICKS).max(1);
    (first..=last)
        .step_by(stride)
        .map(|k| 10f64.powi(k))
        .collect()
}

fn draw_frame(
    pixmap: &mut Pixmap,
    area: &PlotArea,
    x_axis: &LogAxis,
    y_axis: &LogAxis,
    extent: Extent,
    style: &FigureStyle,
) {
    let paint = stroke_paint(style.frame_color);
    // Half-pixel offset keeps 1px lines crisp
    stroke_rect(
        pixmap,
        area.left() - 0.5,
        area.top() - 0.5,
        area.width as f32 + 1.0,
        area.height as f32 + 1.0,
        &paint,
    );

    let label_style = TextStyle::new(style.font_size, style.frame_color);
    let tick = style.tick_length;

    for value in decade_ticks(extent.x_min, extent.x_max) {
        let x = x_axis.to_pixel(value).round() + 0.5;
        stroke_line(pixmap, (x, area.bottom()), (x, area.bottom() + tick), &paint);
        text::draw_text(
            pixmap,
            x,
            area.bottom() + tick + style.font_size,
            0.0,
            &text::format_value(value),
            Anchor::Center,
            &label_style,
        );
    }

    for value in decade_ticks(extent.y_min, extent.y_max) {
        let y = y_axis.to_pixel(value).round() + 0.5;
        stroke_line(pixmap, (area.left() - tick, y), (area.left(), y), &paint);
        text::draw_text(
            pixmap,
            area.left() - tick - 4.0,
            y,
            0.0,
            &text::format_value(value),
            Anchor::Right,
            &label_style,
        );
    }
}

fn draw_colorbar(pixmap: &mut Pixmap, area: &PlotArea, norm: &SymLogNorm, style: &FigureStyle) {
    let bar_x = area.x + area.width + style.colorbar_gap;
    let bar_w = style.colorbar_width;
    let bar_h = area.height;
    if bar_x + bar_w >= style.width {
        return;
    }

    let denom = (bar_h.max(2) - 1) as f64;
    let mut strip = Vec::with_capacity((bar_w * bar_h * 4) as usize);
    for y in 0..bar_h {
        let color: Color = viridis(1.0 - y as f64 / denom);
        for _ in 0..bar_w {
            strip.extend_from_slice(&color.to_array());
        }
    }
    blit(pixmap, strip, bar_x, area.y, bar_w, bar_h);

    let paint = stroke_paint(style.frame_color);
    stroke_rect(
        pixmap,
        bar_x as f32 - 0.5,
        area.top() - 0.5,
        bar_w as f32 + 1.0,
        bar_h as f32 + 1.0,
        &paint,
    );

    let label_style = TextStyle::new(style.font_size, style.frame_color);
    let right = (bar_x + bar_w) as f32;
    let mut last_label_y: Option<f32> = None;

    // Ticks from the top down so the largest values win collisions
    for value in norm.ticks().into_iter().rev() {
        let Some(t) = norm.normalize(value) else {
            continue;
        };
        let y = (area.top() + (1.0 - t as f32) * denom as f32).round() + 0.5;
        stroke_line(pixmap, (right, y), (right + style.tick_length, y), &paint);

        let clear = last_label_y.map_or(true, |prev| (y - prev).abs() >= style.font_size * 1.4);
        if clear {
            text::draw_text(
                pixmap,
                right + style.tick_length + 3.0,
                y,
                0.0,
                &text::format_value(value),
                Anchor::Left,
                &label_style,
            );
            last_label_y = Some(y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_axis_maps_decades_evenly() {
        let axis = LogAxis::new(1.0, 1000.0, 0.0, 300.0);
        assert!((axis.to_pixel(1.0) - 0.0).abs() < 1e-3);
        assert!((axis.to_pixel(10.0) - 100.0).abs() < 1e-3);
        assert!((axis.to_pixel(1000.0) - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_log_axis_inverted() {
        let axis = LogAxis::new(1e8, 1e4, 10.0, 410.0);
        assert!((axis.to_pixel(1e8) - 10.0).abs() < 1e-3);
        assert!((axis.to_pixel(1e6) - 210.0).abs() < 1e-3);
    }

    #[test]
    fn test_interp_log() {
        let coords = [1.0, 10.0, 100.0];
        assert!((interp_log(&coords, 0.0) - 1.0).abs() < 1e-9);
        assert!((interp_log(&coords, 0.5) - 10f64.sqrt()).abs() < 1e-9);
        assert!((interp_log(&coords, 2.0) - 100.0).abs() < 1e-9);
        assert_eq!(interp_log(&[7.0], 0.3), 7.0);
    }

    #[test]
    fn test_decade_ticks() {
        assert_eq!(decade_ticks(1.0, 1000.0), vec![1.0, 10.0, 100.0, 1000.0]);
        assert_eq!(decade_ticks(1e8, 1e4), vec![1e4, 1e5, 1e6, 1e7, 1e8]);
        assert_eq!(decade_ticks(2.0, 5.0), vec![2.0, 5.0]);
        assert!(decade_ticks(-1.0, 10.0).is_empty());
        assert!(decade_ticks(1e-20, 1e20).len() <= MAX_AXIS_TICKS);
    }

    #[test]
    fn test_plot_area_requires_room() {
        let style = FigureStyle::with_size(100, 60);
        assert!(matches!(
            PlotArea::from_style(&style),
            Err(RenderError::NoPlotArea { .. })
        ));
    }
}
