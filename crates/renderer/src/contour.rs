//! Contour line (isoline) rendering using marching squares algorithm.
//!
//! Contours are extracted in grid coordinates (x = column, y = row), mapped
//! into pixel space by the caller, then stroked with inline labels.

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::text::{self, Anchor, TextStyle};

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A line segment between two points
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A complete contour line (polyline)
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f64,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// One contour level and its line colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourLevel {
    pub value: f64,
    pub color: [u8; 4],
}

impl ContourLevel {
    pub fn new(value: f64, color: [u8; 4]) -> Self {
        Self { value, color }
    }
}

/// Configuration for contour rendering
#[derive(Debug, Clone)]
pub struct ContourConfig {
    /// Contour levels to draw
    pub levels: Vec<ContourLevel>,
    /// Line width in pixels
    pub line_width: f32,
    /// Number of smoothing passes (0 = no smoothing)
    pub smoothing_passes: u32,
    /// Whether to draw labels on contour lines
    pub labels_enabled: bool,
    /// Font size for labels
    pub label_font_size: f32,
    /// Minimum spacing between labels (in pixels)
    pub label_spacing: f32,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            levels: vec![],
            line_width: 1.5,
            smoothing_passes: 1,
            labels_enabled: true,
            label_font_size: 10.0,
            label_spacing: 150.0,
        }
    }
}

impl ContourConfig {
    pub fn with_levels(levels: Vec<ContourLevel>) -> Self {
        Self {
            levels,
            ..Default::default()
        }
    }

    /// Line colour for a level, black if the level is not configured
    pub fn get_level_color(&self, level: f64) -> [u8; 4] {
        self.levels
            .iter()
            .find(|l| l.value == level)
            .map(|l| l.color)
            .unwrap_or([0, 0, 0, 255])
    }

    pub fn get_level_label(&self, level: f64) -> String {
        text::format_value(level)
    }
}

/// Marching squares algorithm to generate contour segments
///
/// # Arguments
/// * `data` - Grid data in row-major order
/// * `width` - Grid width
/// * `height` - Grid height
/// * `level` - Contour level to extract
///
/// # Returns
/// Line segments in grid coordinates
pub fn march_squares(data: &[f64], width: usize, height: usize, level: f64) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            if !(tl.is_finite() && tr.is_finite() && bl.is_finite() && br.is_finite()) {
                continue;
            }

            // Cell index (0-15) from which corners are at or above the level
            let mut cell_index = 0;
            if tl >= level {
                cell_index |= 1;
            }
            if tr >= level {
                cell_index |= 2;
            }
            if br >= level {
                cell_index |= 4;
            }
            if bl >= level {
                cell_index |= 8;
            }

            segments.extend(get_cell_segments(
                cell_index,
                x as f32,
                y as f32,
                [tl, tr, br, bl],
                level,
            ));
        }
    }

    segments
}

/// Get line segments for a marching squares cell
///
/// Corners are ordered top-left, top-right, bottom-right, bottom-left.
fn get_cell_segments(
    cell_index: u8,
    x: f32,
    y: f32,
    corners: [f64; 4],
    level: f64,
) -> Vec<Segment> {
    let [tl, tr, br, bl] = corners;
    let top = interpolate_edge((x, y), (x + 1.0, y), tl, tr, level);
    let right = interpolate_edge((x + 1.0, y), (x + 1.0, y + 1.0), tr, br, level);
    let bottom = interpolate_edge((x, y + 1.0), (x + 1.0, y + 1.0), bl, br, level);
    let left = interpolate_edge((x, y), (x, y + 1.0), tl, bl, level);

    let seg = |start, end| Segment { start, end };
    match cell_index {
        0 | 15 => vec![],
        1 | 14 => vec![seg(left, top)],
        2 | 13 => vec![seg(top, right)],
        3 | 12 => vec![seg(left, right)],
        4 | 11 => vec![seg(right, bottom)],
        // Saddles: resolve by the cell centre value
        5 => {
            if (tl + tr + br + bl) / 4.0 >= level {
                vec![seg(left, bottom), seg(top, right)]
            } else {
                vec![seg(left, top), seg(right, bottom)]
            }
        }
        6 | 9 => vec![seg(top, bottom)],
        7 | 8 => vec![seg(left, bottom)],
        10 => {
            if (tl + tr + br + bl) / 4.0 >= level {
                vec![seg(left, top), seg(right, bottom)]
            } else {
                vec![seg(top, right), seg(left, bottom)]
            }
        }
        _ => vec![],
    }
}

/// Linearly interpolate along a cell edge to where it crosses `level`
fn interpolate_edge(p1: (f32, f32), p2: (f32, f32), val1: f64, val2: f64, level: f64) -> Point {
    let diff = val2 - val1;
    if diff == 0.0 {
        return Point::new((p1.0 + p2.0) / 2.0, (p1.1 + p2.1) / 2.0);
    }

    // Computed in f64: heating rates reach 1e15 and lose precision in f32
    let t = ((level - val1) / diff).clamp(0.0, 1.0) as f32;
    Point::new(p1.0 + t * (p2.0 - p1.0), p1.1 + t * (p2.1 - p1.1))
}

/// Connect line segments into continuous polylines
///
/// Grows each polyline from both ends until no unused segment touches it.
pub fn connect_segments(segments: Vec<Segment>) -> Vec<Contour> {
    if segments.is_empty() {
        return vec![];
    }

    let mut contours = Vec::new();
    let mut used = vec![false; segments.len()];
    let epsilon = 0.001;

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }

        let mut points = std::collections::VecDeque::from([
            segments[start_idx].start,
            segments[start_idx].end,
        ]);
        used[start_idx] = true;

        let mut changed = true;
        while changed {
            changed = false;
            let (Some(&head), Some(&tail)) = (points.front(), points.back()) else {
                break;
            };

            for (i, seg) in segments.iter().enumerate() {
                if used[i] {
                    continue;
                }

                if seg.start.distance(&tail) < epsilon {
                    points.push_back(seg.end);
                } else if seg.end.distance(&tail) < epsilon {
                    points.push_back(seg.start);
                } else if seg.end.distance(&head) < epsilon {
                    points.push_front(seg.start);
                } else if seg.start.distance(&head) < epsilon {
                    points.push_front(seg.end);
                } else {
                    continue;
                }
                used[i] = true;
                changed = true;
                break;
            }
        }

        let points: Vec<Point> = points.into();
        let closed = match (points.first(), points.last()) {
            (Some(first), Some(last)) => points.len() > 2 && first.distance(last) < epsilon,
            _ => false,
        };

        if points.len() >= 2 {
            contours.push(Contour {
                level: 0.0, // Level will be set by caller
                points,
                closed,
            });
        }
    }

    contours
}

/// Apply Chaikin's corner cutting algorithm for smoothing
pub fn smooth_contour(contour: &Contour, iterations: u32) -> Contour {
    if iterations == 0 || contour.points.len() < 3 {
        return contour.clone();
    }

    let mut points = contour.points.clone();

    for _ in 0..iterations {
        let mut new_points = Vec::with_capacity(points.len() * 2 + 2);
        let n = points.len();
        let pairs = if contour.closed { n } else { n - 1 };

        if !contour.closed {
            new_points.push(points[0]);
        }
        for i in 0..pairs {
            let p1 = points[i];
            let p2 = points[(i + 1) % n];
            new_points.push(Point::new(0.75 * p1.x + 0.25 * p2.x, 0.75 * p1.y + 0.25 * p2.y));
            new_points.push(Point::new(0.25 * p1.x + 0.75 * p2.x, 0.25 * p1.y + 0.75 * p2.y));
        }
        if !contour.closed {
            new_points.push(points[n - 1]);
        }

        points = new_points;
    }

    Contour {
        level: contour.level,
        points,
        closed: contour.closed,
    }
}

/// Generate all contours for the configured levels, in grid coordinates
pub fn generate_all_contours(
    data: &[f64],
    width: usize,
    height: usize,
    config: &ContourConfig,
) -> Vec<Contour> {
    let mut all_contours = Vec::new();

    for level in &config.levels {
        let segments = march_squares(data, width, height, level.value);
        let mut contours = connect_segments(segments);
        for contour in &mut contours {
            contour.level = level.value;
        }
        all_contours.extend(contours);
    }

    all_contours
}

/// Pixel rectangle that labels must stay inside
#[derive(Debug, Clone, Copy)]
pub struct LabelBounds {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Stroke contours (already in pixel coordinates) onto a pixmap and
/// place inline labels.
pub fn draw_contours(
    pixmap: &mut Pixmap,
    contours: &[Contour],
    config: &ContourConfig,
    bounds: LabelBounds,
) {
    let mut label_positions: Vec<LabelPosition> = Vec::new();

    for contour in contours {
        if contour.points.len() < 2 {
            continue;
        }

        let contour = smooth_contour(contour, config.smoothing_passes);
        let [r, g, b, a] = config.get_level_color(contour.level);

        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: config.line_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        let mut pb = PathBuilder::new();
        pb.move_to(contour.points[0].x, contour.points[0].y);
        for point in &contour.points[1..] {
            pb.line_to(point.x, point.y);
        }
        if contour.closed {
            pb.close();
        }

        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }

        if config.labels_enabled {
            collect_label_positions(&contour, config, &mut label_positions, bounds);
        }
    }

    // Labels go on top of every line
    for pos in &label_positions {
        let style = TextStyle::new(config.label_font_size, config.get_level_color(pos.level))
            .with_background();
        text::draw_text(pixmap, pos.x, pos.y, pos.angle, &pos.text, Anchor::Center, &style);
    }
}

/// Position and metadata for a contour label
#[derive(Debug, Clone)]
struct LabelPosition {
    x: f32,
    y: f32,
    angle: f32,
    text: String,
    level: f64,
}

fn contour_length(contour: &Contour) -> f32 {
    contour
        .points
        .windows(2)
        .map(|w| w[0].distance(&w[1]))
        .sum()
}

/// Collect label positions evenly spaced along a contour line
fn collect_label_positions(
    contour: &Contour,
    config: &ContourConfig,
    positions: &mut Vec<LabelPosition>,
    bounds: LabelBounds,
) {
    let total_length = contour_length(contour);
    if total_length < config.label_spacing * 0.5 {
        return;
    }

    let label_text = config.get_level_label(contour.level);
    let margin = config.label_font_size * 1.5;
    let num_labels = ((total_length / config.label_spacing).floor() as usize).max(1);
    let spacing = total_length / (num_labels as f32 + 1.0);

    let mut accumulated_length = 0.0;
    let mut next_label_at = spacing;
    let mut label_count = 0;

    for pair in contour.points.windows(2) {
        if label_count >= num_labels {
            break;
        }

        let (p1, p2) = (pair[0], pair[1]);
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        let segment_length = (dx * dx + dy * dy).sqrt();
        if segment_length == 0.0 {
            continue;
        }

        while accumulated_length + segment_length >= next_label_at && label_count < num_labels {
            let t = (next_label_at - accumulated_length) / segment_length;
            let x = p1.x + t * dx;
            let y = p1.y + t * dy;

            let inside = x > bounds.x0 + margin
                && x < bounds.x1 - margin
                && y > bounds.y0 + margin
                && y < bounds.y1 - margin;

            if inside {
                // Keep text upright
                let angle = dy.atan2(dx);
                let angle = if angle.abs() > std::f32::consts::FRAC_PI_2 {
                    angle + std::f32::consts::PI
                } else {
                    angle
                };

                let min_distance = config.label_font_size * 4.0;
                let has_overlap = positions.iter().any(|pos| {
                    (pos.x - x).powi(2) + (pos.y - y).powi(2) < min_distance * min_distance
                });

                if !has_overlap {
                    positions.push(LabelPosition {
                        x,
                        y,
                        angle,
                        text: label_text.clone(),
                        level: contour.level,
                    });
                }
            }

            next_label_at += spacing;
            label_count += 1;
        }

        accumulated_length += segment_length;
    }
}
