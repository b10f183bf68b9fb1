//! Segment-style glyph rendering for numeric labels.
//!
//! Labels on these figures are numbers only (contour levels and tick values
//! such as `-1e13` or `0.06`), so glyphs are drawn as short strokes rather
//! than from a font file. Supported characters: digits, `-`, `+`, `.`, `e`.

use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Horizontal anchoring of a label relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
    Right,
}

/// Text appearance
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: [u8; 4],
    /// Draw a translucent white box behind the text
    pub background: bool,
}

impl TextStyle {
    pub fn new(font_size: f32, color: [u8; 4]) -> Self {
        Self {
            font_size,
            color,
            background: false,
        }
    }

    pub fn with_background(mut self) -> Self {
        self.background = true;
        self
    }
}

/// Width of `text` in pixels at the given font size.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let (char_width, char_spacing) = char_metrics(font_size);
    let n = text.chars().count() as f32;
    if n == 0.0 {
        return 0.0;
    }
    n * (char_width + char_spacing) - char_spacing
}

fn char_metrics(font_size: f32) -> (f32, f32) {
    (font_size * 0.6, font_size * 0.15)
}

/// Draw a label centred vertically on `y` and rotated by `angle` radians
/// around its anchor point.
pub fn draw_text(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    angle: f32,
    text: &str,
    anchor: Anchor,
    style: &TextStyle,
) {
    let font_size = style.font_size;
    let (char_width, char_spacing) = char_metrics(font_size);
    let width = text_width(text, font_size);

    // Offset of the text's centre from the anchor, along the baseline
    let shift = match anchor {
        Anchor::Left => width / 2.0,
        Anchor::Center => 0.0,
        Anchor::Right => -width / 2.0,
    };

    let cos_a = angle.cos();
    let sin_a = angle.sin();
    let rotate = |px: f32, py: f32| -> (f32, f32) {
        (px * cos_a - py * sin_a + x, px * sin_a + py * cos_a + y)
    };

    if style.background {
        let pad = font_size * 0.2;
        let half_w = width / 2.0 + pad;
        let half_h = font_size / 2.0 + pad;
        let corners = [
            (shift - half_w, -half_h),
            (shift + half_w, -half_h),
            (shift + half_w, half_h),
            (shift - half_w, half_h),
        ];

        let mut pb = PathBuilder::new();
        for (i, (cx, cy)) in corners.iter().enumerate() {
            let (rx, ry) = rotate(*cx, *cy);
            if i == 0 {
                pb.move_to(rx, ry);
            } else {
                pb.line_to(rx, ry);
            }
        }
        pb.close();

        let mut bg_paint = Paint::default();
        bg_paint.set_color_rgba8(255, 255, 255, 220);
        bg_paint.anti_alias = true;
        if let Some(path) = pb.finish() {
            pixmap.fill_path(&path, &bg_paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    let mut paint = Paint::default();
    let [r, g, b, a] = style.color;
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    let start_x = shift - width / 2.0;
    for (i, ch) in text.chars().enumerate() {
        let cx = start_x + i as f32 * (char_width + char_spacing) + char_width / 2.0;
        let (rx, ry) = rotate(cx, 0.0);
        draw_character(pixmap, rx, ry, angle, ch, char_width, font_size, &paint);
    }
}

/// Stroke segments (in glyph-local coordinates) for a character.
///
/// Coordinates are relative to the glyph centre with `hw`/`hh` the half
/// width and half height.
fn glyph_segments(ch: char, hw: f32, hh: f32) -> Vec<((f32, f32), (f32, f32))> {
    let top = ((-hw, -hh), (hw, -hh));
    let mid = ((-hw, 0.0), (hw, 0.0));
    let bottom = ((-hw, hh), (hw, hh));
    let upper_left = ((-hw, -hh), (-hw, 0.0));
    let lower_left = ((-hw, 0.0), (-hw, hh));
    let upper_right = ((hw, -hh), (hw, 0.0));
    let lower_right = ((hw, 0.0), (hw, hh));

    match ch {
        '0' => vec![top, upper_right, lower_right, bottom, lower_left, upper_left],
        '1' => vec![((0.0, -hh), (0.0, hh))],
        '2' => vec![top, upper_right, mid, lower_left, bottom],
        '3' => vec![top, upper_right, lower_right, bottom, mid],
        '4' => vec![upper_left, mid, upper_right, lower_right],
        '5' => vec![top, upper_left, mid, lower_right, bottom],
        '6' => vec![top, upper_left, lower_left, bottom, lower_right, mid],
        '7' => vec![top, ((hw, -hh), (0.0, hh))],
        '8' => vec![top, upper_right, lower_right, bottom, lower_left, upper_left, mid],
        '9' => vec![mid, upper_left, top, upper_right, lower_right],
        '-' => vec![mid],
        '+' => vec![mid, ((0.0, -hh * 0.6), (0.0, hh * 0.6))],
        '.' => vec![((0.0, hh * 0.7), (0.0, hh * 0.8))],
        // Lower-case e sits in the bottom half of the cell
        'e' => vec![
            ((-hw, hh * 0.4), (hw, hh * 0.4)),
            ((hw, hh * 0.4), (hw, 0.0)),
            ((hw, 0.0), (-hw, 0.0)),
            lower_left,
            bottom,
        ],
        _ => vec![],
    }
}

/// Draw a single character as simple geometric shapes
#[allow(clippy::too_many_arguments)]
fn draw_character(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    angle: f32,
    ch: char,
    width: f32,
    height: f32,
    paint: &Paint,
) {
    let cos_a = angle.cos();
    let sin_a = angle.sin();
    let rotate = |px: f32, py: f32| -> (f32, f32) {
        (px * cos_a - py * sin_a + x, px * sin_a + py * cos_a + y)
    };

    let stroke = Stroke {
        width: (width * 0.18).max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    for ((x1, y1), (x2, y2)) in glyph_segments(ch, width / 2.0, height / 2.0) {
        let (rx1, ry1) = rotate(x1, y1);
        let (rx2, ry2) = rotate(x2, y2);

        let mut pb = PathBuilder::new();
        pb.move_to(rx1, ry1);
        pb.line_to(rx2, ry2);

        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
        }
    }
}

/// Format a tick or level value for display with the supported glyphs.
///
/// Values between 1e-3 and 1e4 in magnitude use plain decimal notation
/// (`0.06`, `1`, `250`); everything else uses scientific notation with a
/// lower-case exponent marker (`5e13`, `-1e-5`).
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let abs = value.abs();
    if (1e-3..1e4).contains(&abs) {
        // Round away float noise such as 0.060000000000000005
        let rounded = format!("{:.6}", value);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        trimmed.to_string()
    } else {
        format!("{:e}", value)
    }
}
