//! Tests for contour extraction and drawing.

use renderer::contour::{
    connect_segments, draw_contours, generate_all_contours, march_squares, smooth_contour,
    Contour, ContourConfig, ContourLevel, LabelBounds, Point, Segment,
};
use test_utils::{create_heating_rows, create_optical_depth_rows, flatten_rows};
use tiny_skia::Pixmap;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];
const MAGENTA: [u8; 4] = [255, 0, 255, 255];

// ============================================================================
// march_squares tests
// ============================================================================

#[test]
fn test_march_squares_degenerate_input() {
    assert!(march_squares(&[1.0], 1, 1, 0.5).is_empty());
    assert!(march_squares(&[], 0, 0, 0.5).is_empty());
    assert!(march_squares(&[1.0, 2.0], 3, 3, 0.5).is_empty());
    // A single row has no cells
    assert!(march_squares(&[-1.0, 1.0, -1.0], 3, 1, 0.0).is_empty());
}

#[test]
fn test_march_squares_value_at_level_counts_as_above() {
    let data = vec![0.0, 0.0, 0.0, 0.0];
    assert!(march_squares(&data, 2, 2, 0.0).is_empty());
}

#[test]
fn test_march_squares_sign_change_at_zero() {
    // Cooling on the left, heating on the right
    let data = vec![
        -1.0e14, 3.0e14, // row 0
        -1.0e14, 3.0e14, // row 1
    ];
    let segments = march_squares(&data, 2, 2, 0.0);
    assert_eq!(segments.len(), 1);

    let seg = &segments[0];
    assert!((seg.start.x - 0.25).abs() < 1e-4);
    assert!((seg.end.x - 0.25).abs() < 1e-4);
}

#[test]
fn test_march_squares_saddle_uses_cell_centre() {
    // TL and BR above; centre average above, so the high corners connect
    let high_centre = vec![
        10.0, 0.0, // row 0
        0.0, 10.0, // row 1
    ];
    let segments = march_squares(&high_centre, 2, 2, 4.0);
    assert_eq!(segments.len(), 2);
    // Segments cut off the low corners
    let cuts_bottom_left = segments
        .iter()
        .any(|s| s.start.x == 0.0 && s.end.y == 1.0);
    assert!(cuts_bottom_left);

    // Centre average below: the high corners are isolated
    let low_centre = vec![
        10.0, 0.0, // row 0
        0.0, 10.0, // row 1
    ];
    let segments = march_squares(&low_centre, 2, 2, 6.0);
    assert_eq!(segments.len(), 2);
    let cuts_top_left = segments.iter().any(|s| s.start.x == 0.0 && s.end.y == 0.0);
    assert!(cuts_top_left);
}

#[test]
fn test_march_squares_skips_non_finite_cells() {
    #[rustfmt::skip]
    let data = vec![
        f64::NAN, 1.0, 1.0,
        -1.0,     1.0, 1.0,
        -1.0,    -1.0, -1.0,
    ];
    let with_nan = march_squares(&data, 3, 3, 0.0);
    assert!(!with_nan.is_empty());

    let mut finite = data.clone();
    finite[0] = -1.0;
    let without_nan = march_squares(&finite, 3, 3, 0.0);
    assert!(without_nan.len() > with_nan.len());
}

#[test]
fn test_march_squares_segments_stay_inside_grid() {
    let rows = create_optical_depth_rows(12, 9);
    let data = flatten_rows(&rows);
    for level in [0.06, 1.0] {
        let segments = march_squares(&data, 9, 12, level);
        assert!(!segments.is_empty(), "no segments at {level}");
        for seg in &segments {
            for p in [seg.start, seg.end] {
                assert!((0.0..=8.0).contains(&p.x));
                assert!((0.0..=11.0).contains(&p.y));
            }
        }
    }
}

// ============================================================================
// connect_segments tests
// ============================================================================

#[test]
fn test_connect_segments_empty() {
    assert!(connect_segments(vec![]).is_empty());
}

#[test]
fn test_connect_segments_grows_both_ends() {
    // Middle segment first, neighbours on either side
    let segments = vec![
        Segment {
            start: Point::new(1.0, 0.0),
            end: Point::new(2.0, 0.0),
        },
        Segment {
            start: Point::new(2.0, 0.0),
            end: Point::new(3.0, 0.0),
        },
        Segment {
            start: Point::new(0.0, 0.0),
            end: Point::new(1.0, 0.0),
        },
    ];
    let contours = connect_segments(segments);

    assert_eq!(contours.len(), 1);
    let points = &contours[0].points;
    assert_eq!(points.len(), 4);
    assert_eq!(points[0], Point::new(0.0, 0.0));
    assert_eq!(points[3], Point::new(3.0, 0.0));
    assert!(!contours[0].closed);
}

#[test]
fn test_connect_segments_reversed_direction() {
    let segments = vec![
        Segment {
            start: Point::new(0.0, 0.0),
            end: Point::new(1.0, 0.0),
        },
        Segment {
            start: Point::new(2.0, 0.0),
            end: Point::new(1.0, 0.0),
        },
    ];
    let contours = connect_segments(segments);

    assert_eq!(contours.len(), 1);
    assert_eq!(contours[0].points.len(), 3);
}

#[test]
fn test_connect_segments_closed_ring() {
    #[rustfmt::skip]
    let data = vec![
        0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 2.0, 4.0, 2.0, 0.0,
        0.0, 4.0, 8.0, 4.0, 0.0,
        0.0, 2.0, 4.0, 2.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0,
    ];
    let contours = connect_segments(march_squares(&data, 5, 5, 3.0));

    assert_eq!(contours.len(), 1);
    assert!(contours[0].closed);
}

#[test]
fn test_connect_segments_separate_pieces() {
    let segments = vec![
        Segment {
            start: Point::new(0.0, 0.0),
            end: Point::new(1.0, 0.0),
        },
        Segment {
            start: Point::new(10.0, 10.0),
            end: Point::new(11.0, 10.0),
        },
    ];
    assert_eq!(connect_segments(segments).len(), 2);
}

// ============================================================================
// smooth_contour tests
// ============================================================================

#[test]
fn test_smooth_contour_keeps_open_endpoints() {
    let contour = Contour {
        level: 0.06,
        points: vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 0.0),
        ],
        closed: false,
    };

    let result = smooth_contour(&contour, 2);
    assert!(result.points.len() > contour.points.len());
    assert_eq!(result.points[0], Point::new(0.0, 0.0));
    assert_eq!(result.points[result.points.len() - 1], Point::new(10.0, 0.0));
    assert_eq!(result.level, 0.06);
}

#[test]
fn test_smooth_contour_closed_doubles_points() {
    let contour = Contour {
        level: 1.0,
        points: vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ],
        closed: true,
    };

    let result = smooth_contour(&contour, 1);
    assert_eq!(result.points.len(), 8);
    assert!(result.closed);
}

#[test]
fn test_smooth_contour_short_lines_unchanged() {
    let contour = Contour {
        level: 0.0,
        points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
        closed: false,
    };
    assert_eq!(smooth_contour(&contour, 3).points.len(), 2);
}

// ============================================================================
// generate_all_contours / draw_contours tests
// ============================================================================

#[test]
fn test_generate_all_contours_tags_levels() {
    let rows = create_optical_depth_rows(16, 16);
    let data = flatten_rows(&rows);
    let config = ContourConfig::with_levels(vec![
        ContourLevel::new(0.06, RED),
        ContourLevel::new(1.0, MAGENTA),
    ]);

    let contours = generate_all_contours(&data, 16, 16, &config);
    assert!(contours.iter().any(|c| c.level == 0.06));
    assert!(contours.iter().any(|c| c.level == 1.0));
    assert!(contours.iter().all(|c| c.level == 0.06 || c.level == 1.0));
}

#[test]
fn test_generate_all_contours_no_crossing() {
    let data = vec![1.0e13; 9];
    let config = ContourConfig::with_levels(vec![ContourLevel::new(0.0, WHITE)]);
    assert!(generate_all_contours(&data, 3, 3, &config).is_empty());
}

#[test]
fn test_draw_contours_uses_level_colour() {
    let rows = create_heating_rows(20, 20);
    let data = flatten_rows(&rows);
    let mut config = ContourConfig::with_levels(vec![ContourLevel::new(0.0, RED)]);
    config.labels_enabled = false;

    // Scale grid coordinates to a 100x100 canvas
    let mut contours = generate_all_contours(&data, 20, 20, &config);
    assert!(!contours.is_empty());
    for c in &mut contours {
        for p in &mut c.points {
            *p = Point::new(p.x * 5.0, p.y * 5.0);
        }
    }

    let mut pixmap = Pixmap::new(100, 100).unwrap();
    let bounds = LabelBounds {
        x0: 0.0,
        y0: 0.0,
        x1: 100.0,
        y1: 100.0,
    };
    draw_contours(&mut pixmap, &contours, &config, bounds);

    let red = pixmap
        .pixels()
        .iter()
        .filter(|p| p.alpha() > 0 && p.red() == p.alpha() && p.green() == 0 && p.blue() == 0)
        .count();
    assert!(red > 50, "only {red} red pixels");
    assert!(pixmap
        .pixels()
        .iter()
        .all(|p| p.alpha() == 0 || p.green() == 0));
}

#[test]
fn test_level_labels() {
    let config = ContourConfig::with_levels(vec![
        ContourLevel::new(0.06, RED),
        ContourLevel::new(1.0, MAGENTA),
    ]);
    assert_eq!(config.get_level_label(0.06), "0.06");
    assert_eq!(config.get_level_label(1.0), "1");
    assert_eq!(config.get_level_color(1.0), MAGENTA);
    assert_eq!(config.get_level_color(2.0), [0, 0, 0, 255]);
}
