//! Benchmarks for figure rendering.
//!
//! Run with: cargo bench --package renderer --bench figure_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use map_format::{log_space, Extent, Grid, ValueRange};
use renderer::contour::{generate_all_contours, ContourConfig, ContourLevel};
use renderer::gradient::render_symlog;
use renderer::{png, render_figure, ContourOverlay, FigureSpec, FigureStyle, SymLogNorm};
use test_utils::{create_heating_rows, create_optical_depth_rows, flatten_rows};

const GRID_SIZES: [usize; 3] = [64, 128, 256];

fn tau_levels() -> ContourConfig {
    ContourConfig::with_levels(vec![
        ContourLevel::new(0.06, [255, 0, 0, 255]),
        ContourLevel::new(1.0, [255, 0, 255, 255]),
    ])
}

// =============================================================================
// HEATMAP BENCHMARKS
// =============================================================================

fn bench_render_symlog(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_symlog");
    let grid = Grid::from_rows(create_heating_rows(200, 200)).unwrap();
    let norm = SymLogNorm::autoscale(5.0e13, grid.values());

    for (width, height) in [(256, 256), (600, 520), (1024, 1024)] {
        group.throughput(Throughput::Elements((width * height) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &(width, height),
            |b, &(w, h)| b.iter(|| render_symlog(black_box(&grid), w, h, &norm)),
        );
    }
    group.finish();
}

// =============================================================================
// CONTOUR BENCHMARKS
// =============================================================================

fn bench_generate_contours(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_all_contours");
    let config = tau_levels();

    for size in GRID_SIZES {
        let data = flatten_rows(&create_optical_depth_rows(size, size));
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| generate_all_contours(black_box(data), size, size, &config))
        });
    }
    group.finish();
}

// =============================================================================
// FULL FIGURE BENCHMARKS
// =============================================================================

fn bench_render_figure(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_figure");
    group.sample_size(20);

    for size in GRID_SIZES {
        let heating = Grid::from_rows(create_heating_rows(size, size)).unwrap();
        let tau = Grid::from_rows(create_optical_depth_rows(size, size)).unwrap();
        let density = log_space(1.0e2, 1.0e5, size).unwrap();
        let temperature = log_space(1.0e8, 1.0e4, size).unwrap();

        let spec = FigureSpec {
            title: "Q+ - Q-".to_string(),
            x_label: "Sigma".to_string(),
            y_label: "T".to_string(),
            image: &heating,
            extent: Extent::new(ValueRange::new(1.0e2, 1.0e5), ValueRange::new(1.0e4, 1.0e8)),
            norm: SymLogNorm::autoscale(5.0e13, heating.values()),
            overlays: vec![
                ContourOverlay {
                    grid: &heating,
                    x_coords: &density,
                    y_coords: &temperature,
                    config: ContourConfig::with_levels(vec![ContourLevel::new(
                        0.0,
                        [255, 255, 255, 255],
                    )]),
                },
                ContourOverlay {
                    grid: &tau,
                    x_coords: &density,
                    y_coords: &temperature,
                    config: tau_levels(),
                },
            ],
        };
        let style = FigureStyle::default();

        group.bench_with_input(BenchmarkId::from_parameter(size), &spec, |b, spec| {
            b.iter(|| render_figure(black_box(spec), &style).unwrap())
        });
    }
    group.finish();
}

fn bench_encode_png(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_png");
    let grid = Grid::from_rows(create_heating_rows(100, 100)).unwrap();
    let norm = SymLogNorm::autoscale(5.0e13, grid.values());
    let pixels = render_symlog(&grid, 800, 600, &norm);

    group.throughput(Throughput::Bytes(pixels.len() as u64));
    group.bench_function("800x600", |b| {
        b.iter(|| png::create_png(black_box(&pixels), 800, 600).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_render_symlog,
    bench_generate_contours,
    bench_render_figure,
    bench_encode_png
);
criterion_main!(benches);
