//! End-to-end tests for map plotting.

use std::path::PathBuf;

use map_format::MapFile;
use map_plot::{render_map, run, PlotConfig};
use test_utils::{
    create_heating_rows, create_optical_depth_rows, write_map_file, MapFileBuilder, TWO_BY_TWO_MAP,
};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

fn config_for(map_dir: PathBuf, output_dir: PathBuf, index: u32) -> PlotConfig {
    PlotConfig {
        index,
        map_dir,
        output_dir,
        width: 400,
        height: 300,
        ..Default::default()
    }
}

/// Value of a `tEXt` chunk, if present.
fn text_value(png: &[u8], keyword: &str) -> Option<String> {
    let mut pos = 8;
    while pos + 8 <= png.len() {
        let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
        let kind = &png[pos + 4..pos + 8];
        let data = &png[pos + 8..pos + 8 + len];
        if kind == b"tEXt" {
            let nul = data.iter().position(|&b| b == 0)?;
            if &data[..nul] == keyword.as_bytes() {
                return Some(String::from_utf8_lossy(&data[nul + 1..]).into_owned());
            }
        }
        pos += 12 + len;
    }
    None
}

// ============================================================================
// run tests
// ============================================================================

#[test]
fn test_run_writes_both_figures() {
    let maps = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    MapFileBuilder::new(create_heating_rows(20, 30), create_optical_depth_rows(20, 30))
        .write_to(maps.path(), 3);

    let config = config_for(maps.path().to_path_buf(), out.path().to_path_buf(), 3);
    let paths = run(&config).unwrap();

    assert_eq!(paths.heating, out.path().join("map_00003_heating.png"));
    assert_eq!(
        paths.optical_depth,
        out.path().join("map_00003_optical_depth.png")
    );

    let heating = std::fs::read(&paths.heating).unwrap();
    let tau = std::fs::read(&paths.optical_depth).unwrap();
    assert_eq!(&heating[..8], &PNG_SIGNATURE);
    assert_eq!(&tau[..8], &PNG_SIGNATURE);
    assert_eq!(text_value(&heating, "Title").as_deref(), Some("Q+ - Q-"));
    assert_eq!(text_value(&tau, "Title").as_deref(), Some("tau"));
    assert_eq!(text_value(&tau, "X-Axis").as_deref(), Some("Sigma"));
}

#[test]
fn test_run_creates_output_directory() {
    let maps = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_map_file(maps.path(), 1, TWO_BY_TWO_MAP);

    let nested = out.path().join("figures").join("run1");
    let config = config_for(maps.path().to_path_buf(), nested.clone(), 1);
    let paths = run(&config).unwrap();

    assert!(paths.heating.starts_with(&nested));
    assert!(paths.heating.exists());
    assert!(paths.optical_depth.exists());
}

#[test]
fn test_run_missing_map_file() {
    let maps = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let config = config_for(maps.path().to_path_buf(), out.path().to_path_buf(), 42);

    let err = run(&config).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("map_00042.dat"), "{message}");
    assert!(!out.path().join("map_00042_heating.png").exists());
}

#[test]
fn test_run_malformed_map_file() {
    let maps = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let ragged = TWO_BY_TWO_MAP.replace("3 4\n", "3\n");
    write_map_file(maps.path(), 5, &ragged);

    let config = config_for(maps.path().to_path_buf(), out.path().to_path_buf(), 5);
    assert!(run(&config).is_err());
    assert!(!out.path().join("map_00005_heating.png").exists());
}

// ============================================================================
// render_map tests
// ============================================================================

#[test]
fn test_render_map_figure_size() {
    let map = MapFile::parse(TWO_BY_TWO_MAP).unwrap();
    let config = PlotConfig {
        width: 500,
        height: 400,
        ..Default::default()
    };
    let rendered = render_map(&map, &config).unwrap();

    assert_eq!((rendered.heating.width, rendered.heating.height), (500, 400));
    assert_eq!(
        (rendered.optical_depth.width, rendered.optical_depth.height),
        (500, 400)
    );
    assert_ne!(rendered.heating.pixels, rendered.optical_depth.pixels);
}

#[test]
fn test_render_map_rejects_non_positive_range() {
    let text = MapFileBuilder::new(vec![vec![1.0, 2.0]; 2], vec![vec![0.1, 0.2]; 2])
        .density_range(0.0, 10.0)
        .build();
    let map = MapFile::parse(&text).unwrap();

    let err = render_map(&map, &PlotConfig::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("axes"));
}
