//! End-to-end checks over real netCDF products and PNG images.
//!
//! These tests build the on-disk layout the CLI consumes (products
//! directory, images directory, footprint descriptor) and drive the full
//! runner through it.

use std::path::{Path, PathBuf};

use checker::{CheckConfig, CheckError, CheckRunner, CheckStage, Footprint};
use radar_common::{GridShape, MaskedGrid};
use test_utils::{uniform_grid, write_signal_png, GridFixture};

const ROWS: usize = 4;
const COLS: usize = 5;
const FILL: f64 = -9999.0;

fn fixture() -> GridFixture {
    GridFixture::utm32(ROWS, COLS)
}

fn shape() -> GridShape {
    GridShape::new(ROWS, COLS)
}

fn grid_values(grid: &MaskedGrid) -> Vec<f64> {
    grid.cells().map(|(_, _, v)| v.unwrap_or(FILL)).collect()
}

/// Write a product netCDF file consistent with `fixture()` geometry.
fn write_product(path: &Path, time_offsets: &[i64], frames: &[MaskedGrid]) {
    let fx = fixture();
    let (lat, lon) = fx.latlon();

    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("time", time_offsets.len()).unwrap();
    file.add_dimension("y", ROWS).unwrap();
    file.add_dimension("x", COLS).unwrap();

    let mut x = file.add_variable::<f64>("x", &["x"]).unwrap();
    x.put_values(&fx.xpos(), ..).unwrap();

    let mut y = file.add_variable::<f64>("y", &["y"]).unwrap();
    y.put_values(&fx.ypos(), ..).unwrap();

    let mut lat_var = file.add_variable::<f64>("lat", &["y", "x"]).unwrap();
    lat_var.put_values(&grid_values(&lat), ..).unwrap();

    let mut lon_var = file.add_variable::<f64>("lon", &["y", "x"]).unwrap();
    lon_var.put_values(&grid_values(&lon), ..).unwrap();

    let mut time = file.add_variable::<i64>("time", &["time"]).unwrap();
    time.put_attribute("units", "seconds since 2020-01-01 00:00:00")
        .unwrap();
    time.put_values(time_offsets, ..).unwrap();

    let mut rr = file
        .add_variable::<f64>("rainfall_rate", &["time", "y", "x"])
        .unwrap();
    rr.set_fill_value(FILL).unwrap();
    for (index, frame) in frames.iter().enumerate() {
        rr.put_values(&grid_values(frame), (index, .., ..)).unwrap();
    }
}

/// Write all-zero signal PNGs at the given second offsets from the epoch.
fn write_images(dir: &Path, offsets: &[i64]) {
    for &secs in offsets {
        let timestamp = chrono::DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc)
            + chrono::Duration::seconds(secs);
        let path = dir.join(imagery::image_filename(timestamp));
        write_signal_png(&path, shape(), &vec![0_u8; shape().len()]);
    }
}

struct Layout {
    _root: tempfile::TempDir,
    products_dir: PathBuf,
    images_dir: PathBuf,
    footprint: PathBuf,
}

fn layout(image_offsets: &[i64]) -> Layout {
    let root = tempfile::tempdir().unwrap();
    let products_dir = root.path().join("products");
    let images_dir = root.path().join("images");
    std::fs::create_dir(&products_dir).unwrap();
    std::fs::create_dir(&images_dir).unwrap();
    write_images(&images_dir, image_offsets);

    let footprint = root.path().join("footprint.yaml");
    std::fs::write(&footprint, fixture().footprint_yaml()).unwrap();

    Layout {
        _root: root,
        products_dir,
        images_dir,
        footprint,
    }
}

fn runner(layout: &Layout, resolution: Option<u64>, keep_going: bool) -> CheckRunner {
    let footprint = Footprint::from_file(&layout.footprint).unwrap();
    let config = CheckConfig::new(&layout.products_dir, &layout.images_dir)
        .with_resolution(resolution)
        .with_keep_going(keep_going);
    CheckRunner::new(footprint, config)
}

#[test]
fn three_zero_frames_pass_without_resolution() {
    let layout = layout(&[0, 300, 600]);
    let frames = vec![uniform_grid(shape(), 0.0); 3];
    write_product(
        &layout.products_dir.join("product.nc"),
        &[0, 300, 600],
        &frames,
    );

    let summary = runner(&layout, None, false).run().unwrap();
    assert_eq!(summary.checked(), 1);
    assert!(summary.all_passed(), "failure: {:?}", summary.reports[0].failure);
}

#[test]
fn shifted_time_value_fails_in_time_stage() {
    let layout = layout(&[0, 300, 600]);
    let frames = vec![uniform_grid(shape(), 0.0); 3];
    write_product(
        &layout.products_dir.join("product.nc"),
        &[0, 300, 601],
        &frames,
    );

    let summary = runner(&layout, None, false).run().unwrap();
    assert_eq!(summary.failed(), 1);
    let failure = summary.reports[0].failure.as_ref().unwrap();
    assert_eq!(failure.stage, CheckStage::Time);
    assert!(matches!(
        failure.error,
        CheckError::TimeValue { index: 2, .. }
    ));
}

#[test]
fn resampled_product_with_one_bucket_passes() {
    let layout = layout(&[0, 300, 600]);
    // 600 s resolution folds all three frames into one bucket whose mean
    // is zero everywhere.
    write_product(
        &layout.products_dir.join("product.nc"),
        &[0],
        &[uniform_grid(shape(), 0.0)],
    );

    let summary = runner(&layout, Some(600), false).run().unwrap();
    assert!(summary.all_passed(), "failure: {:?}", summary.reports[0].failure);
}

#[test]
fn unresampled_product_fails_when_resolution_is_given() {
    let layout = layout(&[0, 300, 600]);
    let frames = vec![uniform_grid(shape(), 0.0); 3];
    write_product(
        &layout.products_dir.join("product.nc"),
        &[0, 300, 600],
        &frames,
    );

    let summary = runner(&layout, Some(600), false).run().unwrap();
    let failure = summary.reports[0].failure.as_ref().unwrap();
    assert_eq!(failure.stage, CheckStage::Time);
    assert!(matches!(
        failure.error,
        CheckError::TimeAxisLength {
            expected: 1,
            actual: 3
        }
    ));
}

#[test]
fn masked_cells_survive_the_full_pipeline() {
    let layout = layout(&[0]);
    // Stored frame masks one cell via the fill value; the image has real
    // signal there, but a masked stored cell is excluded from comparison.
    let mut data = vec![0.0; shape().len()];
    data[7] = FILL;
    let frame = MaskedGrid::from_fill_value(shape(), data, Some(FILL)).unwrap();
    write_product(&layout.products_dir.join("product.nc"), &[0], &[frame]);

    let summary = runner(&layout, None, false).run().unwrap();
    assert!(summary.all_passed(), "failure: {:?}", summary.reports[0].failure);
}

#[test]
fn default_run_halts_at_first_failing_file() {
    let layout = layout(&[0, 300, 600]);
    let good = vec![uniform_grid(shape(), 0.0); 3];
    write_product(
        &layout.products_dir.join("a_bad.nc"),
        &[0, 300, 999],
        &good,
    );
    write_product(
        &layout.products_dir.join("b_good.nc"),
        &[0, 300, 600],
        &good,
    );

    let summary = runner(&layout, None, false).run().unwrap();
    assert_eq!(summary.checked(), 1, "run must stop at the failing file");
    assert_eq!(summary.failed(), 1);
}

#[test]
fn keep_going_checks_every_file() {
    let layout = layout(&[0, 300, 600]);
    let good = vec![uniform_grid(shape(), 0.0); 3];
    write_product(
        &layout.products_dir.join("a_bad.nc"),
        &[0, 300, 999],
        &good,
    );
    write_product(
        &layout.products_dir.join("b_good.nc"),
        &[0, 300, 600],
        &good,
    );

    let summary = runner(&layout, None, true).run().unwrap();
    assert_eq!(summary.checked(), 2);
    assert_eq!(summary.passed(), 1);
    assert_eq!(summary.failed(), 1);
}

#[test]
fn unreadable_product_fails_in_open_stage() {
    let layout = layout(&[0]);
    std::fs::write(layout.products_dir.join("garbage.nc"), b"not netcdf").unwrap();

    let summary = runner(&layout, None, false).run().unwrap();
    let failure = summary.reports[0].failure.as_ref().unwrap();
    assert_eq!(failure.stage, CheckStage::Open);
}

#[test]
fn empty_products_directory_passes_vacuously() {
    let layout = layout(&[0]);
    let summary = runner(&layout, None, false).run().unwrap();
    assert_eq!(summary.checked(), 0);
    assert!(summary.all_passed());
}
