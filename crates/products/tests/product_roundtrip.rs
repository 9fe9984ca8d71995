//! Write a product file with the netcdf crate, then read it back through
//! the `ProductDataset` trait.

use radar_common::{GridShape, ProductDataset, ProductError};
use products::NetcdfProduct;

const FILL: f64 = -9999.0;

fn write_product(path: &std::path::Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("time", 2).unwrap();
    file.add_dimension("y", 2).unwrap();
    file.add_dimension("x", 3).unwrap();

    let mut x = file.add_variable::<f64>("x", &["x"]).unwrap();
    x.put_values(&[500.0, 1500.0, 2500.0], ..).unwrap();

    let mut y = file.add_variable::<f64>("y", &["y"]).unwrap();
    y.put_values(&[4_349_500.0, 4_348_500.0], ..).unwrap();

    let mut lat = file.add_variable::<f64>("lat", &["y", "x"]).unwrap();
    lat.put_values(&[39.0, 39.0, 39.0, 38.99, 38.99, 38.99], ..)
        .unwrap();

    let mut lon = file.add_variable::<f64>("lon", &["y", "x"]).unwrap();
    lon.put_values(&[8.9, 9.0, 9.1, 8.9, 9.0, 9.1], ..).unwrap();

    let mut time = file.add_variable::<i64>("time", &["time"]).unwrap();
    time.put_attribute("units", "seconds since 2020-01-01 00:00:00")
        .unwrap();
    time.put_values(&[0_i64, 300], ..).unwrap();

    let mut rr = file
        .add_variable::<f64>("rainfall_rate", &["time", "y", "x"])
        .unwrap();
    rr.set_fill_value(FILL).unwrap();
    rr.put_values(&[0.5, 1.5, 2.5, 3.5, FILL, 5.5], (0, .., ..))
        .unwrap();
    rr.put_values(&[6.0, 6.0, 6.0, 6.0, 6.0, 6.0], (1, .., ..))
        .unwrap();
}

#[test]
fn reads_back_coordinates_and_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("product.nc");
    write_product(&path);

    let product = NetcdfProduct::open(&path).unwrap();
    assert_eq!(product.x_coords().unwrap(), vec![500.0, 1500.0, 2500.0]);
    assert_eq!(product.y_coords().unwrap(), vec![4_349_500.0, 4_348_500.0]);

    let lat = product.latitudes().unwrap();
    assert_eq!(lat.shape(), GridShape::new(2, 3));
    assert_eq!(lat.get(1, 0), Some(38.99));

    assert_eq!(
        product.time_units().unwrap(),
        "seconds since 2020-01-01 00:00:00"
    );
    assert_eq!(product.time_offsets().unwrap(), vec![0, 300]);
}

#[test]
fn reads_back_masked_rainfall_frames() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("product.nc");
    write_product(&path);

    let product = NetcdfProduct::open(&path).unwrap();
    assert_eq!(product.frame_count().unwrap(), 2);

    let frame0 = product.rainfall_frame(0).unwrap();
    assert_eq!(frame0.get(0, 0), Some(0.5));
    assert_eq!(frame0.get(1, 1), None, "fill value cell must be masked");
    assert_eq!(frame0.valid_count(), 5);

    let frame1 = product.rainfall_frame(1).unwrap();
    assert_eq!(frame1.valid_count(), 6);
    assert_eq!(frame1.get(0, 2), Some(6.0));
}

#[test]
fn frame_index_out_of_range_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("product.nc");
    write_product(&path);

    let product = NetcdfProduct::open(&path).unwrap();
    assert!(matches!(
        product.rainfall_frame(2),
        Err(ProductError::Read { .. })
    ));
}

#[test]
fn missing_variable_is_reported_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.nc");
    let file = netcdf::create(&path).unwrap();
    drop(file);

    let product = NetcdfProduct::open(&path).unwrap();
    match product.x_coords() {
        Err(ProductError::MissingVariable(name)) => assert_eq!(name, "x"),
        other => panic!("expected missing variable error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn open_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        NetcdfProduct::open(dir.path().join("absent.nc")),
        Err(ProductError::Open { .. })
    ));
}
