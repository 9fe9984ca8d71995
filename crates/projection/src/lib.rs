//! Coordinate transforms for radar product grids.
//!
//! Products are gridded in a projected spatial reference system (UTM zones
//! on WGS84 in practice); audit comparisons need the corresponding
//! geographic coordinates. This crate provides the reference transform:
//! EPSG code parsing, the GDAL-style affine geotransform, and an
//! ellipsoidal Transverse Mercator implementation.

pub mod geotransform;
pub mod srs;
pub mod transverse;

pub use geotransform::{GeoTransform, GeoTransformError};
pub use srs::{SpatialRef, SrsError};
pub use transverse::TransverseMercator;

/// Reproject a point from `srs` to geographic WGS84 (EPSG:4326).
///
/// Returns (lat, lon) in degrees.
pub fn to_geographic(srs: SpatialRef, x: f64, y: f64) -> (f64, f64) {
    match srs {
        // Already geographic: x is longitude, y is latitude.
        SpatialRef::Geographic => (y, x),
        SpatialRef::UtmWgs84 { zone, north } => {
            TransverseMercator::utm(zone, north).projected_to_geographic(x, y)
        }
    }
}
