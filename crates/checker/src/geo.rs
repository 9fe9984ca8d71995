//! Spatial grid and geographic coordinate validation.
//!
//! The stored x/y axes are re-derived from the footprint and compared
//! element-wise; the stored lat/lon grids are cross-checked at sampled
//! cells against an independent reprojection of the footprint's projected
//! coordinates to EPSG:4326.

use tracing::debug;

use projection::SpatialRef;
use radar_common::{compare_slices, ProductDataset, Tolerance};

use crate::error::CheckError;
use crate::footprint::Footprint;
use crate::sampling::{sample_indices, SampleConfig};

/// Absolute tolerance for sampled lat/lon cells, in degrees.
pub const SAMPLE_TOLERANCE_DEG: f64 = 1e-4;

/// Independent projected-to-geographic transform used as ground truth.
///
/// The trait exists so the transform can be swapped out (or stubbed in
/// tests); it is never the system under test.
pub trait CoordinateOracle {
    /// Reproject a projected point to WGS84 geographic (lat, lon) degrees.
    fn to_geographic(&self, srs: SpatialRef, x: f64, y: f64) -> Result<(f64, f64), CheckError>;
}

/// The in-process reference transform.
#[derive(Debug, Default)]
pub struct EmbeddedTransform;

impl CoordinateOracle for EmbeddedTransform {
    fn to_geographic(&self, srs: SpatialRef, x: f64, y: f64) -> Result<(f64, f64), CheckError> {
        Ok(projection::to_geographic(srs, x, y))
    }
}

/// Validates a product's spatial grid against a footprint.
pub struct GeoValidator<'a> {
    footprint: &'a Footprint,
    oracle: &'a dyn CoordinateOracle,
    sampling: SampleConfig,
}

impl<'a> GeoValidator<'a> {
    pub fn new(
        footprint: &'a Footprint,
        oracle: &'a dyn CoordinateOracle,
        sampling: SampleConfig,
    ) -> Self {
        Self {
            footprint,
            oracle,
            sampling,
        }
    }

    pub fn check(&self, product: &dyn ProductDataset) -> Result<(), CheckError> {
        let x = product.x_coords()?;
        let y = product.y_coords()?;

        if x.len() != self.footprint.cols() {
            return Err(CheckError::ShapeMismatch {
                variable: "x".to_string(),
                expected: format!("({},)", self.footprint.cols()),
                actual: format!("({},)", x.len()),
            });
        }
        if y.len() != self.footprint.rows() {
            return Err(CheckError::ShapeMismatch {
                variable: "y".to_string(),
                expected: format!("({},)", self.footprint.rows()),
                actual: format!("({},)", y.len()),
            });
        }

        let xpos = self.footprint.xpos();
        let ypos = self.footprint.ypos();
        compare_slices(&x, &xpos, Tolerance::COORDINATES).map_err(|m| {
            CheckError::GeoAxisMismatch {
                axis: "x",
                index: m.index,
                actual: m.actual,
                expected: m.expected,
            }
        })?;
        compare_slices(&y, &ypos, Tolerance::COORDINATES).map_err(|m| {
            CheckError::GeoAxisMismatch {
                axis: "y",
                index: m.index,
                actual: m.actual,
                expected: m.expected,
            }
        })?;

        let lat = product.latitudes()?;
        let lon = product.longitudes()?;
        for (name, grid) in [("lat", &lat), ("lon", &lon)] {
            if grid.shape() != self.footprint.shape() {
                return Err(CheckError::ShapeMismatch {
                    variable: name.to_string(),
                    expected: self.footprint.shape().to_string(),
                    actual: grid.shape().to_string(),
                });
            }
        }

        let mut rng = self.sampling.rng();
        let rows = sample_indices(&mut rng, self.footprint.rows(), self.sampling.points_per_axis);
        let cols = sample_indices(&mut rng, self.footprint.cols(), self.sampling.points_per_axis);
        debug!(
            rows = rows.len(),
            cols = cols.len(),
            srs = %self.footprint.srs(),
            "cross-checking sampled coordinates"
        );

        for &row in &rows {
            for &col in &cols {
                let (px, py) = (xpos[col], ypos[row]);
                let (want_lat, want_lon) =
                    self.oracle.to_geographic(self.footprint.srs(), px, py)?;

                let stored_lat = lat.get(row, col).unwrap_or(f64::NAN);
                if !((stored_lat - want_lat).abs() < SAMPLE_TOLERANCE_DEG) {
                    return Err(CheckError::GeoSampleMismatch {
                        coordinate: "lat",
                        row,
                        col,
                        actual: stored_lat,
                        expected: want_lat,
                    });
                }

                let stored_lon = lon.get(row, col).unwrap_or(f64::NAN);
                if !((stored_lon - want_lon).abs() < SAMPLE_TOLERANCE_DEG) {
                    return Err(CheckError::GeoSampleMismatch {
                        coordinate: "lon",
                        row,
                        col,
                        actual: stored_lon,
                        expected: want_lon,
                    });
                }
            }
        }

        debug!("spatial grid matches footprint");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_common::MaskedGrid;
    use test_utils::GridFixture;

    fn footprint_of(fixture: &GridFixture) -> Footprint {
        Footprint::new(fixture.rows, fixture.cols, fixture.srs, fixture.transform).unwrap()
    }

    fn set_cell(grid: &MaskedGrid, row: usize, col: usize, value: f64) -> MaskedGrid {
        let shape = grid.shape();
        let data: Vec<f64> = grid
            .cells()
            .map(|(r, c, v)| {
                if (r, c) == (row, col) {
                    value
                } else {
                    v.unwrap_or(f64::NAN)
                }
            })
            .collect();
        MaskedGrid::new(shape, data).unwrap()
    }

    #[test]
    fn test_consistent_product_passes() {
        let fixture = GridFixture::utm32(6, 6);
        let footprint = footprint_of(&fixture);
        let product = fixture.product("2020-01-01 00:00:00", &[0], vec![]);

        let oracle = EmbeddedTransform;
        GeoValidator::new(&footprint, &oracle, SampleConfig::default())
            .check(&product)
            .unwrap();
    }

    #[test]
    fn test_wrong_x_length_is_shape_mismatch() {
        let fixture = GridFixture::utm32(6, 6);
        let footprint = footprint_of(&fixture);
        let mut product = fixture.product("2020-01-01 00:00:00", &[0], vec![]);
        product.x.pop();

        let oracle = EmbeddedTransform;
        let err = GeoValidator::new(&footprint, &oracle, SampleConfig::default())
            .check(&product)
            .unwrap_err();
        match err {
            CheckError::ShapeMismatch { variable, .. } => assert_eq!(variable, "x"),
            other => panic!("expected shape mismatch, got {other}"),
        }
    }

    #[test]
    fn test_perturbed_axis_value_is_axis_mismatch() {
        let fixture = GridFixture::utm32(6, 6);
        let footprint = footprint_of(&fixture);
        let mut product = fixture.product("2020-01-01 00:00:00", &[0], vec![]);
        // Coordinate comparison is relative-dominated at UTM magnitudes
        // (rtol 1e-5 of ~4.35e6 m is ~43 m), so push well past it.
        product.y[3] += 100.0;

        let oracle = EmbeddedTransform;
        let err = GeoValidator::new(&footprint, &oracle, SampleConfig::default())
            .check(&product)
            .unwrap_err();
        match err {
            CheckError::GeoAxisMismatch { axis: "y", index, .. } => assert_eq!(index, 3),
            other => panic!("expected y axis mismatch, got {other}"),
        }
    }

    #[test]
    fn test_perturbed_lat_cell_is_sample_mismatch() {
        // A 6x6 grid is below the per-axis sample size, so every cell is
        // sampled and any perturbation must be caught.
        let fixture = GridFixture::utm32(6, 6);
        let footprint = footprint_of(&fixture);
        let mut product = fixture.product("2020-01-01 00:00:00", &[0], vec![]);
        product.lat = set_cell(&product.lat, 2, 4, product.lat.get(2, 4).unwrap() + 5e-4);

        let oracle = EmbeddedTransform;
        let err = GeoValidator::new(&footprint, &oracle, SampleConfig::default())
            .check(&product)
            .unwrap_err();
        match err {
            CheckError::GeoSampleMismatch {
                coordinate: "lat",
                row,
                col,
                ..
            } => assert_eq!((row, col), (2, 4)),
            other => panic!("expected lat sample mismatch, got {other}"),
        }
    }

    #[test]
    fn test_perturbation_within_tolerance_passes() {
        let fixture = GridFixture::utm32(6, 6);
        let footprint = footprint_of(&fixture);
        let mut product = fixture.product("2020-01-01 00:00:00", &[0], vec![]);
        product.lon = set_cell(&product.lon, 1, 1, product.lon.get(1, 1).unwrap() + 5e-5);

        let oracle = EmbeddedTransform;
        GeoValidator::new(&footprint, &oracle, SampleConfig::default())
            .check(&product)
            .unwrap();
    }

    #[test]
    fn test_oracle_failure_propagates() {
        struct FailingOracle;
        impl CoordinateOracle for FailingOracle {
            fn to_geographic(
                &self,
                _srs: SpatialRef,
                _x: f64,
                _y: f64,
            ) -> Result<(f64, f64), CheckError> {
                Err(CheckError::Oracle("transform process died".to_string()))
            }
        }

        let fixture = GridFixture::utm32(4, 4);
        let footprint = footprint_of(&fixture);
        let product = fixture.product("2020-01-01 00:00:00", &[0], vec![]);

        let err = GeoValidator::new(&footprint, &FailingOracle, SampleConfig::default())
            .check(&product)
            .unwrap_err();
        assert!(matches!(err, CheckError::Oracle(_)));
    }
}
