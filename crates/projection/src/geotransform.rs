//! GDAL-style affine geotransform.

use thiserror::Error;

/// Affine mapping from raster (col, row) indices to projected (x, y).
///
/// Coefficient order follows GDAL: `[origin_x, pixel_width, row_rotation,
/// origin_y, col_rotation, pixel_height]`. `pixel_height` is negative for
/// north-up rasters. Rotated rasters are rejected; radar footprints are
/// axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub origin_y: f64,
    pub pixel_height: f64,
}

#[derive(Debug, Error)]
pub enum GeoTransformError {
    #[error("rotated geotransforms are not supported (rotation terms {0}, {1})")]
    Rotated(f64, f64),

    #[error("geotransform has zero pixel size ({width}, {height})")]
    ZeroPixel { width: f64, height: f64 },
}

impl GeoTransform {
    /// Build from the six GDAL coefficients.
    pub fn from_gdal(coeffs: [f64; 6]) -> Result<Self, GeoTransformError> {
        let [origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height] = coeffs;
        if row_rotation != 0.0 || col_rotation != 0.0 {
            return Err(GeoTransformError::Rotated(row_rotation, col_rotation));
        }
        if pixel_width == 0.0 || pixel_height == 0.0 {
            return Err(GeoTransformError::ZeroPixel {
                width: pixel_width,
                height: pixel_height,
            });
        }
        Ok(Self {
            origin_x,
            pixel_width,
            origin_y,
            pixel_height,
        })
    }

    /// Projected coordinates of a fractional (col, row) position.
    ///
    /// Passing `col + 0.5, row + 0.5` yields the cell center.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width,
            self.origin_y + row * self.pixel_height,
        )
    }
}
