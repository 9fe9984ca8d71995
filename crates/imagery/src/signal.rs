//! PNG decoding into masked radar signal grids.

use std::path::Path;

use radar_common::{GridShape, MaskedGrid};

use crate::error::{ImageryError, ImageryResult};

/// 8-bit count marking cells outside radar coverage.
pub const NO_SIGNAL: u8 = 255;

/// Decode a grayscale PNG into a signal grid.
///
/// Pixels at the `NO_SIGNAL` count are masked; everything else, including
/// zero (no echo), is a valid measurement. Row 0 of the grid is the top
/// image row.
pub fn load_signal(path: &Path) -> ImageryResult<MaskedGrid> {
    let img = image::open(path).map_err(|e| ImageryError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let gray = img.into_luma8();
    let (width, height) = gray.dimensions();
    let shape = GridShape::new(height as usize, width as usize);

    let mut data = Vec::with_capacity(shape.len());
    let mut valid = Vec::with_capacity(shape.len());
    for pixel in gray.pixels() {
        let count = pixel.0[0];
        data.push(f64::from(count));
        valid.push(count != NO_SIGNAL);
    }

    MaskedGrid::with_mask(shape, data, valid).map_err(|e| ImageryError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
