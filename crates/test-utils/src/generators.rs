//! Grid and image generators for predictable test data.

use std::path::Path;

use image::{GrayImage, Luma};
use radar_common::{GridShape, MaskedGrid};

/// A fully valid grid with every cell at `value`.
pub fn uniform_grid(shape: GridShape, value: f64) -> MaskedGrid {
    MaskedGrid::new(shape, vec![value; shape.len()]).expect("uniform grid sized to shape")
}

/// A fully valid grid with cell value `col * 1000 + row`.
///
/// Makes read/write mixups visible: `grid[row][col] == col * 1000 + row`.
pub fn gradient_grid(shape: GridShape) -> MaskedGrid {
    let mut data = Vec::with_capacity(shape.len());
    for row in 0..shape.rows {
        for col in 0..shape.cols {
            data.push((col * 1000 + row) as f64);
        }
    }
    MaskedGrid::new(shape, data).expect("gradient grid sized to shape")
}

/// A gradient grid with every `mask_every`-th cell masked.
pub fn masked_gradient_grid(shape: GridShape, mask_every: usize) -> MaskedGrid {
    let gradient = gradient_grid(shape);
    let mut data = Vec::with_capacity(shape.len());
    let mut valid = Vec::with_capacity(shape.len());
    for (idx, (_, _, value)) in gradient.cells().enumerate() {
        data.push(value.unwrap_or(0.0));
        valid.push(mask_every == 0 || idx % mask_every != 0);
    }
    MaskedGrid::with_mask(shape, data, valid).expect("mask sized to shape")
}

/// Write an 8-bit grayscale signal PNG with the given per-cell counts.
///
/// `counts` is row-major with `shape.rows * shape.cols` entries.
pub fn write_signal_png(path: &Path, shape: GridShape, counts: &[u8]) {
    assert_eq!(counts.len(), shape.len(), "counts must cover the grid");
    let mut img = GrayImage::new(shape.cols as u32, shape.rows as u32);
    for row in 0..shape.rows {
        for col in 0..shape.cols {
            img.put_pixel(
                col as u32,
                row as u32,
                Luma([counts[row * shape.cols + col]]),
            );
        }
    }
    img.save(path).expect("failed to write test PNG");
}
