//! Tolerance-based comparison of reconstructed values against stored ones.
//!
//! Two values are considered equal when `|actual - expected| <= atol +
//! rtol * |expected|`. Comparisons report the first differing element so
//! failures can name the exact cell.

use crate::grid::MaskedGrid;

/// Relative + absolute tolerance pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Tolerance {
    /// Tolerance for projected coordinate axes.
    pub const COORDINATES: Tolerance = Tolerance {
        rtol: 1e-5,
        atol: 1e-8,
    };

    /// Tolerance for rainfall-rate grids.
    pub const RAINFALL: Tolerance = Tolerance {
        rtol: 1e-5,
        atol: 1e-4,
    };

    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }

    /// Check a single pair of values.
    pub fn close(&self, actual: f64, expected: f64) -> bool {
        if actual == expected {
            // Covers exact matches and infinities of the same sign.
            return true;
        }
        (actual - expected).abs() <= self.atol + self.rtol * expected.abs()
    }
}

/// First differing element of a 1-D comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueMismatch {
    pub index: usize,
    pub actual: f64,
    pub expected: f64,
}

/// First differing cell of a 2-D comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMismatch {
    pub row: usize,
    pub col: usize,
    pub actual: f64,
    pub expected: f64,
}

/// Compare two slices element-wise. Lengths must already agree.
pub fn compare_slices(
    actual: &[f64],
    expected: &[f64],
    tol: Tolerance,
) -> Result<(), ValueMismatch> {
    debug_assert_eq!(actual.len(), expected.len());
    for (index, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        if !tol.close(a, e) {
            return Err(ValueMismatch {
                index,
                actual: a,
                expected: e,
            });
        }
    }
    Ok(())
}

/// Compare two masked grids cell-wise.
///
/// Only cells valid on BOTH sides participate; the mask pattern itself is
/// not asserted. Shapes must already agree.
pub fn compare_masked(
    actual: &MaskedGrid,
    expected: &MaskedGrid,
    tol: Tolerance,
) -> Result<(), CellMismatch> {
    debug_assert_eq!(actual.shape(), expected.shape());
    for (row, col, value) in actual.cells() {
        let (Some(a), Some(e)) = (value, expected.get(row, col)) else {
            continue;
        };
        if !tol.close(a, e) {
            return Err(CellMismatch {
                row,
                col,
                actual: a,
                expected: e,
            });
        }
    }
    Ok(())
}
