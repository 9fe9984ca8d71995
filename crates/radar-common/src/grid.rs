//! Masked grid storage for radar fields.
//!
//! Rainfall frames carry an explicit per-cell validity mask rather than a
//! sentinel value, so missing cells can never leak into arithmetic. Grids
//! are row-major, row 0 first.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grid dimensions as (rows, cols).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("data length {len} does not match shape {shape}")]
    LengthMismatch { len: usize, shape: GridShape },

    #[error("cannot combine grids of shape {a} and {b}")]
    ShapeMismatch { a: GridShape, b: GridShape },

    #[error("cannot average an empty stack of grids")]
    EmptyStack,
}

/// A two-dimensional numeric grid with a per-cell validity mask.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedGrid {
    shape: GridShape,
    data: Vec<f64>,
    valid: Vec<bool>,
}

impl MaskedGrid {
    /// Create a fully valid grid from row-major values.
    pub fn new(shape: GridShape, data: Vec<f64>) -> Result<Self, GridError> {
        if data.len() != shape.len() {
            return Err(GridError::LengthMismatch {
                len: data.len(),
                shape,
            });
        }
        let valid = vec![true; data.len()];
        Ok(Self { shape, data, valid })
    }

    /// Create a grid with an explicit validity mask (`true` = valid).
    pub fn with_mask(
        shape: GridShape,
        data: Vec<f64>,
        valid: Vec<bool>,
    ) -> Result<Self, GridError> {
        if data.len() != shape.len() || valid.len() != shape.len() {
            return Err(GridError::LengthMismatch {
                len: data.len().max(valid.len()),
                shape,
            });
        }
        Ok(Self { shape, data, valid })
    }

    /// Create a grid from raw values, masking cells equal to `fill` or NaN.
    ///
    /// This is the decoding path for container variables that mark missing
    /// data with a fill value attribute.
    pub fn from_fill_value(
        shape: GridShape,
        data: Vec<f64>,
        fill: Option<f64>,
    ) -> Result<Self, GridError> {
        if data.len() != shape.len() {
            return Err(GridError::LengthMismatch {
                len: data.len(),
                shape,
            });
        }
        let valid = data
            .iter()
            .map(|&v| !v.is_nan() && fill.map_or(true, |f| v != f))
            .collect();
        Ok(Self { shape, data, valid })
    }

    /// Create a grid with every cell masked.
    pub fn all_masked(shape: GridShape) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.len()],
            valid: vec![false; shape.len()],
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Value at (row, col), or `None` if the cell is masked.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.shape.rows || col >= self.shape.cols {
            return None;
        }
        let idx = row * self.shape.cols + col;
        if self.valid[idx] {
            Some(self.data[idx])
        } else {
            None
        }
    }

    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        row < self.shape.rows
            && col < self.shape.cols
            && self.valid[row * self.shape.cols + col]
    }

    /// Number of valid (unmasked) cells.
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }

    /// Iterate cells in row-major order as (row, col, value-if-valid).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Option<f64>)> + '_ {
        let cols = self.shape.cols;
        self.data.iter().zip(self.valid.iter()).enumerate().map(
            move |(idx, (&v, &ok))| {
                let value = if ok { Some(v) } else { None };
                (idx / cols, idx % cols, value)
            },
        )
    }

    /// Apply `f` to every valid cell, keeping the mask.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        let data = self
            .data
            .iter()
            .zip(self.valid.iter())
            .map(|(&v, &ok)| if ok { f(v) } else { v })
            .collect();
        Self {
            shape: self.shape,
            data,
            valid: self.valid.clone(),
        }
    }

    /// Element-wise mean of a stack of equally shaped grids.
    ///
    /// A cell's mean is taken over the members valid at that cell; a cell
    /// valid in no member stays masked. Addition is commutative, so member
    /// order does not affect the result.
    pub fn mean_of(grids: &[MaskedGrid]) -> Result<MaskedGrid, GridError> {
        let first = grids.first().ok_or(GridError::EmptyStack)?;
        let shape = first.shape;
        for g in grids {
            if g.shape != shape {
                return Err(GridError::ShapeMismatch { a: shape, b: g.shape });
            }
        }

        let mut sums = vec![0.0_f64; shape.len()];
        let mut counts = vec![0_u32; shape.len()];
        for g in grids {
            for (idx, (&v, &ok)) in g.data.iter().zip(g.valid.iter()).enumerate() {
                if ok {
                    sums[idx] += v;
                    counts[idx] += 1;
                }
            }
        }

        let mut data = Vec::with_capacity(shape.len());
        let mut valid = Vec::with_capacity(shape.len());
        for (sum, count) in sums.into_iter().zip(counts) {
            if count > 0 {
                data.push(sum / f64::from(count));
                valid.push(true);
            } else {
                data.push(0.0);
                valid.push(false);
            }
        }
        Ok(MaskedGrid { shape, data, valid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(shape: GridShape, values: &[f64]) -> MaskedGrid {
        MaskedGrid::new(shape, values.to_vec()).unwrap()
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = MaskedGrid::new(GridShape::new(2, 2), vec![1.0; 3]).unwrap_err();
        assert!(matches!(err, GridError::LengthMismatch { len: 3, .. }));
    }

    #[test]
    fn test_get_and_mask() {
        let shape = GridShape::new(2, 3);
        let g = MaskedGrid::with_mask(
            shape,
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            vec![true, false, true, true, true, true],
        )
        .unwrap();

        assert_eq!(g.get(0, 0), Some(0.0));
        assert_eq!(g.get(0, 1), None);
        assert_eq!(g.get(1, 2), Some(5.0));
        assert_eq!(g.get(2, 0), None, "out of bounds reads as masked");
        assert_eq!(g.valid_count(), 5);
    }

    #[test]
    fn test_fill_value_masks_fill_and_nan() {
        let shape = GridShape::new(1, 4);
        let g = MaskedGrid::from_fill_value(
            shape,
            vec![1.0, -9999.0, f64::NAN, 4.0],
            Some(-9999.0),
        )
        .unwrap();

        assert_eq!(g.get(0, 0), Some(1.0));
        assert_eq!(g.get(0, 1), None);
        assert_eq!(g.get(0, 2), None);
        assert_eq!(g.get(0, 3), Some(4.0));
    }

    #[test]
    fn test_mean_singleton_is_identity() {
        let shape = GridShape::new(2, 2);
        let g = grid(shape, &[1.5, 2.5, 3.5, 4.5]);
        let mean = MaskedGrid::mean_of(std::slice::from_ref(&g)).unwrap();
        assert_eq!(mean, g);
    }

    #[test]
    fn test_mean_is_order_independent() {
        let shape = GridShape::new(2, 2);
        let a = grid(shape, &[0.0, 2.0, 4.0, 6.0]);
        let b = grid(shape, &[2.0, 4.0, 6.0, 8.0]);
        let c = grid(shape, &[4.0, 6.0, 8.0, 10.0]);

        let fwd = MaskedGrid::mean_of(&[a.clone(), b.clone(), c.clone()]).unwrap();
        let rev = MaskedGrid::mean_of(&[c, a, b]).unwrap();
        assert_eq!(fwd, rev);
        assert_eq!(fwd.get(0, 0), Some(2.0));
        assert_eq!(fwd.get(1, 1), Some(8.0));
    }

    #[test]
    fn test_mean_honors_partial_masks() {
        let shape = GridShape::new(1, 2);
        let a = MaskedGrid::with_mask(shape, vec![10.0, 1.0], vec![true, false]).unwrap();
        let b = MaskedGrid::with_mask(shape, vec![20.0, 2.0], vec![true, false]).unwrap();
        let c = MaskedGrid::with_mask(shape, vec![60.0, 3.0], vec![true, true]).unwrap();

        let mean = MaskedGrid::mean_of(&[a, b, c]).unwrap();
        // Cell 0: present in all three members.
        assert_eq!(mean.get(0, 0), Some(30.0));
        // Cell 1: only the third member is valid.
        assert_eq!(mean.get(0, 1), Some(3.0));
    }

    #[test]
    fn test_mean_all_masked_stays_masked() {
        let shape = GridShape::new(1, 1);
        let a = MaskedGrid::all_masked(shape);
        let b = MaskedGrid::all_masked(shape);
        let mean = MaskedGrid::mean_of(&[a, b]).unwrap();
        assert_eq!(mean.get(0, 0), None);
    }

    #[test]
    fn test_mean_rejects_shape_mismatch() {
        let a = grid(GridShape::new(1, 2), &[1.0, 2.0]);
        let b = grid(GridShape::new(2, 1), &[1.0, 2.0]);
        assert!(matches!(
            MaskedGrid::mean_of(&[a, b]),
            Err(GridError::ShapeMismatch { .. })
        ));
    }
}
