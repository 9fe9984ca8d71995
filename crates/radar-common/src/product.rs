//! Read-only access to the product container under audit.
//!
//! The checker never touches the container format directly; it sees a
//! `ProductDataset`. The netCDF-backed implementation lives in the
//! `products` crate, and tests substitute an in-memory one.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::grid::MaskedGrid;

/// Result type for product container access.
pub type ProductResult<T> = Result<T, ProductError>;

/// Errors raised by product container access.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("failed to open product {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("product variable '{0}' is missing")]
    MissingVariable(String),

    #[error("product variable '{variable}' is missing attribute '{attribute}'")]
    MissingAttribute { variable: String, attribute: String },

    #[error("failed to read product variable '{variable}': {reason}")]
    Read { variable: String, reason: String },

    #[error("product variable '{variable}' has unexpected dimensions: {detail}")]
    BadDimensions { variable: String, detail: String },
}

/// One gridded rainfall product file, read-only.
///
/// Variables follow the pipeline's contract: `x (cols,)`, `y (rows,)`,
/// `lat`/`lon (rows, cols)`, `time (T,)` with a seconds-since units
/// attribute, and `rainfall_rate (T, rows, cols)` masked by fill value.
pub trait ProductDataset {
    /// Path of the underlying file, for diagnostics.
    fn path(&self) -> &Path;

    /// Projected x coordinate per column.
    fn x_coords(&self) -> ProductResult<Vec<f64>>;

    /// Projected y coordinate per row.
    fn y_coords(&self) -> ProductResult<Vec<f64>>;

    /// Geographic latitude per cell.
    fn latitudes(&self) -> ProductResult<MaskedGrid>;

    /// Geographic longitude per cell.
    fn longitudes(&self) -> ProductResult<MaskedGrid>;

    /// Raw `units` attribute of the time variable.
    fn time_units(&self) -> ProductResult<String>;

    /// Stored time axis as integral second offsets.
    fn time_offsets(&self) -> ProductResult<Vec<i64>>;

    /// Number of stored rainfall frames.
    fn frame_count(&self) -> ProductResult<usize>;

    /// One rainfall frame, fill values masked.
    fn rainfall_frame(&self, index: usize) -> ProductResult<MaskedGrid>;
}
