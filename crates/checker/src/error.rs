//! Error types for product checks.
//!
//! Every failed comparison carries the variable, index or cell, and the
//! stored-vs-expected pair, so a failure names exactly what disagreed.

use chrono::{DateTime, Utc};
use thiserror::Error;

use imagery::ImageryError;
use radar_common::{ProductError, TimeUnitError};

/// A failed product check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Stored dimensions disagree with what the footprint implies.
    #[error("variable '{variable}' has shape {actual}, expected {expected}")]
    ShapeMismatch {
        variable: String,
        expected: String,
        actual: String,
    },

    /// A stored coordinate axis value differs from the footprint-derived one.
    #[error("{axis} axis mismatch at index {index}: stored {actual}, derived {expected}")]
    GeoAxisMismatch {
        axis: &'static str,
        index: usize,
        actual: f64,
        expected: f64,
    },

    /// A sampled lat/lon cell differs from the reprojection oracle.
    #[error(
        "{coordinate} mismatch at cell ({row}, {col}): stored {actual}, reprojected {expected}"
    )]
    GeoSampleMismatch {
        coordinate: &'static str,
        row: usize,
        col: usize,
        actual: f64,
        expected: f64,
    },

    /// The time variable's units attribute fails the fixed format.
    #[error(transparent)]
    TimeUnitFormat(#[from] TimeUnitError),

    /// The stored time axis has the wrong number of entries.
    #[error("time axis has {actual} entries, expected {expected}")]
    TimeAxisLength { expected: usize, actual: usize },

    /// A stored time value decodes to the wrong timestamp.
    #[error("time axis mismatch at index {index}: stored {actual}, expected {expected}")]
    TimeValue {
        index: usize,
        actual: DateTime<Utc>,
        expected: DateTime<Utc>,
    },

    /// The product stores the wrong number of rainfall frames.
    #[error("product stores {actual} rainfall frames, expected {expected}")]
    RainfallFrameCount { expected: usize, actual: usize },

    /// A stored rainfall cell differs from the reconstructed value.
    #[error(
        "rainfall mismatch in frame {frame} at cell ({row}, {col}): stored {actual}, reconstructed {expected}"
    )]
    RainfallMismatch {
        frame: usize,
        row: usize,
        col: usize,
        actual: f64,
        expected: f64,
    },

    /// The reprojection oracle failed outright.
    #[error("coordinate oracle failed: {0}")]
    Oracle(String),

    /// Product container access failed.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Source image discovery or decoding failed.
    #[error(transparent)]
    Imagery(#[from] ImageryError),
}
