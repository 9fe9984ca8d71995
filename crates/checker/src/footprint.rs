//! The footprint: the georeferenced raster template a product must match.
//!
//! A footprint fixes the grid shape, the spatial reference system and the
//! affine mapping from cell indices to projected coordinates. It is loaded
//! once per run from a YAML descriptor:
//!
//! ```yaml
//! rows: 1024
//! cols: 1024
//! srs: "EPSG:32632"
//! transform: [448000.0, 1000.0, 0.0, 4424000.0, 0.0, -1000.0]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use projection::{GeoTransform, GeoTransformError, SpatialRef, SrsError};
use radar_common::GridShape;

#[derive(Debug, Error)]
pub enum FootprintError {
    #[error("failed to read footprint {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse footprint {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error(transparent)]
    Srs(#[from] SrsError),

    #[error(transparent)]
    Transform(#[from] GeoTransformError),

    #[error("footprint grid is empty ({rows} rows, {cols} cols)")]
    Empty { rows: usize, cols: usize },
}

/// On-disk descriptor layout.
#[derive(Debug, Deserialize)]
struct FootprintFile {
    rows: usize,
    cols: usize,
    srs: String,
    transform: [f64; 6],
}

/// An immutable raster template for the product grid.
#[derive(Debug, Clone)]
pub struct Footprint {
    rows: usize,
    cols: usize,
    srs: SpatialRef,
    transform: GeoTransform,
}

impl Footprint {
    pub fn new(
        rows: usize,
        cols: usize,
        srs: SpatialRef,
        transform: GeoTransform,
    ) -> Result<Self, FootprintError> {
        if rows == 0 || cols == 0 {
            return Err(FootprintError::Empty { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            srs,
            transform,
        })
    }

    /// Load a footprint from its YAML descriptor.
    pub fn from_file(path: &Path) -> Result<Self, FootprintError> {
        let text = std::fs::read_to_string(path).map_err(|source| FootprintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let desc: FootprintFile =
            serde_yaml::from_str(&text).map_err(|e| FootprintError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let srs = SpatialRef::parse(&desc.srs)?;
        let transform = GeoTransform::from_gdal(desc.transform)?;
        Self::new(desc.rows, desc.cols, srs, transform)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.rows, self.cols)
    }

    pub fn srs(&self) -> SpatialRef {
        self.srs
    }

    /// Projected coordinates of the center of cell (row, col).
    pub fn projected(&self, row: usize, col: usize) -> (f64, f64) {
        self.transform.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Cell-center x coordinate per column.
    pub fn xpos(&self) -> Vec<f64> {
        (0..self.cols)
            .map(|j| self.transform.apply(j as f64 + 0.5, 0.0).0)
            .collect()
    }

    /// Cell-center y coordinate per row.
    pub fn ypos(&self) -> Vec<f64> {
        (0..self.rows)
            .map(|i| self.transform.apply(0.0, i as f64 + 0.5).1)
            .collect()
    }
}
