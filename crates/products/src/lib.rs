//! NetCDF-backed access to gridded rainfall products.
//!
//! Implements `radar_common::ProductDataset` over the `netcdf` crate
//! (libnetcdf/HDF5). All reads are lazy per variable; nothing is cached
//! and nothing is ever written.

use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::debug;

use radar_common::{GridShape, MaskedGrid, ProductDataset, ProductError, ProductResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose diagnostics to stderr even when errors
/// are handled gracefully by the Rust code (e.g. when probing for optional
/// attributes). This disables that output via H5Eset_auto2 with null
/// handlers; calling it more than once is safe.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and null handlers are a
        // documented way to disable automatic error reporting.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// One product netCDF file, opened read-only.
pub struct NetcdfProduct {
    file: netcdf::File,
    path: PathBuf,
}

impl NetcdfProduct {
    /// Open a product file.
    pub fn open(path: impl Into<PathBuf>) -> ProductResult<Self> {
        silence_hdf5_errors();
        let path = path.into();
        let file = netcdf::open(&path).map_err(|e| ProductError::Open {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "opened product file");
        Ok(Self { file, path })
    }

    fn variable(&self, name: &str) -> ProductResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| ProductError::MissingVariable(name.to_string()))
    }

    fn read_1d_f64(&self, name: &str) -> ProductResult<Vec<f64>> {
        let var = self.variable(name)?;
        expect_rank(&var, name, 1)?;
        var.get_values::<f64, _>(..).map_err(|e| ProductError::Read {
            variable: name.to_string(),
            reason: e.to_string(),
        })
    }

    fn read_2d_unmasked(&self, name: &str) -> ProductResult<MaskedGrid> {
        let var = self.variable(name)?;
        expect_rank(&var, name, 2)?;
        let dims = var.dimensions();
        let shape = GridShape::new(dims[0].len(), dims[1].len());
        let values = var.get_values::<f64, _>(..).map_err(|e| ProductError::Read {
            variable: name.to_string(),
            reason: e.to_string(),
        })?;
        MaskedGrid::new(shape, values).map_err(|e| ProductError::BadDimensions {
            variable: name.to_string(),
            detail: e.to_string(),
        })
    }
}

impl ProductDataset for NetcdfProduct {
    fn path(&self) -> &Path {
        &self.path
    }

    fn x_coords(&self) -> ProductResult<Vec<f64>> {
        self.read_1d_f64("x")
    }

    fn y_coords(&self) -> ProductResult<Vec<f64>> {
        self.read_1d_f64("y")
    }

    fn latitudes(&self) -> ProductResult<MaskedGrid> {
        self.read_2d_unmasked("lat")
    }

    fn longitudes(&self) -> ProductResult<MaskedGrid> {
        self.read_2d_unmasked("lon")
    }

    fn time_units(&self) -> ProductResult<String> {
        let var = self.variable("time")?;
        attr_string(&var, "units").ok_or_else(|| ProductError::MissingAttribute {
            variable: "time".to_string(),
            attribute: "units".to_string(),
        })
    }

    fn time_offsets(&self) -> ProductResult<Vec<i64>> {
        let var = self.variable("time")?;
        expect_rank(&var, "time", 1)?;
        var.get_values::<i64, _>(..).map_err(|e| ProductError::Read {
            variable: "time".to_string(),
            reason: e.to_string(),
        })
    }

    fn frame_count(&self) -> ProductResult<usize> {
        let var = self.variable("rainfall_rate")?;
        expect_rank(&var, "rainfall_rate", 3)?;
        Ok(var.dimensions()[0].len())
    }

    fn rainfall_frame(&self, index: usize) -> ProductResult<MaskedGrid> {
        let var = self.variable("rainfall_rate")?;
        expect_rank(&var, "rainfall_rate", 3)?;
        let dims = var.dimensions();
        if index >= dims[0].len() {
            return Err(ProductError::Read {
                variable: "rainfall_rate".to_string(),
                reason: format!("frame {} out of range ({})", index, dims[0].len()),
            });
        }
        let shape = GridShape::new(dims[1].len(), dims[2].len());
        let values = var
            .get_values::<f64, _>((index, .., ..))
            .map_err(|e| ProductError::Read {
                variable: "rainfall_rate".to_string(),
                reason: e.to_string(),
            })?;
        let fill = attr_f64(&var, "_FillValue");
        MaskedGrid::from_fill_value(shape, values, fill).map_err(|e| {
            ProductError::BadDimensions {
                variable: "rainfall_rate".to_string(),
                detail: e.to_string(),
            }
        })
    }
}

fn expect_rank(var: &netcdf::Variable, name: &str, rank: usize) -> ProductResult<()> {
    let dims = var.dimensions();
    if dims.len() != rank {
        return Err(ProductError::BadDimensions {
            variable: name.to_string(),
            detail: format!("expected rank {}, found rank {}", rank, dims.len()),
        });
    }
    Ok(())
}

/// Check attribute presence without triggering HDF5 lookups on absent names.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn attr_string(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)? {
        Ok(netcdf::AttributeValue::Str(s)) => Some(s),
        _ => None,
    }
}

fn attr_f64(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let value = var.attribute_value(name)?.ok()?;
    f64::try_from(value).ok()
}
