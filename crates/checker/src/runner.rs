//! Sequencing of checks over a directory of products.
//!
//! For each product file the runner opens the container and runs the geo,
//! time and rainfall checks in order, stopping at the file's first failure.
//! By default the run halts at the first failing file; with `keep_going`
//! every file is checked and the summary aggregates the results.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info};
use walkdir::WalkDir;

use imagery::{ImageRecord, ImageryError};
use products::NetcdfProduct;

use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::footprint::Footprint;
use crate::geo::{CoordinateOracle, EmbeddedTransform, GeoValidator};
use crate::rainfall::RainfallReconstructor;
use crate::report::{CheckStage, FileFailure, FileReport, RunSummary};
use crate::temporal::TemporalAligner;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Imagery(#[from] ImageryError),

    #[error("failed to list products under {path}: {reason}")]
    List { path: PathBuf, reason: String },
}

/// Runs the full check sequence over a products directory.
pub struct CheckRunner {
    footprint: Footprint,
    config: CheckConfig,
    oracle: Box<dyn CoordinateOracle>,
}

impl CheckRunner {
    pub fn new(footprint: Footprint, config: CheckConfig) -> Self {
        Self::with_oracle(footprint, config, Box::new(EmbeddedTransform))
    }

    pub fn with_oracle(
        footprint: Footprint,
        config: CheckConfig,
        oracle: Box<dyn CoordinateOracle>,
    ) -> Self {
        Self {
            footprint,
            config,
            oracle,
        }
    }

    /// Check every product file in the configured directory.
    pub fn run(&self) -> Result<RunSummary, RunError> {
        let records = imagery::discover_images(&self.config.images_dir)?;
        let products = discover_products(&self.config.products_dir)?;
        info!(
            products = products.len(),
            images = records.len(),
            "starting product checks"
        );

        let mut summary = RunSummary::default();
        for path in products {
            info!(file = %path.display(), "checking");
            let report = self.check_file(&path, &records);
            match &report.failure {
                None => info!(file = %path.display(), "all checks passed"),
                Some(failure) => error!(
                    file = %path.display(),
                    stage = %failure.stage,
                    error = %failure.error,
                    "check failed"
                ),
            }
            let halt = !report.passed() && !self.config.keep_going;
            summary.reports.push(report);
            if halt {
                break;
            }
        }
        Ok(summary)
    }

    /// Check one product file, capturing the first failure.
    pub fn check_file(&self, path: &Path, records: &[ImageRecord]) -> FileReport {
        FileReport {
            path: path.to_path_buf(),
            failure: self.check_product(path, records).err(),
        }
    }

    fn check_product(&self, path: &Path, records: &[ImageRecord]) -> Result<(), FileFailure> {
        let product = NetcdfProduct::open(path).map_err(|e| FileFailure {
            stage: CheckStage::Open,
            error: CheckError::from(e),
        })?;

        GeoValidator::new(&self.footprint, self.oracle.as_ref(), self.config.sampling)
            .check(&product)
            .map_err(|error| FileFailure {
                stage: CheckStage::Geo,
                error,
            })?;

        let timestamps: Vec<_> = records.iter().map(|r| r.timestamp).collect();
        TemporalAligner::new(&timestamps, self.config.resolution)
            .check(&product)
            .map_err(|error| FileFailure {
                stage: CheckStage::Time,
                error,
            })?;

        RainfallReconstructor::new(records, self.config.resolution, self.footprint.shape())
            .check(&product)
            .map_err(|error| FileFailure {
                stage: CheckStage::Rainfall,
                error,
            })?;

        Ok(())
    }
}

/// Regular files directly under `dir`, sorted by path.
///
/// Checks are independent per file, so the order only affects reporting;
/// sorting keeps runs reproducible.
fn discover_products(dir: &Path) -> Result<Vec<PathBuf>, RunError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| RunError::List {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        if entry.file_type().is_file() {
            paths.push(entry.path().to_path_buf());
        }
    }
    paths.sort();
    Ok(paths)
}
