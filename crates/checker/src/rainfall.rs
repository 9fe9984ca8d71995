//! Rainfall-rate reconstruction and comparison.
//!
//! Each source image decodes to a signal grid and converts to a rainfall
//! grid through the shared estimation function. Without resampling the
//! product must store one matching frame per image; with resampling it
//! must store one frame per time bucket, equal to the masked mean of the
//! bucket's members.

use chrono::{DateTime, Utc};
use tracing::debug;

use imagery::{estimate_rainfall, load_signal, ImageRecord};
use radar_common::{compare_masked, GridShape, MaskedGrid, ProductDataset, Tolerance};

use crate::error::CheckError;
use crate::temporal::group_by_resolution;

/// Checks stored rainfall frames against frames rebuilt from the images.
pub struct RainfallReconstructor<'a> {
    records: &'a [ImageRecord],
    resolution: Option<u64>,
    shape: GridShape,
}

impl<'a> RainfallReconstructor<'a> {
    /// `shape` is the footprint grid shape every frame must have.
    pub fn new(records: &'a [ImageRecord], resolution: Option<u64>, shape: GridShape) -> Self {
        Self {
            records,
            resolution,
            shape,
        }
    }

    pub fn check(&self, product: &dyn ProductDataset) -> Result<(), CheckError> {
        let stored = product.frame_count()?;
        match self.resolution {
            None => self.check_per_image(product, stored),
            Some(resolution) => self.check_resampled(product, stored, resolution),
        }
    }

    /// One stored frame per source image.
    fn check_per_image(&self, product: &dyn ProductDataset, stored: usize) -> Result<(), CheckError> {
        if stored != self.records.len() {
            return Err(CheckError::RainfallFrameCount {
                expected: self.records.len(),
                actual: stored,
            });
        }
        for (index, record) in self.records.iter().enumerate() {
            let expected = self.reconstruct(record)?;
            let frame = product.rainfall_frame(index)?;
            compare_frame(index, &frame, &expected)?;
        }
        debug!(frames = stored, "rainfall frames match");
        Ok(())
    }

    /// One stored frame per time bucket, holding the member mean.
    fn check_resampled(
        &self,
        product: &dyn ProductDataset,
        stored: usize,
        resolution: u64,
    ) -> Result<(), CheckError> {
        let frames: Vec<(DateTime<Utc>, MaskedGrid)> = self
            .records
            .iter()
            .map(|record| Ok((record.timestamp, self.reconstruct(record)?)))
            .collect::<Result<_, CheckError>>()?;

        // The grouping here must agree with the temporal check's; both call
        // the same partition function on the same ordered sequence.
        let buckets = group_by_resolution(frames, resolution);
        if stored != buckets.len() {
            return Err(CheckError::RainfallFrameCount {
                expected: buckets.len(),
                actual: stored,
            });
        }

        for (index, bucket) in buckets.iter().enumerate() {
            let members: Vec<MaskedGrid> =
                bucket.members.iter().map(|(_, grid)| grid.clone()).collect();
            let expected =
                MaskedGrid::mean_of(&members).map_err(|e| CheckError::ShapeMismatch {
                    variable: "rainfall_rate".to_string(),
                    expected: self.shape.to_string(),
                    actual: e.to_string(),
                })?;
            let frame = product.rainfall_frame(index)?;
            compare_frame(index, &frame, &expected)?;
        }
        debug!(buckets = stored, "resampled rainfall frames match");
        Ok(())
    }

    /// Rebuild the rainfall grid for one source image.
    fn reconstruct(&self, record: &ImageRecord) -> Result<MaskedGrid, CheckError> {
        let signal = load_signal(&record.path)?;
        let rainfall = estimate_rainfall(&signal);
        if rainfall.shape() != self.shape {
            return Err(CheckError::ShapeMismatch {
                variable: record.path.display().to_string(),
                expected: self.shape.to_string(),
                actual: rainfall.shape().to_string(),
            });
        }
        Ok(rainfall)
    }
}

fn compare_frame(
    index: usize,
    stored: &MaskedGrid,
    expected: &MaskedGrid,
) -> Result<(), CheckError> {
    if stored.shape() != expected.shape() {
        return Err(CheckError::ShapeMismatch {
            variable: format!("rainfall_rate[{}]", index),
            expected: expected.shape().to_string(),
            actual: stored.shape().to_string(),
        });
    }
    compare_masked(stored, expected, Tolerance::RAINFALL).map_err(|m| {
        CheckError::RainfallMismatch {
            frame: index,
            row: m.row,
            col: m.col,
            actual: m.actual,
            expected: m.expected,
        }
    })
}
