//! Source radar image handling.
//!
//! Radar acquisitions arrive as 8-bit grayscale PNGs named after their
//! acquisition time (`2020-01-01_00:05:00.png`). This crate discovers the
//! images for a run, decodes them into masked signal grids, and converts
//! signal to rainfall rate. The sorted image sequence defines the
//! canonical temporal axis the product is audited against.

mod error;
pub mod rainfall;
pub mod signal;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::debug;
use walkdir::WalkDir;

pub use error::{ImageryError, ImageryResult};
pub use rainfall::estimate_rainfall;
pub use signal::load_signal;

/// Filename timestamp format (the stem of `<timestamp>.png`).
const FILENAME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// One source image: acquisition timestamp plus file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub timestamp: DateTime<Utc>,
    pub path: PathBuf,
}

/// Parse an image filename stem into its acquisition timestamp.
pub fn parse_image_timestamp(stem: &str) -> ImageryResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(stem, FILENAME_FORMAT)
        .map_err(|_| ImageryError::BadTimestamp(stem.to_string()))?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Filename (with extension) for an acquisition timestamp.
pub fn image_filename(timestamp: DateTime<Utc>) -> String {
    format!("{}.png", timestamp.format(FILENAME_FORMAT))
}

/// Discover the source images directly under `dir`, sorted by timestamp.
///
/// Non-PNG entries are ignored; a PNG whose stem does not parse is an
/// error, since skipping it would silently change the temporal axis.
pub fn discover_images(dir: &Path) -> ImageryResult<Vec<ImageRecord>> {
    let mut records = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ImageryError::List {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let is_png = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));
        if !is_png {
            debug!(path = %path.display(), "skipping non-PNG entry");
            continue;
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ImageryError::BadTimestamp(path.display().to_string()))?;
        records.push(ImageRecord {
            timestamp: parse_image_timestamp(stem)?,
            path: path.to_path_buf(),
        });
    }
    records.sort_by_key(|r| r.timestamp);
    debug!(count = records.len(), dir = %dir.display(), "discovered source images");
    Ok(records)
}
