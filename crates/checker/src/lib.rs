//! Correctness auditor for gridded radar rainfall products.
//!
//! A product is trusted only if every derived quantity can be rebuilt from
//! its sources through an independent code path:
//!
//! - [`geo::GeoValidator`] re-derives the spatial grid from the footprint
//!   and cross-checks sampled lat/lon cells against a reprojection oracle;
//! - [`temporal::TemporalAligner`] rebuilds the time axis from the image
//!   timestamps, resampled into buckets when a resolution is given;
//! - [`rainfall::RainfallReconstructor`] rebuilds the rainfall grids from
//!   the source images and diffs them against the stored frames;
//! - [`runner::CheckRunner`] sequences the three checks over every product
//!   file in a directory.
//!
//! Checks detect mismatches; they never repair them. Each failure is a
//! typed [`CheckError`] naming what disagreed and where.

pub mod config;
pub mod error;
pub mod footprint;
pub mod geo;
pub mod rainfall;
pub mod report;
pub mod runner;
pub mod sampling;
pub mod temporal;

pub use config::{CheckConfig, ConfigError};
pub use error::CheckError;
pub use footprint::{Footprint, FootprintError};
pub use geo::{CoordinateOracle, EmbeddedTransform, GeoValidator};
pub use rainfall::RainfallReconstructor;
pub use report::{CheckStage, FileFailure, FileReport, RunSummary};
pub use runner::{CheckRunner, RunError};
pub use sampling::{SampleConfig, DEFAULT_SAMPLE_SEED};
pub use temporal::{group_by_resolution, TemporalAligner, TimeBucket};
