//! Run configuration for the check orchestrator.

use std::path::PathBuf;

use thiserror::Error;

use crate::sampling::SampleConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("resolution must be a positive number of seconds")]
    ZeroResolution,

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}

/// Everything a check run needs besides the footprint.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Directory containing the product files to audit.
    pub products_dir: PathBuf,
    /// Directory containing the source PNG images.
    pub images_dir: PathBuf,
    /// Resampling resolution in seconds, if the product was built with one.
    pub resolution: Option<u64>,
    /// Sampling policy for the coordinate cross-check.
    pub sampling: SampleConfig,
    /// Keep checking remaining files after a failure instead of halting.
    pub keep_going: bool,
}

impl CheckConfig {
    pub fn new(products_dir: impl Into<PathBuf>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            products_dir: products_dir.into(),
            images_dir: images_dir.into(),
            resolution: None,
            sampling: SampleConfig::default(),
            keep_going: false,
        }
    }

    pub fn with_resolution(mut self, resolution: Option<u64>) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_sampling(mut self, sampling: SampleConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution == Some(0) {
            return Err(ConfigError::ZeroResolution);
        }
        for dir in [&self.products_dir, &self.images_dir] {
            if !dir.is_dir() {
                return Err(ConfigError::NotADirectory(dir.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_resolution_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            CheckConfig::new(dir.path(), dir.path()).with_resolution(Some(0));
        assert!(matches!(config.validate(), Err(ConfigError::ZeroResolution)));
    }

    #[test]
    fn test_missing_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = CheckConfig::new(dir.path().join("absent"), dir.path());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = CheckConfig::new(dir.path(), dir.path()).with_resolution(Some(600));
        config.validate().unwrap();
    }
}
