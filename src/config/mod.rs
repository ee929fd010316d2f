//! Run configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! command-line flags. [`ConfigLayer`] holds one layer with every field
//! optional; [`RunConfig::resolve`] validates the merged layers and clamps
//! size and worker count to their maxima.

use crate::error::{MatrixSumError, Result};
use crate::reduce::SyncStrategy;
use crate::report::ReportFormat;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{debug, warn};

/// Default (and default upper bound of) the grid dimension
pub const DEFAULT_MAX_SIZE: usize = 10_000;
/// Default (and default upper bound of) the worker count
pub const DEFAULT_MAX_WORKERS: usize = 10;
/// Largest dimension for which an `i64` sum of `i32` cells cannot overflow
pub const HARD_MAX_SIZE: usize = 65_535;
/// Upper bound on any configured worker maximum
pub const HARD_MAX_WORKERS: usize = 1_024;
/// Smallest generated cell value
pub const DEFAULT_MIN_VALUE: i32 = 0;
/// Largest generated cell value
pub const DEFAULT_MAX_VALUE: i32 = 98;

/// One layer of settings, as read from a file or the command line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub size: Option<usize>,
    pub workers: Option<usize>,
    pub max_size: Option<usize>,
    pub max_workers: Option<usize>,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
    pub seed: Option<u64>,
    pub strategy: Option<SyncStrategy>,
    pub format: Option<ReportFormat>,
    pub print_grid: Option<bool>,
}

impl ConfigLayer {
    /// Load a layer from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| MatrixSumError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let layer = toml::from_str(&content).map_err(|source| MatrixSumError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(layer)
    }

    /// Stack `overrides` on top of this layer
    pub fn merge(self, overrides: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            size: overrides.size.or(self.size),
            workers: overrides.workers.or(self.workers),
            max_size: overrides.max_size.or(self.max_size),
            max_workers: overrides.max_workers.or(self.max_workers),
            min_value: overrides.min_value.or(self.min_value),
            max_value: overrides.max_value.or(self.max_value),
            seed: overrides.seed.or(self.seed),
            strategy: overrides.strategy.or(self.strategy),
            format: overrides.format.or(self.format),
            print_grid: overrides.print_grid.or(self.print_grid),
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub size: usize,
    pub workers: usize,
    pub max_size: usize,
    pub max_workers: usize,
    pub min_value: i32,
    pub max_value: i32,
    pub seed: u64,
    pub strategy: SyncStrategy,
    pub format: ReportFormat,
    pub print_grid: bool,
}

impl RunConfig {
    /// Validate a merged layer and fill in defaults
    ///
    /// A missing seed is drawn at random so the run can still be reproduced
    /// from the logged value.
    pub fn resolve(layer: ConfigLayer) -> Result<Self> {
        let max_size = bounded("max_size", layer.max_size, DEFAULT_MAX_SIZE, HARD_MAX_SIZE)?;
        let max_workers = bounded(
            "max_workers",
            layer.max_workers,
            DEFAULT_MAX_WORKERS,
            HARD_MAX_WORKERS,
        )?;
        let size = clamped("size", layer.size, max_size)?;
        let workers = clamped("workers", layer.workers, max_workers)?;

        let min_value = layer.min_value.unwrap_or(DEFAULT_MIN_VALUE);
        let max_value = layer.max_value.unwrap_or(DEFAULT_MAX_VALUE);
        if min_value > max_value {
            return Err(MatrixSumError::invalid_config(
                "min_value",
                format!(
                    "minimum value {} is greater than maximum value {}",
                    min_value, max_value
                ),
            ));
        }

        let seed = layer.seed.unwrap_or_else(rand::random);

        Ok(Self {
            size,
            workers,
            max_size,
            max_workers,
            min_value,
            max_value,
            seed,
            strategy: layer.strategy.unwrap_or_default(),
            format: layer.format.unwrap_or_default(),
            print_grid: layer.print_grid.unwrap_or(false),
        })
    }

    /// Range generated cell values are drawn from
    pub fn value_range(&self) -> RangeInclusive<i32> {
        self.min_value..=self.max_value
    }
}

/// A configured maximum: positive and no larger than the hard limit
fn bounded(field: &str, value: Option<usize>, default: usize, limit: usize) -> Result<usize> {
    match value {
        None => Ok(default),
        Some(0) => Err(MatrixSumError::invalid_config(field, "must be a positive integer")),
        Some(v) if v > limit => Err(MatrixSumError::invalid_config(
            field,
            format!("{} exceeds the supported limit of {}", v, limit),
        )),
        Some(v) => Ok(v),
    }
}

/// A requested amount: positive, defaulting to and clamped at `max`
fn clamped(field: &str, value: Option<usize>, max: usize) -> Result<usize> {
    match value {
        None => Ok(max),
        Some(0) => Err(MatrixSumError::invalid_config(field, "must be a positive integer")),
        Some(v) if v > max => {
            warn!("Requested {} {} exceeds maximum {}, clamping", field, v, max);
            Ok(max)
        }
        Some(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests;
