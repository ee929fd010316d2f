//! Error types for grid reduction runs
//!
//! Every failure a run can hit is a [`MatrixSumError`]. Configuration
//! problems are separated from runtime failures so the binary can pick an
//! exit code without inspecting messages.

use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for unrecoverable runtime failures
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for invalid arguments or configuration
pub const EXIT_USAGE: i32 = 2;

/// Main error type for grid reduction
#[derive(Debug, Error)]
pub enum MatrixSumError {
    // Configuration errors
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Failed to read configuration file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // Grid errors
    #[error("Invalid grid: {reason}")]
    InvalidGrid { reason: String },

    #[error("Failed to allocate {cells} grid cells")]
    AllocationFailed {
        cells: u64,
        #[source]
        source: TryReserveError,
    },

    // Worker and aggregation errors
    #[error("Worker {worker} failed: {reason}")]
    WorkerFailed { worker: usize, reason: String },

    #[error("Partial result from worker {worker} was already folded")]
    DuplicatePartial { worker: usize },

    #[error("Partial result from unknown worker {worker} (expected fewer than {expected})")]
    UnknownWorker { worker: usize, expected: usize },

    #[error("Aggregation incomplete: received {received} of {expected} partial results")]
    MissingPartials { received: usize, expected: usize },

    #[error("No worker produced any cells to reduce")]
    EmptyReduction,

    #[error("Invalid run phase transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    // Output errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MatrixSumError {
    /// Shorthand for a configuration error on a named field
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by user input rather than the run itself
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration { .. } | Self::ConfigRead { .. } | Self::ConfigParse { .. }
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_configuration_error() {
            EXIT_USAGE
        } else {
            EXIT_FAILURE
        }
    }
}

pub type Result<T> = std::result::Result<T, MatrixSumError>;
