//! # matrix-sum
//!
//! Sum, maximum and minimum of a square integer grid, computed by a fixed
//! set of workers that each reduce one horizontal strip.
//!
//! ## Usage
//!
//! ```bash
//! matrix-sum [SIZE] [WORKERS] [--strategy join|barrier] [--format text|json|json-pretty]
//! ```
//!
//! ## Modules
//!
//! - `app` - Process setup: verbosity, logging, fatal errors
//! - `config` - Layered run configuration (defaults, TOML file, CLI)
//! - `driver` - Owns a run from grid creation to the printed report
//! - `error` - Error type and exit codes
//! - `grid` - The read-only integer grid
//! - `reduce` - Partitioning, strip workers, aggregation and the two sync disciplines
//! - `report` - Run summaries and output formatting
pub mod app;
pub mod config;
pub mod driver;
pub mod error;
pub mod grid;
pub mod reduce;
pub mod report;

pub use error::{MatrixSumError, Result};
