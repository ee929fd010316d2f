//! Run summaries
//!
//! A [`RunReport`] is built once per run by the driver and rendered by
//! [`OutputFormatter`].

pub mod formatter;

pub use formatter::{format_grid, OutputFormatter, ReportFormat};

use crate::reduce::{GlobalResult, SyncStrategy};
use serde::Serialize;

/// Outcome of one complete run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub size: usize,
    pub workers: usize,
    pub strategy: SyncStrategy,
    pub seed: u64,
    #[serde(flatten)]
    pub result: GlobalResult,
    /// Wall-clock time from worker launch to the end of the fold
    pub elapsed_secs: f64,
}
