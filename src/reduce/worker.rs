//! Per-strip reduction
//!
//! A worker scans its strip exactly once and returns a [`PartialResult`].
//! It never writes shared state and never logs, so it is safe to run on any
//! thread without coordination.

use super::partition::Strip;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// Smallest and largest value seen in a non-empty set of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extrema {
    pub min: i32,
    pub max: i32,
}

impl Extrema {
    /// Combine two extrema; commutative and associative
    pub fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Local result of one worker over one strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialResult {
    /// Worker that produced this result
    pub worker: usize,
    /// Number of cells scanned
    pub cells: u64,
    /// Sum of the scanned cells
    pub sum: i64,
    /// `None` when the strip had no rows
    pub extrema: Option<Extrema>,
}

impl PartialResult {
    /// Result of a strip with no rows: identity for the fold
    pub fn empty(worker: usize) -> Self {
        Self {
            worker,
            cells: 0,
            sum: 0,
            extrema: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.extrema.is_some()
    }
}

/// Scan every cell of `strip` and reduce it to sum, min and max
pub fn compute_partial(grid: &Grid, strip: &Strip) -> PartialResult {
    let cells = grid.band(strip.rows());
    if cells.is_empty() {
        return PartialResult::empty(strip.worker);
    }

    let mut sum = 0i64;
    let mut min = i32::MAX;
    let mut max = i32::MIN;
    for &value in cells {
        sum += i64::from(value);
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }

    PartialResult {
        worker: strip.worker,
        cells: cells.len() as u64,
        sum,
        extrema: Some(Extrema { min, max }),
    }
}
