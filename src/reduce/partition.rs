//! Static row partitioning
//!
//! Rows `[0, size)` are split into one contiguous strip per worker. Every
//! strip has `size / workers` rows except the last, which also takes the
//! remainder. With more workers than rows the leading strips are empty.

use crate::error::{MatrixSumError, Result};
use serde::Serialize;
use std::ops::Range;

/// Half-open band of rows owned by one worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strip {
    /// Index of the owning worker
    pub worker: usize,
    /// First row of the strip
    pub start: usize,
    /// One past the last row of the strip
    pub end: usize,
}

impl Strip {
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The full assignment of rows to workers for one grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    size: usize,
    strip_size: usize,
    strips: Vec<Strip>,
}

impl Partition {
    /// Partition `size` rows across `workers` strips
    pub fn new(size: usize, workers: usize) -> Result<Self> {
        if size == 0 {
            return Err(MatrixSumError::invalid_config(
                "size",
                "grid dimension must be at least 1",
            ));
        }
        if workers == 0 {
            return Err(MatrixSumError::invalid_config(
                "workers",
                "at least one worker is required",
            ));
        }

        let strip_size = size / workers;
        let strips = (0..workers)
            .map(|worker| {
                let start = worker * strip_size;
                let end = if worker == workers - 1 {
                    size
                } else {
                    start + strip_size
                };
                Strip { worker, start, end }
            })
            .collect();

        Ok(Self {
            size,
            strip_size,
            strips,
        })
    }

    /// Rows given to every worker but the last
    pub fn strip_size(&self) -> usize {
        self.strip_size
    }

    pub fn workers(&self) -> usize {
        self.strips.len()
    }

    pub fn strips(&self) -> &[Strip] {
        &self.strips
    }

    /// Number of workers that own no rows
    pub fn empty_strips(&self) -> usize {
        self.strips.iter().filter(|s| s.is_empty()).count()
    }

    /// How many strips cover each row
    ///
    /// A valid partition yields exactly one for every row.
    pub fn coverage(&self) -> Vec<usize> {
        let mut counts = vec![0; self.size];
        for strip in &self.strips {
            for row in strip.rows() {
                counts[row] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_division() {
        let partition = Partition::new(4, 2).unwrap();
        let rows: Vec<_> = partition.strips().iter().map(Strip::rows).collect();
        assert_eq!(rows, vec![0..2, 2..4]);
        assert_eq!(partition.strip_size(), 2);
    }

    #[test]
    fn test_last_strip_absorbs_remainder() {
        let partition = Partition::new(5, 2).unwrap();
        let rows: Vec<_> = partition.strips().iter().map(Strip::rows).collect();
        assert_eq!(rows, vec![0..2, 2..5]);
    }

    #[test]
    fn test_more_workers_than_rows() {
        let partition = Partition::new(3, 5).unwrap();
        assert_eq!(partition.workers(), 5);
        assert_eq!(partition.empty_strips(), 4);
        assert_eq!(partition.strips()[4].rows(), 0..3);
        assert!(partition.coverage().iter().all(|&count| count == 1));
    }

    #[test]
    fn test_single_worker_owns_everything() {
        let partition = Partition::new(7, 1).unwrap();
        assert_eq!(partition.strips(), &[Strip { worker: 0, start: 0, end: 7 }]);
    }

    #[test]
    fn test_zero_inputs_rejected() {
        assert!(Partition::new(0, 2).unwrap_err().is_configuration_error());
        assert!(Partition::new(2, 0).unwrap_err().is_configuration_error());
    }
}
