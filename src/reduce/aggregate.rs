//! Folding partial results into the global answer
//!
//! The fold starts from the identity (zero sum, no extrema) and absorbs
//! every worker's partial through [`Aggregator::absorb`], in whatever order
//! they arrive. Sum, min and max are all commutative and associative, so
//! arrival order never changes the result.

use super::worker::{Extrema, PartialResult};
use crate::error::{MatrixSumError, Result};
use serde::{Deserialize, Serialize};

/// Final reduction over the whole grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalResult {
    pub sum: i64,
    pub min: i32,
    pub max: i32,
    /// Cells folded in, always `size * size` for a complete run
    pub cells: u64,
}

/// Incremental fold over per-worker partial results
#[derive(Debug, Clone)]
pub struct Aggregator {
    sum: i64,
    cells: u64,
    extrema: Option<Extrema>,
    received: Vec<bool>,
    absorbed: usize,
}

impl Aggregator {
    /// Start an empty fold expecting one partial from each of `workers`
    pub fn new(workers: usize) -> Self {
        Self {
            sum: 0,
            cells: 0,
            extrema: None,
            received: vec![false; workers],
            absorbed: 0,
        }
    }

    pub fn expected(&self) -> usize {
        self.received.len()
    }

    pub fn absorbed(&self) -> usize {
        self.absorbed
    }

    pub fn is_complete(&self) -> bool {
        self.absorbed == self.expected()
    }

    /// Fold one partial in
    ///
    /// Each worker's partial is accepted exactly once. Partials without data
    /// add nothing to the sum and are skipped by the min/max fold.
    pub fn absorb(&mut self, partial: PartialResult) -> Result<()> {
        let expected = self.expected();
        let slot = self
            .received
            .get_mut(partial.worker)
            .ok_or(MatrixSumError::UnknownWorker {
                worker: partial.worker,
                expected,
            })?;
        if *slot {
            return Err(MatrixSumError::DuplicatePartial {
                worker: partial.worker,
            });
        }
        *slot = true;
        self.absorbed += 1;

        self.sum += partial.sum;
        self.cells += partial.cells;
        self.extrema = match (self.extrema, partial.extrema) {
            (Some(acc), Some(local)) => Some(acc.merge(local)),
            (acc, local) => acc.or(local),
        };
        Ok(())
    }

    /// Close the fold once every worker has reported
    pub fn finish(self) -> Result<GlobalResult> {
        if !self.is_complete() {
            return Err(MatrixSumError::MissingPartials {
                received: self.absorbed,
                expected: self.expected(),
            });
        }
        let Extrema { min, max } = self.extrema.ok_or(MatrixSumError::EmptyReduction)?;

        Ok(GlobalResult {
            sum: self.sum,
            min,
            max,
            cells: self.cells,
        })
    }
}

/// Fold a complete set of partials in the order given
pub fn fold_partials<I>(workers: usize, partials: I) -> Result<GlobalResult>
where
    I: IntoIterator<Item = PartialResult>,
{
    let mut aggregator = Aggregator::new(workers);
    for partial in partials {
        aggregator.absorb(partial)?;
    }
    aggregator.finish()
}
