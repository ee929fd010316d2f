//! Join-based aggregation
//!
//! Each strip runs on its own blocking task. The coordinator holds every
//! completion handle and folds partials in the order tasks finish; it is the
//! only place partial results cross threads.

use super::aggregate::Aggregator;
use super::partition::{Partition, Strip};
use super::worker::{compute_partial, PartialResult};
use crate::error::{MatrixSumError, Result};
use crate::grid::Grid;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::task::{self, JoinError};
use tracing::{debug, trace};

/// Run one blocking task per strip and fold results as they complete
pub async fn run_join(grid: Arc<Grid>, partition: &Partition) -> Result<Aggregator> {
    run_join_with(grid, partition, compute_partial).await
}

/// Same as [`run_join`] with a caller-supplied strip reduction
pub async fn run_join_with<F>(
    grid: Arc<Grid>,
    partition: &Partition,
    work: F,
) -> Result<Aggregator>
where
    F: Fn(&Grid, &Strip) -> PartialResult + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let mut pending = FuturesUnordered::new();

    for strip in partition.strips().iter().cloned() {
        let grid = Arc::clone(&grid);
        let work = Arc::clone(&work);
        let worker = strip.worker;
        trace!(worker, rows = ?strip.rows(), "Spawning strip task");

        let handle = task::spawn_blocking(move || work(grid.as_ref(), &strip));
        pending.push(async move { (worker, handle.await) });
    }

    let mut aggregator = Aggregator::new(partition.workers());
    while let Some((worker, joined)) = pending.next().await {
        let partial = joined.map_err(|e| MatrixSumError::WorkerFailed {
            worker,
            reason: describe_join_error(&e),
        })?;
        debug!(
            worker,
            cells = partial.cells,
            remaining = pending.len(),
            "Folding partial result"
        );
        aggregator.absorb(partial)?;
    }

    Ok(aggregator)
}

fn describe_join_error(error: &JoinError) -> String {
    if error.is_panic() {
        "task panicked".to_string()
    } else {
        format!("task did not complete: {}", error)
    }
}
