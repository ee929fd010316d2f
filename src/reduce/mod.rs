//! Fork/reduce over grid strips
//!
//! A grid is split into one row strip per worker by [`partition`], each
//! strip is reduced independently by [`worker`], and the partial results are
//! folded by [`aggregate`]. How partials travel from workers to the fold is
//! picked by [`SyncStrategy`]; a run uses exactly one discipline:
//!
//! - [`join`]: the coordinator awaits every task handle and folds as
//!   results arrive.
//! - [`barrier`]: workers fill per-worker slots, meet at a counting barrier,
//!   and worker 0 folds every slot.

pub mod aggregate;
pub mod barrier;
pub mod join;
pub mod partition;
pub mod worker;

pub use aggregate::{fold_partials, Aggregator, GlobalResult};
pub use barrier::{run_barrier, CountingBarrier, AGGREGATOR_WORKER};
pub use join::run_join;
pub use partition::{Partition, Strip};
pub use worker::{compute_partial, Extrema, PartialResult};

use crate::error::{MatrixSumError, Result};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::task;

/// How partial results are handed from workers to the fold
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SyncStrategy {
    /// Await each worker's completion handle and fold in arrival order
    #[default]
    Join,
    /// Rendezvous at a counting barrier, then worker 0 folds every slot
    Barrier,
}

impl fmt::Display for SyncStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Join => write!(f, "join"),
            Self::Barrier => write!(f, "barrier"),
        }
    }
}

/// Run every strip of `partition` and return the completed fold
pub async fn collect_partials(
    grid: Arc<Grid>,
    partition: &Partition,
    strategy: SyncStrategy,
) -> Result<Aggregator> {
    match strategy {
        SyncStrategy::Join => run_join(grid, partition).await,
        SyncStrategy::Barrier => {
            // Scoped threads block, so keep them off the async workers
            let partition = partition.clone();
            task::spawn_blocking(move || run_barrier(&grid, &partition))
                .await
                .map_err(|e| MatrixSumError::WorkerFailed {
                    worker: AGGREGATOR_WORKER,
                    reason: format!("barrier coordinator failed: {}", e),
                })?
        }
    }
}

/// Reduce a whole grid with `workers` strips
pub async fn reduce_grid(
    grid: Arc<Grid>,
    workers: usize,
    strategy: SyncStrategy,
) -> Result<GlobalResult> {
    let partition = Partition::new(grid.size(), workers)?;
    collect_partials(grid, &partition, strategy).await?.finish()
}
