//! Run driver
//!
//! The [`Driver`] owns a run end to end: it builds the grid, partitions it,
//! launches the workers, closes the fold and writes the report. It is the
//! only component that produces output.

pub mod state_machine;

pub use state_machine::{apply_transition, RunPhase};

use crate::config::RunConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::reduce::{collect_partials, Partition};
use crate::report::{format_grid, OutputFormatter, RunReport};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Coordinates one grid reduction run
pub struct Driver {
    config: RunConfig,
    phase: RunPhase,
}

impl Driver {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            phase: RunPhase::Init,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Execute the run, writing the grid (if requested) and the report to `out`
    pub async fn run<W: Write>(&mut self, out: &mut W) -> Result<RunReport> {
        let config = self.config.clone();
        info!(
            size = config.size,
            workers = config.workers,
            strategy = %config.strategy,
            seed = config.seed,
            "Initializing grid"
        );

        let grid = Arc::new(Grid::random(
            config.size,
            config.value_range(),
            config.seed,
        )?);

        let partition = Partition::new(config.size, config.workers)?;
        self.advance(RunPhase::Partitioned)?;
        debug!(
            strip_size = partition.strip_size(),
            empty_strips = partition.empty_strips(),
            "Partitioned rows into {} strips",
            partition.workers()
        );

        let started = Instant::now();
        self.advance(RunPhase::WorkersRunning)?;
        let aggregator = collect_partials(Arc::clone(&grid), &partition, config.strategy).await?;

        self.advance(RunPhase::Aggregating)?;
        let result = aggregator.finish()?;
        let elapsed = started.elapsed();

        let report = RunReport {
            size: config.size,
            workers: config.workers,
            strategy: config.strategy,
            seed: config.seed,
            result,
            elapsed_secs: elapsed.as_secs_f64(),
        };
        let rendered = OutputFormatter::new(config.format).format(&report)?;
        // Nothing reaches `out` until the fold has succeeded
        if config.print_grid {
            out.write_all(format_grid(&grid).as_bytes())?;
        }
        out.write_all(rendered.as_bytes())?;
        out.flush()?;
        self.advance(RunPhase::Reported)?;

        info!("Run completed in {:.3}s", elapsed.as_secs_f64());
        Ok(report)
    }

    fn advance(&mut self, next: RunPhase) -> Result<()> {
        self.phase = apply_transition(self.phase, next)?;
        debug!(phase = %self.phase, "Run phase changed");
        Ok(())
    }
}
