//! Barrier-based aggregation
//!
//! Every worker deposits its partial into its own slot and then waits at a
//! shared [`CountingBarrier`]. Once all workers have arrived, worker
//! [`AGGREGATOR_WORKER`] drains every slot, its own included, into an
//! [`Aggregator`]. Partial results only ever travel through the slots.

use super::aggregate::Aggregator;
use super::partition::{Partition, Strip};
use super::worker::{compute_partial, PartialResult};
use crate::error::{MatrixSumError, Result};
use crate::grid::Grid;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use tracing::{debug, error};

/// Worker that performs the fold after the barrier
pub const AGGREGATOR_WORKER: usize = 0;

/// Reusable counting barrier
///
/// Arrival count and generation live behind one mutex. The last arrival of
/// a generation resets the count, advances the generation and wakes every
/// waiter. Writes made before [`wait`](Self::wait) are visible to every
/// party once its `wait` returns: each arrival releases the mutex after
/// counting itself, and each waiter re-acquires it before returning.
#[derive(Debug)]
pub struct CountingBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

#[derive(Debug, Default)]
struct BarrierState {
    arrived: usize,
    generation: u64,
}

impl CountingBarrier {
    /// Barrier for `parties` participants (at least one)
    pub fn new(parties: usize) -> Self {
        Self {
            parties: parties.max(1),
            state: Mutex::new(BarrierState::default()),
            released: Condvar::new(),
        }
    }

    /// Block until every party of the current generation has arrived
    ///
    /// Returns `true` for exactly one caller per generation: the last to
    /// arrive.
    pub fn wait(&self) -> bool {
        let mut state = self.lock();
        let generation = state.generation;
        if self.count_arrival(&mut state) {
            return true;
        }
        while state.generation == generation {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        false
    }

    /// Count an arrival for a party that will never call [`wait`](Self::wait)
    pub fn arrive(&self) {
        let mut state = self.lock();
        self.count_arrival(&mut state);
    }

    fn count_arrival(&self, state: &mut BarrierState) -> bool {
        state.arrived += 1;
        if state.arrived < self.parties {
            return false;
        }
        state.arrived = 0;
        state.generation += 1;
        self.released.notify_all();
        true
    }

    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        // Nothing panics while holding the lock, so a poisoned state is still consistent
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

type SlotOutcome = std::result::Result<PartialResult, String>;

/// Shared state for one barrier-synchronised run
struct Rendezvous {
    slots: Vec<Mutex<Option<SlotOutcome>>>,
    barrier: CountingBarrier,
    folded: Mutex<Option<Result<Aggregator>>>,
}

impl Rendezvous {
    fn new(workers: usize) -> Self {
        Self {
            slots: (0..workers).map(|_| Mutex::new(None)).collect(),
            barrier: CountingBarrier::new(workers),
            folded: Mutex::new(None),
        }
    }

    fn deposit(&self, worker: usize, outcome: SlotOutcome) {
        if let Some(slot) = self.slots.get(worker) {
            *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
        }
    }

    /// Drain every slot through the same fold; only valid after the barrier
    fn fold(&self) -> Result<Aggregator> {
        let mut aggregator = Aggregator::new(self.slots.len());
        for (worker, slot) in self.slots.iter().enumerate() {
            let outcome = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
            match outcome {
                Some(Ok(partial)) => aggregator.absorb(partial)?,
                Some(Err(reason)) => return Err(MatrixSumError::WorkerFailed { worker, reason }),
                None => {
                    return Err(MatrixSumError::WorkerFailed {
                        worker,
                        reason: "no partial result was deposited".to_string(),
                    })
                }
            }
        }
        Ok(aggregator)
    }

    fn publish(&self, folded: Result<Aggregator>) {
        *self.folded.lock().unwrap_or_else(PoisonError::into_inner) = Some(folded);
    }

    fn into_folded(self) -> Option<Result<Aggregator>> {
        self.folded
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Run one scoped thread per strip and fold on the aggregator worker
pub fn run_barrier(grid: &Grid, partition: &Partition) -> Result<Aggregator> {
    run_barrier_with(grid, partition, compute_partial)
}

/// Same as [`run_barrier`] with a caller-supplied strip reduction
pub fn run_barrier_with<F>(grid: &Grid, partition: &Partition, work: F) -> Result<Aggregator>
where
    F: Fn(&Grid, &Strip) -> PartialResult + Sync,
{
    let rendezvous = Rendezvous::new(partition.workers());
    let mut spawn_failure = None;

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(partition.workers());
        for strip in partition.strips() {
            let rendezvous = &rendezvous;
            let work = &work;
            let spawned = thread::Builder::new()
                .name(format!("strip-worker-{}", strip.worker))
                .spawn_scoped(scope, move || strip_worker(grid, strip, rendezvous, work));

            match spawned {
                Ok(handle) => handles.push((strip.worker, handle)),
                Err(e) => {
                    error!(worker = strip.worker, "Failed to spawn strip worker: {}", e);
                    spawn_failure = Some(MatrixSumError::WorkerFailed {
                        worker: strip.worker,
                        reason: format!("thread spawn failed: {}", e),
                    });
                    break;
                }
            }
        }

        // Release workers already waiting for parties that never started
        for _ in handles.len()..partition.workers() {
            rendezvous.barrier.arrive();
        }

        for (worker, handle) in handles {
            if handle.join().is_err() && spawn_failure.is_none() {
                spawn_failure = Some(MatrixSumError::WorkerFailed {
                    worker,
                    reason: "thread panicked outside the strip reduction".to_string(),
                });
            }
        }
    });

    if let Some(failure) = spawn_failure {
        return Err(failure);
    }
    rendezvous
        .into_folded()
        .unwrap_or_else(|| {
            Err(MatrixSumError::WorkerFailed {
                worker: AGGREGATOR_WORKER,
                reason: "aggregator finished without publishing a result".to_string(),
            })
        })
}

fn strip_worker<F>(grid: &Grid, strip: &Strip, rendezvous: &Rendezvous, work: &F)
where
    F: Fn(&Grid, &Strip) -> PartialResult,
{
    // A panicking strip must still reach the barrier or its peers never wake
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| work(grid, strip)))
        .map_err(|payload| format!("strip reduction panicked: {}", panic_message(&*payload)));
    rendezvous.deposit(strip.worker, outcome);

    rendezvous.barrier.wait();

    if strip.worker == AGGREGATOR_WORKER {
        let folded = rendezvous.fold();
        if let Ok(aggregator) = &folded {
            debug!(
                absorbed = aggregator.absorbed(),
                "Aggregator worker folded all slots"
            );
        }
        rendezvous.publish(folded);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
