//! Pure run-phase state machine
//!
//! ```text
//! INIT -> PARTITIONED -> WORKERS_RUNNING -> AGGREGATING -> REPORTED
//! ```
//!
//! Phases only move forward one step at a time. `REPORTED` is terminal and
//! there are no retries: a failure leaves the run in the phase it failed in.

use crate::error::{MatrixSumError, Result};
use std::fmt;

/// Phase of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Partitioned,
    WorkersRunning,
    Aggregating,
    Reported,
}

impl RunPhase {
    /// The only phase reachable from this one
    pub fn next(self) -> Option<RunPhase> {
        match self {
            RunPhase::Init => Some(RunPhase::Partitioned),
            RunPhase::Partitioned => Some(RunPhase::WorkersRunning),
            RunPhase::WorkersRunning => Some(RunPhase::Aggregating),
            RunPhase::Aggregating => Some(RunPhase::Reported),
            RunPhase::Reported => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "INIT",
            RunPhase::Partitioned => "PARTITIONED",
            RunPhase::WorkersRunning => "WORKERS_RUNNING",
            RunPhase::Aggregating => "AGGREGATING",
            RunPhase::Reported => "REPORTED",
        };
        f.write_str(name)
    }
}

/// Move from `from` to `to`, rejecting anything but the next phase
pub fn apply_transition(from: RunPhase, to: RunPhase) -> Result<RunPhase> {
    if from.next() == Some(to) {
        Ok(to)
    } else {
        Err(MatrixSumError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
