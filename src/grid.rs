//! Square integer grid shared read-only by every worker
//!
//! Cells are stored row-major in a single buffer sized exactly to the
//! validated dimension. Once built, a [`Grid`] is never mutated.

use crate::error::{MatrixSumError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::{Range, RangeInclusive};

/// A `size x size` matrix of `i32` values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<i32>,
}

impl Grid {
    /// Build a grid with every cell set to `value`
    pub fn filled(size: usize, value: i32) -> Result<Self> {
        let mut cells = allocate(size)?;
        cells.resize(size * size, value);
        Ok(Self { size, cells })
    }

    /// Build a grid from explicit rows
    ///
    /// Every row must have exactly as many cells as there are rows.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self> {
        let size = rows.len();
        let mut cells = allocate(size)?;
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(MatrixSumError::InvalidGrid {
                    reason: format!(
                        "row {} has {} cells, expected {} for a square grid",
                        index,
                        row.len(),
                        size
                    ),
                });
            }
            cells.extend(row);
        }
        Ok(Self { size, cells })
    }

    /// Build a grid of uniformly random values drawn from `values`
    ///
    /// The same seed always yields the same grid.
    pub fn random(size: usize, values: RangeInclusive<i32>, seed: u64) -> Result<Self> {
        if values.is_empty() {
            return Err(MatrixSumError::InvalidGrid {
                reason: format!(
                    "empty value range {}..={}",
                    values.start(),
                    values.end()
                ),
            });
        }

        let mut cells = allocate(size)?;
        let mut rng = StdRng::seed_from_u64(seed);
        cells.extend((0..size * size).map(|_| rng.random_range(values.clone())));
        Ok(Self { size, cells })
    }

    /// Dimension of the grid
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells
    pub fn cell_count(&self) -> u64 {
        self.cells.len() as u64
    }

    /// Iterator over all rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[i32]> {
        // chunks_exact panics on 0; an empty grid has no rows anyway
        self.cells.chunks_exact(self.size.max(1))
    }

    /// Contiguous cells of a band of rows
    ///
    /// Returns an empty slice for an empty range.
    pub fn band(&self, rows: Range<usize>) -> &[i32] {
        if rows.is_empty() {
            return &[];
        }
        &self.cells[rows.start * self.size..rows.end * self.size]
    }

    /// Single-threaded scan of every cell, used as a cross-check
    ///
    /// Returns `(sum, min, max)`, or `None` for an empty grid.
    pub fn scan(&self) -> Option<(i64, i32, i32)> {
        let min = *self.cells.iter().min()?;
        let max = *self.cells.iter().max()?;
        let sum = self.cells.iter().map(|&v| i64::from(v)).sum();
        Some((sum, min, max))
    }
}

/// Reserve the exact cell buffer up front so allocation failure is reported
/// as an error instead of aborting the process.
fn allocate(size: usize) -> Result<Vec<i32>> {
    let cells = size
        .checked_mul(size)
        .ok_or_else(|| MatrixSumError::InvalidGrid {
            reason: format!("dimension {} overflows the address space", size),
        })?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(cells)
        .map_err(|source| MatrixSumError::AllocationFailed {
            cells: cells as u64,
            source,
        })?;
    Ok(buffer)
}
