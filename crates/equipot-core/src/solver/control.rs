//! Iteration budget, interruption, and the convergence loop.
//!
//! Both relaxation methods share the same outer loop: snapshot the working
//! grid, run one sweep, compare against the snapshot, and stop when every
//! cell passes the convergence test. [`IterationControl`] owns that loop and
//! the hooks that end it early.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use super::{SolverError, DEFAULT_MAX_ITERATIONS};
use crate::types::{GridState, PotentialField, RelaxationResult};

/// Sweep cap and interruption hooks for a solve.
#[derive(Debug, Clone)]
pub struct IterationControl {
    /// Maximum number of full sweeps before giving up.
    pub max_iterations: usize,
    /// Return the partially converged grid instead of an error when the cap,
    /// the time limit, or the cancellation flag stops the loop.
    pub best_effort: bool,
    /// Wall-clock budget for the whole solve.
    pub time_limit: Option<Duration>,
    /// Checked before every sweep; set it from another thread to stop.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for IterationControl {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            best_effort: false,
            time_limit: None,
            cancel: None,
        }
    }
}

/// Per-cell convergence test `|next - prev| <= absolute + relative * |prev|`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Convergence {
    pub relative: f64,
    pub absolute: f64,
}

impl Convergence {
    /// Returns whether every cell passed, and the largest absolute change.
    ///
    /// NaN changes never pass.
    pub fn check(&self, prev: &[f64], next: &[f64]) -> (bool, f64) {
        let mut passed = true;
        let mut max_change = 0.0_f64;
        for (&p, &n) in prev.iter().zip(next) {
            let change = (n - p).abs();
            if !(change <= self.absolute + self.relative * p.abs()) {
                passed = false;
            }
            max_change = max_change.max(change);
        }
        (passed, max_change)
    }
}

impl IterationControl {
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Default::default()
        }
    }

    fn interruption(&self, start: Instant) -> Option<String> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Some("cancelled".into());
            }
        }
        if let Some(limit) = self.time_limit {
            if start.elapsed() >= limit {
                return Some(format!("time limit of {:.3} s exceeded", limit.as_secs_f64()));
            }
        }
        None
    }

    /// Drive `sweep` over a row-major working copy of the seed potential.
    ///
    /// `sweep` receives the flat working buffer and must update it in place.
    pub(crate) fn run<F>(
        &self,
        state: &GridState,
        criterion: Convergence,
        method: &str,
        mut sweep: F,
    ) -> Result<RelaxationResult, SolverError>
    where
        F: FnMut(&mut [f64]),
    {
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidParameter(
                "max_iterations must be at least 1".into(),
            ));
        }

        let (rows, cols) = state.dim();
        debug!(
            "{}: {}x{} grid, {} free cells, rtol={:e}, atol={:e}, max_iterations={}",
            method,
            rows,
            cols,
            state.free_cells(),
            criterion.relative,
            criterion.absolute,
            self.max_iterations
        );

        // `iter()` walks in logical row-major order regardless of memory layout.
        let mut work: Vec<f64> = state.potential().iter().copied().collect();
        let mut prev = work.clone();
        let mut residual = f64::INFINITY;
        let start = Instant::now();

        for iteration in 1..=self.max_iterations {
            if let Some(reason) = self.interruption(start) {
                let err = SolverError::Interrupted {
                    iterations: iteration - 1,
                    reason,
                };
                return self.give_up(err, work, (rows, cols), iteration - 1, residual);
            }

            prev.copy_from_slice(&work);
            sweep(&mut work);

            let (passed, change) = criterion.check(&prev, &work);
            residual = change;
            trace!("{}: sweep {} max change {:.3e}", method, iteration, change);

            if passed {
                debug!(
                    "{}: converged after {} sweeps in {:.3} s (residual {:.3e})",
                    method,
                    iteration,
                    start.elapsed().as_secs_f64(),
                    residual
                );
                return Ok(RelaxationResult {
                    potential: into_grid(work, (rows, cols))?,
                    iterations: iteration,
                    residual,
                    converged: true,
                });
            }
        }

        let err = SolverError::NonConvergence {
            iterations: self.max_iterations,
            residual,
        };
        self.give_up(err, work, (rows, cols), self.max_iterations, residual)
    }

    fn give_up(
        &self,
        err: SolverError,
        work: Vec<f64>,
        dim: (usize, usize),
        iterations: usize,
        residual: f64,
    ) -> Result<RelaxationResult, SolverError> {
        if !self.best_effort {
            return Err(err);
        }
        warn!("returning best-effort result: {}", err);
        Ok(RelaxationResult {
            potential: into_grid(work, dim)?,
            iterations,
            residual,
            converged: false,
        })
    }
}

fn into_grid(work: Vec<f64>, dim: (usize, usize)) -> Result<PotentialField, SolverError> {
    PotentialField::from_shape_vec(dim, work).map_err(|e| SolverError::ComputeError(e.to_string()))
}
