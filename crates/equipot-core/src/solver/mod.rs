//! Relaxation solver abstraction and implementations.
//!
//! The [`PotentialSolver`] trait defines the interface shared by the
//! iterative methods. Successive over-relaxation ([`sor::SorSolver`]) is the
//! reference method; weighted Jacobi ([`jacobi::JacobiSolver`]) trades
//! convergence speed for a sweep that reads only the previous iterate, and by
//! default clamps at the grid edge instead of holding a fixed frame.

pub mod control;
pub mod jacobi;
pub mod sor;
mod stencil;

use thiserror::Error;

use crate::types::{BoundarySpec, GridState, MaskGrid, PotentialField, RelaxationResult};

pub use control::IterationControl;
pub use jacobi::{JacobiEdges, JacobiSolver};
pub use sor::{SorSolver, SweepOrdering};

/// Plain Gauss–Seidel weighting.
pub const DEFAULT_RELAXATION_FACTOR: f64 = 1.0;
/// Relative per-cell change below which a sweep counts as converged.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;
/// Sweep budget applied when the caller does not choose one.
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Errors that can occur while relaxing a potential grid.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Mask shape {mask:?} does not match potential shape {potential:?}")]
    DimensionMismatch {
        mask: (usize, usize),
        potential: (usize, usize),
    },

    #[error("Solver failed to converge after {iterations} iterations (residual: {residual:.2e})")]
    NonConvergence { iterations: usize, residual: f64 },

    #[error("Solve interrupted after {iterations} iterations: {reason}")]
    Interrupted { iterations: usize, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Grid of shape ({rows}, {cols}) is too small; every axis needs at least 2 points")]
    GridTooSmall { rows: usize, cols: usize },

    #[error("Compute error: {0}")]
    ComputeError(String),
}

/// The trait every relaxation method implements.
///
/// Implementations never mutate the [`GridState`]; each call works on an
/// owned copy of the seed potential and hands the result back to the caller.
pub trait PotentialSolver {
    /// Relax the seed potential of `state` until the method's convergence
    /// test passes, leaving fixed cells untouched.
    fn relax(
        &self,
        state: &GridState,
        boundary: BoundarySpec,
    ) -> Result<RelaxationResult, SolverError>;

    /// Human-readable name of the method.
    fn method_name(&self) -> &str;
}

/// Solve the discrete Laplace equation by successive over-relaxation.
///
/// Runs row-major Gauss–Seidel sweeps weighted by `relaxation_factor` until
/// every cell satisfies `|v_next - v_prev| <= tolerance * |v_prev|`, capped at
/// [`DEFAULT_MAX_ITERATIONS`] sweeps. Use [`SorSolver`] directly for control
/// over the cap, ordering, or cancellation.
pub fn solve(
    mask: &MaskGrid,
    potential0: &PotentialField,
    boundary: BoundarySpec,
    relaxation_factor: f64,
    tolerance: f64,
) -> Result<PotentialField, SolverError> {
    let state = GridState::new(mask.clone(), potential0.clone())?;
    let solver = SorSolver::new(relaxation_factor, tolerance);
    Ok(solver.relax(&state, boundary)?.potential)
}
