//! Weighted Jacobi relaxation.
//!
//! Every free cell is recomputed from the previous iterate only, so a sweep
//! has no intra-sweep ordering dependence and each row can be processed on a
//! separate Rayon worker. It needs roughly twice as many sweeps as
//! Gauss–Seidel; with [`JacobiEdges::Boundary`] it converges to the same
//! fixed point as SOR.
//!
//! By default every free cell is updated, edge cells included: a neighbour
//! index that falls off the grid is clamped to the nearest edge cell, so the
//! edge cell stands in for its own missing neighbours. The boundary passed to
//! [`PotentialSolver::relax`] is then ignored. [`JacobiEdges::Boundary`]
//! switches to the fixed-frame or periodic stencil shared with SOR.
//!
//! Convergence follows the `allclose` form
//! $|V_{\text{next}} - V_{\text{prev}}| \le \text{atol} + \text{rtol}\cdot|V_{\text{prev}}|$;
//! the absolute floor lets cells that settle at zero pass the test.

use std::fmt;
use std::str::FromStr;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::control::{Convergence, IterationControl};
use super::stencil::{relax_cell, Stencil};
use super::{PotentialSolver, SolverError, DEFAULT_TOLERANCE};
use crate::boundary::BoundaryPolicy;
use crate::types::{BoundarySpec, GridState, RelaxationResult};

/// Default absolute floor of the Jacobi convergence test.
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-8;

/// How the Jacobi stencil treats the edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JacobiEdges {
    /// Clamp neighbours to the nearest edge cell and update every free cell.
    #[default]
    Nearest,
    /// Follow the [`BoundarySpec`] passed to `relax`.
    Boundary,
}

impl fmt::Display for JacobiEdges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JacobiEdges::Nearest => write!(f, "nearest"),
            JacobiEdges::Boundary => write!(f, "boundary"),
        }
    }
}

impl FromStr for JacobiEdges {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(JacobiEdges::Nearest),
            "boundary" => Ok(JacobiEdges::Boundary),
            other => Err(SolverError::InvalidParameter(format!(
                "unknown Jacobi edge mode '{}' (expected 'nearest' or 'boundary')",
                other
            ))),
        }
    }
}

/// The Jacobi solver.
#[derive(Debug, Clone)]
pub struct JacobiSolver {
    /// Damping weight in $(0, 1]$; 1 is undamped Jacobi.
    pub weight: f64,
    /// Relative per-cell tolerance.
    pub tolerance: f64,
    /// Absolute per-cell tolerance.
    pub absolute_tolerance: f64,
    pub edges: JacobiEdges,
    pub control: IterationControl,
}

impl Default for JacobiSolver {
    fn default() -> Self {
        Self {
            weight: 1.0,
            tolerance: DEFAULT_TOLERANCE,
            absolute_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            edges: JacobiEdges::default(),
            control: IterationControl::default(),
        }
    }
}

impl JacobiSolver {
    pub fn new(weight: f64, tolerance: f64) -> Self {
        Self {
            weight,
            tolerance,
            ..Default::default()
        }
    }

    pub fn with_edges(mut self, edges: JacobiEdges) -> Self {
        self.edges = edges;
        self
    }

    pub fn with_control(mut self, control: IterationControl) -> Self {
        self.control = control;
        self
    }

    fn validate(&self) -> Result<(), SolverError> {
        // Weights above 1 amplify the checkerboard mode and diverge.
        if !(self.weight > 0.0 && self.weight <= 1.0) {
            return Err(SolverError::InvalidParameter(format!(
                "Jacobi weight must lie in (0, 1], got {}",
                self.weight
            )));
        }
        for (name, tol) in [
            ("tolerance", self.tolerance),
            ("absolute_tolerance", self.absolute_tolerance),
        ] {
            if !(tol >= 0.0 && tol.is_finite()) {
                return Err(SolverError::InvalidParameter(format!(
                    "{} must be finite and non-negative, got {}",
                    name, tol
                )));
            }
        }
        Ok(())
    }
}

/// One Jacobi sweep: `snapshot` receives the previous iterate, `v` the new one.
fn sweep_jacobi(stencil: &Stencil, mask: &[bool], v: &mut [f64], snapshot: &mut [f64], weight: f64) {
    let cols = stencil.cols;
    if v.is_empty() {
        return;
    }
    snapshot.copy_from_slice(v);
    let src: &[f64] = snapshot;

    v.par_chunks_mut(cols).enumerate().for_each(|(r, row)| {
        if !stencil.row_active(r) {
            return;
        }
        for (c, cell) in row.iter_mut().enumerate() {
            let idx = r * cols + c;
            if !mask[idx] {
                continue;
            }
            if let Some(n) = stencil.neighbours(r, c) {
                *cell = relax_cell(src, idx, n, weight);
            }
        }
    });
}

impl PotentialSolver for JacobiSolver {
    fn relax(
        &self,
        state: &GridState,
        boundary: BoundarySpec,
    ) -> Result<RelaxationResult, SolverError> {
        self.validate()?;

        let (rows, cols) = state.dim();
        let stencil = match self.edges {
            JacobiEdges::Nearest => {
                debug!(
                    "{}: nearest-edge stencil, ignoring {} boundary",
                    self.method_name(),
                    boundary
                );
                Stencil::clamped(rows, cols)
            }
            JacobiEdges::Boundary => Stencil::new(BoundaryPolicy::new(boundary), rows, cols),
        };
        let mask: Vec<bool> = state.mask().iter().copied().collect();
        let mut snapshot = vec![0.0; rows * cols];
        let criterion = Convergence {
            relative: self.tolerance,
            absolute: self.absolute_tolerance,
        };

        self.control.run(state, criterion, self.method_name(), |v| {
            sweep_jacobi(&stencil, &mask, v, &mut snapshot, self.weight)
        })
    }

    fn method_name(&self) -> &str {
        "Weighted Jacobi"
    }
}
