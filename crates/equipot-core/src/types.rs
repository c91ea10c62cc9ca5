//! Core types shared across the equipot workspace.
//!
//! This module defines the grid containers exchanged with the editing layer:
//! the free/fixed mask, the seed and converged potentials, the boundary
//! topology selector, and the derived vector field.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::solver::SolverError;

/// A dense 2D array indexed `(row, col)`, i.e. physical `(y, x)`.
pub type Grid<T> = Array2<T>;

/// Per-cell solver flag: `true` marks a free cell, `false` a fixed one.
pub type MaskGrid = Grid<bool>;

/// Real-valued electrostatic potential (volts).
pub type PotentialField = Grid<f64>;

/// How stencil neighbours are resolved at the edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundarySpec {
    /// The outermost ring of cells is never updated (Dirichlet frame).
    #[default]
    Fixed,
    /// Edges wrap around to the opposite side of the grid.
    Periodic,
}

impl fmt::Display for BoundarySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundarySpec::Fixed => write!(f, "fixed"),
            BoundarySpec::Periodic => write!(f, "periodic"),
        }
    }
}

impl FromStr for BoundarySpec {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(BoundarySpec::Fixed),
            "periodic" => Ok(BoundarySpec::Periodic),
            other => Err(SolverError::InvalidParameter(format!(
                "unknown boundary '{}' (expected 'fixed' or 'periodic')",
                other
            ))),
        }
    }
}

/// A validated mask/potential pair of identical shape.
///
/// The state is read-only: solvers clone the potential into their own working
/// buffer, so the caller's seed can be reused across solves.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    mask: MaskGrid,
    potential: PotentialField,
}

impl GridState {
    /// Pair a mask with a seed potential.
    ///
    /// Fails with [`SolverError::DimensionMismatch`] when the shapes differ.
    pub fn new(mask: MaskGrid, potential: PotentialField) -> Result<Self, SolverError> {
        if mask.dim() != potential.dim() {
            return Err(SolverError::DimensionMismatch {
                mask: mask.dim(),
                potential: potential.dim(),
            });
        }
        Ok(Self { mask, potential })
    }

    /// A state with every cell free and a zero seed.
    pub fn all_free(rows: usize, cols: usize) -> Self {
        Self {
            mask: MaskGrid::from_elem((rows, cols), true),
            potential: PotentialField::zeros((rows, cols)),
        }
    }

    pub fn mask(&self) -> &MaskGrid {
        &self.mask
    }

    pub fn potential(&self) -> &PotentialField {
        &self.potential
    }

    /// Grid shape as `(rows, cols)`.
    pub fn dim(&self) -> (usize, usize) {
        self.potential.dim()
    }

    /// Number of cells the solver is allowed to write.
    pub fn free_cells(&self) -> usize {
        self.mask.iter().filter(|&&free| free).count()
    }

    pub fn into_parts(self) -> (MaskGrid, PotentialField) {
        (self.mask, self.potential)
    }
}

/// Electric field components sampled on the potential grid.
///
/// `ex` is the horizontal (column-axis) component and `ey` the vertical
/// (row-axis) component, both the same shape as the source potential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorField {
    pub ex: Grid<f64>,
    pub ey: Grid<f64>,
}

impl VectorField {
    pub fn dim(&self) -> (usize, usize) {
        self.ex.dim()
    }

    /// Pointwise field strength $|\mathbf{E}| = \sqrt{E_x^2 + E_y^2}$.
    pub fn magnitude(&self) -> Grid<f64> {
        let mut out = self.ex.clone();
        out.zip_mut_with(&self.ey, |x, &y| *x = x.hypot(y));
        out
    }
}

/// Outcome of a relaxation run.
#[derive(Debug, Clone)]
pub struct RelaxationResult {
    /// Final potential grid, owned by the caller.
    pub potential: PotentialField,
    /// Number of full sweeps performed, including the one that converged.
    pub iterations: usize,
    /// Largest absolute per-cell change in the last sweep.
    pub residual: f64,
    /// `false` only for best-effort results returned before convergence.
    pub converged: bool,
}
