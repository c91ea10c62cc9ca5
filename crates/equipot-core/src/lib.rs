//! # Equipot Core
//!
//! The numerical backbone of the equipot workspace. This crate computes the
//! electrostatic potential on a 2D grid from fixed-potential regions, and the
//! electric field derived from it.
//!
//! ## Architecture
//!
//! Callers build a [`types::GridState`] (a free/fixed mask plus seed
//! potentials) and hand it to any [`solver::PotentialSolver`]. The reference
//! implementation is successive over-relaxation ([`solver::sor::SorSolver`]);
//! the converged grid is then passed to [`fields::gradient_field`].
//!
//! ```
//! use equipot_core::fields::gradient_field;
//! use equipot_core::solver::{PotentialSolver, SorSolver};
//! use equipot_core::types::{BoundarySpec, GridState};
//!
//! let mut state = GridState::all_free(8, 8);
//! let (mut mask, mut potential) = state.into_parts();
//! mask.row_mut(0).fill(false);
//! potential.row_mut(0).fill(5.0);
//! state = GridState::new(mask, potential).unwrap();
//!
//! let solver = SorSolver::new(1.5, 1e-4);
//! let result = solver.relax(&state, BoundarySpec::Fixed).unwrap();
//! let field = gradient_field(&result.potential).unwrap();
//! assert_eq!(field.dim(), (8, 8));
//! ```
//!
//! ## Modules
//!
//! - [`types`]: Grid containers, boundary selector, and result types.
//! - [`boundary`]: Edge-neighbour resolution for fixed and periodic grids.
//! - [`solver`]: Solver trait, SOR and Jacobi implementations.
//! - [`fields`]: Finite-difference electric field extraction.

pub mod boundary;
pub mod fields;
pub mod solver;
pub mod types;
