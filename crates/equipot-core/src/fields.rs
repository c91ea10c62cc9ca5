//! Electric field extraction from a converged potential.
//!
//! The field is the negative gradient of the potential,
//!
//! $$
//! \mathbf{E} = -\nabla V = \left(-\frac{\partial V}{\partial x},\,
//!   -\frac{\partial V}{\partial y}\right),
//! $$
//!
//! approximated per axis with second-order central differences on interior
//! points and first-order one-sided differences on the two edge points:
//!
//! $$
//! \partial_x V_{r,c} \approx
//! \begin{cases}
//! (V_{r,1} - V_{r,0}) / \Delta x & c = 0 \\
//! (V_{r,c+1} - V_{r,c-1}) / 2\Delta x & 0 < c < n - 1 \\
//! (V_{r,n-1} - V_{r,n-2}) / \Delta x & c = n - 1
//! \end{cases}
//! $$
//!
//! $x$ runs along columns and $y$ along rows. Non-finite input values are not
//! sanitised and propagate into the neighbouring field values.

use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis};

use crate::solver::SolverError;
use crate::types::{Grid, PotentialField, VectorField};

/// Compute $\mathbf{E} = -\nabla V$ on a unit-spaced grid.
pub fn gradient_field(potential: &PotentialField) -> Result<VectorField, SolverError> {
    gradient_field_with_spacing(potential, 1.0, 1.0)
}

/// Compute $\mathbf{E} = -\nabla V$ with cell spacings `dx` (columns) and
/// `dy` (rows).
///
/// Fails with [`SolverError::GridTooSmall`] if either axis has fewer than two
/// points, and with [`SolverError::InvalidParameter`] for a spacing that is
/// zero or non-finite.
pub fn gradient_field_with_spacing(
    potential: &PotentialField,
    dx: f64,
    dy: f64,
) -> Result<VectorField, SolverError> {
    let (rows, cols) = potential.dim();
    if rows < 2 || cols < 2 {
        return Err(SolverError::GridTooSmall { rows, cols });
    }
    for (name, h) in [("dx", dx), ("dy", dy)] {
        if !(h.is_finite() && h != 0.0) {
            return Err(SolverError::InvalidParameter(format!(
                "grid spacing {} must be finite and non-zero, got {}",
                name, h
            )));
        }
    }

    let ex = negative_derivative(potential, Axis(1), dx);
    let ey = negative_derivative(potential, Axis(0), dy);
    Ok(VectorField { ex, ey })
}

/// Pointwise field strength $|\mathbf{E}|$.
pub fn field_magnitude(field: &VectorField) -> Grid<f64> {
    field.magnitude()
}

fn negative_derivative(potential: &PotentialField, axis: Axis, spacing: f64) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros(potential.dim());
    for (lane, out_lane) in potential.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        differentiate_lane(lane, out_lane, spacing);
    }
    out
}

fn differentiate_lane(v: ArrayView1<f64>, mut out: ArrayViewMut1<f64>, h: f64) {
    let n = v.len();
    out[0] = -(v[1] - v[0]) / h;
    for i in 1..n - 1 {
        out[i] = -(v[i + 1] - v[i - 1]) / (2.0 * h);
    }
    out[n - 1] = -(v[n - 1] - v[n - 2]) / h;
}
