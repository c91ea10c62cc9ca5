//! Precomputed five-point stencil neighbours for one grid shape.

use crate::boundary::BoundaryPolicy;

/// Neighbour tables for a `(rows, cols)` grid under one boundary policy.
///
/// Entries are `None` for rows or columns the policy excludes from update.
#[derive(Debug, Clone)]
pub(crate) struct Stencil {
    pub rows: usize,
    pub cols: usize,
    row_neighbours: Vec<Option<(usize, usize)>>,
    col_neighbours: Vec<Option<(usize, usize)>>,
}

impl Stencil {
    pub fn new(policy: BoundaryPolicy, rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_neighbours: (0..rows).map(|r| policy.resolve(r, rows)).collect(),
            col_neighbours: (0..cols).map(|c| policy.resolve(c, cols)).collect(),
        }
    }

    /// Neighbour tables that clamp out-of-range indices to the nearest edge
    /// cell, so an edge cell counts itself for its missing neighbours. Every
    /// cell is in the update region.
    pub fn clamped(rows: usize, cols: usize) -> Self {
        let nearest = |i: usize, len: usize| Some(((i + 1).min(len - 1), i.saturating_sub(1)));
        Self {
            rows,
            cols,
            row_neighbours: (0..rows).map(|r| nearest(r, rows)).collect(),
            col_neighbours: (0..cols).map(|c| nearest(c, cols)).collect(),
        }
    }

    /// Whether any cell of row `r` can be updated.
    #[inline]
    pub fn row_active(&self, r: usize) -> bool {
        self.row_neighbours[r].is_some()
    }

    /// Flat row-major indices `[left, right, down, up]` of the neighbours of
    /// `(r, c)`, or `None` if the cell is outside the update region.
    #[inline]
    pub fn neighbours(&self, r: usize, c: usize) -> Option<[usize; 4]> {
        let (up, down) = self.row_neighbours[r]?;
        // Pairs are (next, previous) inside the grid but (wrapped, forced) at a
        // periodic edge, so the labels can swap there. Only the sum is used.
        let (right, left) = self.col_neighbours[c]?;
        let row = r * self.cols;
        Some([row + left, row + right, down * self.cols + c, up * self.cols + c])
    }
}

/// Weighted stencil update `(1 - f) v + (f / 4) * sum(neighbours)`.
#[inline]
pub(crate) fn relax_cell(v: &[f64], idx: usize, n: [usize; 4], factor: f64) -> f64 {
    let sum = v[n[0]] + v[n[1]] + v[n[2]] + v[n[3]];
    (1.0 - factor) * v[idx] + factor / 4.0 * sum
}
