//! Stencil neighbour resolution at the grid edges.
//!
//! The five-point stencil needs the two neighbours of a cell along each axis.
//! [`BoundaryPolicy`] maps an index on an axis of a given length to that pair,
//! or reports that the index is not updated at all.
//!
//! # Periodic wrap convention
//!
//! Interior indices resolve to `(k + 1, k - 1)`. The two edge indices are
//! special-cased with signed offsets that are then reduced modulo the axis
//! length:
//!
//! | index     | signed pair | resolved pair   |
//! |-----------|-------------|-----------------|
//! | `0`       | `(-1, 1)`   | `(len - 1, 1)`  |
//! | `len - 1` | `(-2, 0)`   | `(len - 2, 0)`  |
//!
//! The edge pairs list the wrapped neighbour first, which is the reverse of
//! the interior ordering. The stencil only uses the sum of the pair, so the
//! converged potential is unaffected, but the exact pairs are part of the
//! public contract and are tested as such.
//!
//! For very short axes the modulo reduction folds the pairs onto the few
//! available cells: a length-1 axis resolves to `(0, 0)`, and a length-2 axis
//! to `(1, 1)` at index 0 and `(0, 0)` at index 1.
//!
//! # Fixed frame
//!
//! Under [`BoundarySpec::Fixed`] the first and last index of every axis are
//! excluded from update, whatever their mask value. Axes of length two or
//! less therefore have no updatable cells.

use std::ops::Range;

use crate::types::BoundarySpec;

/// Neighbour resolution for one boundary topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPolicy {
    spec: BoundarySpec,
}

impl BoundaryPolicy {
    pub fn new(spec: BoundarySpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> BoundarySpec {
        self.spec
    }

    /// Resolve the `(up, down)` neighbour pair of `index` on an axis of `len`.
    ///
    /// Returns `None` when the index is excluded from update (fixed frame) or
    /// lies outside the axis. The same mapping applies to columns, where the
    /// pair reads `(right, left)` for interior cells.
    pub fn resolve(&self, index: usize, len: usize) -> Option<(usize, usize)> {
        if index >= len {
            return None;
        }
        match self.spec {
            BoundarySpec::Fixed => {
                if index == 0 || index + 1 >= len {
                    None
                } else {
                    Some((index + 1, index - 1))
                }
            }
            BoundarySpec::Periodic => {
                let k = index as i64;
                let n = len as i64;
                let (mut up, mut down) = (k + 1, k - 1);
                if index == 0 {
                    (up, down) = (-1, 1);
                }
                // Evaluated after the first edge so a length-1 axis takes this pair.
                if index + 1 == len {
                    (up, down) = (-2, 0);
                }
                Some((up.rem_euclid(n) as usize, down.rem_euclid(n) as usize))
            }
        }
    }

    /// Indices along an axis of `len` that may be updated.
    pub fn update_range(&self, len: usize) -> Range<usize> {
        match self.spec {
            BoundarySpec::Fixed if len > 2 => 1..len - 1,
            BoundarySpec::Fixed => 0..0,
            BoundarySpec::Periodic => 0..len,
        }
    }
}

impl From<BoundarySpec> for BoundaryPolicy {
    fn from(spec: BoundarySpec) -> Self {
        Self::new(spec)
    }
}
