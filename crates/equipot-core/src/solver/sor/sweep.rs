//! Single-sweep kernels for successive over-relaxation.
//!
//! Both kernels operate on a flat row-major buffer and leave fixed cells and
//! cells outside the stencil's update region untouched.

use rayon::prelude::*;

use super::super::stencil::{relax_cell, Stencil};

/// Row-major in-place Gauss–Seidel sweep.
///
/// Cells later in the sweep see the values already updated in this sweep.
pub(crate) fn sweep_lexicographic(stencil: &Stencil, mask: &[bool], v: &mut [f64], factor: f64) {
    let cols = stencil.cols;
    for r in 0..stencil.rows {
        if !stencil.row_active(r) {
            continue;
        }
        for c in 0..cols {
            let idx = r * cols + c;
            if !mask[idx] {
                continue;
            }
            if let Some(n) = stencil.neighbours(r, c) {
                v[idx] = relax_cell(v, idx, n, factor);
            }
        }
    }
}

/// Red-black (checkerboard) sweep parallelised across rows.
///
/// Each colour phase computes the new values of that colour into `scratch`
/// from a read-only view of `v`, then copies them back; rows are disjoint
/// chunks, so no two threads write the same cell. The phase boundary is the
/// synchronisation barrier.
pub(crate) fn sweep_red_black(
    stencil: &Stencil,
    mask: &[bool],
    v: &mut [f64],
    scratch: &mut [f64],
    factor: f64,
) {
    let cols = stencil.cols;
    if v.is_empty() {
        return;
    }

    for colour in 0..2 {
        let src: &[f64] = v;
        scratch
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(r, out)| {
                if !stencil.row_active(r) {
                    return;
                }
                for c in 0..cols {
                    let idx = r * cols + c;
                    if (r + c) % 2 != colour || !mask[idx] {
                        continue;
                    }
                    if let Some(n) = stencil.neighbours(r, c) {
                        out[c] = relax_cell(src, idx, n, factor);
                    }
                }
            });

        v.par_chunks_mut(cols)
            .zip(scratch.par_chunks(cols))
            .enumerate()
            .for_each(|(r, (dst, updated))| {
                if !stencil.row_active(r) {
                    return;
                }
                for c in 0..cols {
                    let idx = r * cols + c;
                    if (r + c) % 2 == colour && mask[idx] && stencil.neighbours(r, c).is_some() {
                        dst[c] = updated[c];
                    }
                }
            });
    }
}
