//! Per-operation loops: the kernel-invocation contract.
//!
//! Each loop receives the raw buffers of its operands plus a [`LoopArgs`]:
//! the outer (batch) loop, one origin per operand, the sizes of the core
//! dimensions, and the element step of every core dimension of every
//! operand. The order of `dims` and `steps` follows the operation's
//! signature:
//!
//! | Loop | Signature | `dims` | `steps` |
//! |------|-----------|--------|---------|
//! | [`pdist_ratio`] | `(d,m),(d,n)->(),()` | `d, m, n` | `num_d, num_m, den_d, den_n` |
//! | [`cdist_ratio`] | `(d1,m),(d2,m),(d1,n),(d2,n)->(),()` | `d1, m, d2, n` | `nf_d1, nf_m, nt_d2, nt_m, df_d1, df_n, dt_d2, dt_n` |
//! | [`matmul`] | `(m,n),(n,p)->(m,p)` | `m, n, p` | `x_m, x_n, y_n, y_p, z_m, z_p` |
//! | [`norm`] | `(n)->()` | `n` | `x_n` |
//!
//! Loops do not validate anything. Positions outside a buffer panic on the
//! slice index; callers that need errors go through [`crate::gufunc`].

use tracing::trace;

use crate::engine::OuterLoop;
use crate::view::{MatrixView, MatrixViewMut, StridedView};
use crate::walk::VectorWalk;
use crate::{matmul as mm, norm as nrm, ratio};

/// Outer loop, origins, and core layout for one loop invocation.
#[derive(Clone, Copy, Debug)]
pub struct LoopArgs<'s, const K: usize> {
    /// Batch loop over all `K` operands (inputs first, then outputs).
    pub outer: OuterLoop<K>,
    /// Element offset of batch element 0 in each operand's buffer.
    pub origins: [isize; K],
    /// Core dimension sizes, in signature order.
    pub dims: &'s [usize],
    /// Core dimension steps, operand by operand.
    pub steps: &'s [isize],
}

impl<'s, const K: usize> LoopArgs<'s, K> {
    /// Bundle the pieces of one call.
    #[must_use]
    pub fn new(outer: OuterLoop<K>, origins: [isize; K], dims: &'s [usize], steps: &'s [isize]) -> Self {
        Self {
            outer,
            origins,
            dims,
            steps,
        }
    }

    /// `dims` and `steps` as fixed-size arrays, or `None` if their lengths differ.
    fn unpack<const D: usize, const S: usize>(&self) -> Option<([usize; D], [isize; S])> {
        let dims = self.dims.try_into().ok()?;
        let steps = self.steps.try_into().ok()?;
        Some((dims, steps))
    }
}

#[inline]
fn store(out: &mut [f64], pos: isize, value: f64) {
    out[pos as usize] = value;
}

/// Run a scalar-valued `body` for every batch element and hand each result
/// to `write`, in batch order.
fn for_each_result<const K: usize, R, F, W>(outer: &OuterLoop<K>, origins: [isize; K], body: F, mut write: W)
where
    R: Send,
    F: Fn(&[isize; K]) -> R + Sync + Send,
    W: FnMut(&[isize; K], R),
{
    #[cfg(feature = "parallel")]
    if outer.len() >= crate::PARALLEL_MIN_BATCH {
        let results = outer.par_map(origins, body);
        for (cursor, result) in outer.cursors(origins).zip(results) {
            write(&cursor, result);
        }
        return;
    }

    outer.run(origins, |cursor| write(cursor, body(cursor)));
}

/// Pairwise distance-ratio extremes for every batch element.
///
/// Inputs `[num, den]`, outputs `[drmin, drmax]`.
pub fn pdist_ratio(inputs: [&[f64]; 2], outputs: [&mut [f64]; 2], args: &LoopArgs<'_, 4>) {
    let Some(([len_d, len_m, len_n], [num_d, num_m, den_d, den_n])) = args.unpack::<3, 4>() else {
        debug_assert!(false, "pdist_ratio: expected 3 dims and 4 steps");
        return;
    };
    trace!(batch = args.outer.len(), d = len_d, m = len_m, n = len_n, "pdist_ratio loop");

    let [num, den] = inputs;
    let [drmin, drmax] = outputs;
    let (num_points, num_coords) = (VectorWalk::new(len_d, num_d), VectorWalk::new(len_m, num_m));
    let (den_points, den_coords) = (VectorWalk::new(len_d, den_d), VectorWalk::new(len_n, den_n));

    for_each_result(
        &args.outer,
        args.origins,
        |c| {
            ratio::pdist_ratio(
                MatrixView::new(num, c[0], num_points, num_coords),
                MatrixView::new(den, c[1], den_points, den_coords),
            )
        },
        |c, (lo, hi)| {
            store(drmin, c[2], lo);
            store(drmax, c[3], hi);
        },
    );
}

/// Cross distance-ratio extremes for every batch element.
///
/// Inputs `[num_from, num_to, den_from, den_to]`, outputs `[drmin, drmax]`.
pub fn cdist_ratio(inputs: [&[f64]; 4], outputs: [&mut [f64]; 2], args: &LoopArgs<'_, 6>) {
    let Some((dims, steps)) = args.unpack::<4, 8>() else {
        debug_assert!(false, "cdist_ratio: expected 4 dims and 8 steps");
        return;
    };
    let [len_fr, len_m, len_to, len_n] = dims;
    let [nf_d, nf_m, nt_d, nt_m, df_d, df_n, dt_d, dt_n] = steps;
    trace!(batch = args.outer.len(), d1 = len_fr, d2 = len_to, m = len_m, n = len_n, "cdist_ratio loop");

    let [num_from, num_to, den_from, den_to] = inputs;
    let [drmin, drmax] = outputs;
    let nf = (VectorWalk::new(len_fr, nf_d), VectorWalk::new(len_m, nf_m));
    let nt = (VectorWalk::new(len_to, nt_d), VectorWalk::new(len_m, nt_m));
    let df = (VectorWalk::new(len_fr, df_d), VectorWalk::new(len_n, df_n));
    let dt = (VectorWalk::new(len_to, dt_d), VectorWalk::new(len_n, dt_n));

    for_each_result(
        &args.outer,
        args.origins,
        |c| {
            ratio::cdist_ratio(
                MatrixView::new(num_from, c[0], nf.0, nf.1),
                MatrixView::new(num_to, c[1], nt.0, nt.1),
                MatrixView::new(den_from, c[2], df.0, df.1),
                MatrixView::new(den_to, c[3], dt.0, dt.1),
            )
        },
        |c, (lo, hi)| {
            store(drmin, c[4], lo);
            store(drmax, c[5], hi);
        },
    );
}

/// Matrix product for every batch element.
///
/// Inputs `[x, y]`, output `[z]`. Always sequential.
pub fn matmul(inputs: [&[f64]; 2], outputs: [&mut [f64]; 1], args: &LoopArgs<'_, 3>) {
    let Some(([len_m, len_n, len_p], [x_m, x_n, y_n, y_p, z_m, z_p])) = args.unpack::<3, 6>() else {
        debug_assert!(false, "matmul: expected 3 dims and 6 steps");
        return;
    };
    trace!(batch = args.outer.len(), m = len_m, n = len_n, p = len_p, "matmul loop");

    let [x, y] = inputs;
    let [z] = outputs;
    let x_walks = (VectorWalk::new(len_m, x_m), VectorWalk::new(len_n, x_n));
    let y_walks = (VectorWalk::new(len_n, y_n), VectorWalk::new(len_p, y_p));
    let z_walks = (VectorWalk::new(len_m, z_m), VectorWalk::new(len_p, z_p));

    args.outer.run(args.origins, |c| {
        let mut out = MatrixViewMut::new(&mut *z, c[2], z_walks.0, z_walks.1);
        mm::matmul(
            MatrixView::new(x, c[0], x_walks.0, x_walks.1),
            MatrixView::new(y, c[1], y_walks.0, y_walks.1),
            &mut out,
        );
    });
}

/// Euclidean norm for every batch element.
///
/// Input `[x]`, output `[r]`.
pub fn norm(inputs: [&[f64]; 1], outputs: [&mut [f64]; 1], args: &LoopArgs<'_, 2>) {
    let Some(([len_n], [x_n])) = args.unpack::<1, 1>() else {
        debug_assert!(false, "norm: expected 1 dim and 1 step");
        return;
    };
    trace!(batch = args.outer.len(), n = len_n, "norm loop");

    let [x] = inputs;
    let [r] = outputs;
    let walk = VectorWalk::new(len_n, x_n);

    for_each_result(
        &args.outer,
        args.origins,
        |c| nrm::norm(StridedView::new(x, c[0], walk)),
        |c, value| store(r, c[1], value),
    );
}
