//! Strided walk descriptors.
//!
//! Two distinct descriptors live here:
//!
//! - [`VectorWalk`]: one 1-D walk (`len`, `stride`, and the `reset` distance
//!   that returns a cursor to where it started). Every kernel builds its
//!   inner loops out of these.
//! - [`MatrixLinearize`]: how to copy a whole strided matrix into (and back
//!   out of) a dense buffer with a chosen leading dimension.
//!
//! All strides and offsets are in **elements** of `f64`, signed. Zero and
//! negative strides are allowed; no two consecutive positions are assumed
//! to be adjacent.
//!
//! Position arithmetic wraps. The cursor one step past the last position is
//! computed but never read, so it may leave the `isize` range without
//! affecting the positions that are.
//!
//! # Reversibility
//!
//! ```text
//! start + stride + stride + ... (len times) - reset == start
//! ```
//!
//! ```rust
//! use distratio::VectorWalk;
//!
//! let walk = VectorWalk::new(4, -3);
//! assert_eq!(walk.offsets(20).collect::<Vec<_>>(), vec![20, 17, 14, 11]);
//! assert_eq!(walk.end(20), 8);
//! assert_eq!(walk.end(20) - walk.reset(), 20);
//! ```

use crate::view::{MatrixView, MatrixViewMut};

/// One strided walk: `len` positions, `stride` elements apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct VectorWalk {
    len: usize,
    stride: isize,
    reset: isize,
}

impl VectorWalk {
    /// Describe a walk of `len` steps of `stride` elements.
    #[inline]
    #[must_use]
    pub const fn new(len: usize, stride: isize) -> Self {
        Self {
            len,
            stride,
            reset: (len as isize).wrapping_mul(stride),
        }
    }

    /// Number of positions visited.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` if the walk visits nothing.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distance between consecutive positions.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> isize {
        self.stride
    }

    /// Distance to subtract after a full walk to get back to the start.
    #[inline]
    #[must_use]
    pub const fn reset(&self) -> isize {
        self.reset
    }

    /// Cursor position after `len` steps from `start`.
    #[inline]
    #[must_use]
    pub const fn end(&self, start: isize) -> isize {
        start.wrapping_add(self.reset)
    }

    /// Positions visited from `start`, produced by repeated addition.
    #[inline]
    pub fn offsets(&self, start: isize) -> Offsets {
        Offsets {
            pos: start,
            stride: self.stride,
            remaining: self.len,
        }
    }
}

/// Iterator over the positions of a [`VectorWalk`].
#[derive(Clone, Debug)]
pub struct Offsets {
    pos: isize,
    stride: isize,
    remaining: usize,
}

impl Iterator for Offsets {
    type Item = isize;

    #[inline]
    fn next(&mut self) -> Option<isize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.pos;
        self.pos = self.pos.wrapping_add(self.stride);
        self.remaining -= 1;
        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets {}

/// Layout for copying a strided matrix to and from a dense buffer.
///
/// In the dense buffer, row `i` starts at `i * output_lead_dim` and its
/// columns are contiguous. `output_lead_dim` must be at least `columns`;
/// a larger value leaves padding between rows untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatrixLinearize {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
    /// Element distance between consecutive rows of the strided matrix.
    pub row_stride: isize,
    /// Element distance between consecutive columns of the strided matrix.
    pub column_stride: isize,
    /// Dense-side leading dimension, in elements.
    pub output_lead_dim: usize,
}

impl MatrixLinearize {
    /// Layout with a packed dense side (`output_lead_dim == columns`).
    #[must_use]
    pub const fn new(rows: usize, columns: usize, row_stride: isize, column_stride: isize) -> Self {
        Self::with_lead_dim(rows, columns, row_stride, column_stride, columns)
    }

    /// Layout with an explicit dense-side leading dimension.
    #[must_use]
    pub const fn with_lead_dim(
        rows: usize,
        columns: usize,
        row_stride: isize,
        column_stride: isize,
        output_lead_dim: usize,
    ) -> Self {
        Self {
            rows,
            columns,
            row_stride,
            column_stride,
            output_lead_dim,
        }
    }

    /// Layout describing `view` with a packed dense side.
    #[must_use]
    pub fn of(view: &MatrixView<'_>) -> Self {
        Self::new(
            view.rows().len(),
            view.columns().len(),
            view.rows().stride(),
            view.columns().stride(),
        )
    }

    /// Minimum dense buffer length needed for this layout.
    #[must_use]
    pub const fn dense_len(&self) -> usize {
        if self.rows == 0 || self.columns == 0 {
            0
        } else {
            (self.rows - 1) * self.output_lead_dim + self.columns
        }
    }

    /// Row walk of the strided side.
    #[must_use]
    pub const fn row_walk(&self) -> VectorWalk {
        VectorWalk::new(self.rows, self.row_stride)
    }

    /// Column walk of the strided side.
    #[must_use]
    pub const fn column_walk(&self) -> VectorWalk {
        VectorWalk::new(self.columns, self.column_stride)
    }
}

/// Copy a strided matrix into a dense buffer laid out by `layout`.
///
/// Rows and columns beyond the shorter of `src` and `layout` are skipped,
/// as are rows that do not fit in `dst`. Requires
/// `layout.output_lead_dim >= layout.columns`.
pub fn linearize(src: &MatrixView<'_>, layout: &MatrixLinearize, dst: &mut [f64]) {
    debug_assert!(
        layout.output_lead_dim >= layout.columns,
        "linearize: lead dim {} below {} columns",
        layout.output_lead_dim,
        layout.columns
    );
    let lead = layout.output_lead_dim;
    for (row, dense_row) in src
        .row_views()
        .take(layout.rows)
        .zip(dst.chunks_mut(lead.max(1)))
    {
        for (value, slot) in row.iter().take(layout.columns).zip(dense_row.iter_mut()) {
            *slot = value;
        }
    }
}

/// Copy a dense buffer laid out by `layout` back into a strided matrix.
///
/// Only the overlapping `rows x columns` block is written. Requires
/// `layout.output_lead_dim >= layout.columns`.
pub fn delinearize(src: &[f64], layout: &MatrixLinearize, dst: &mut MatrixViewMut<'_>) {
    debug_assert!(
        layout.output_lead_dim >= layout.columns,
        "delinearize: lead dim {} below {} columns",
        layout.output_lead_dim,
        layout.columns
    );
    let columns = layout.columns;
    dst.assign_rows(
        src.chunks(layout.output_lead_dim.max(1))
            .take(layout.rows)
            .map(|row| row.iter().copied().take(columns)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_returns_to_start() {
        for &(len, stride) in &[(0usize, 5isize), (1, 1), (7, 3), (4, -2), (9, 0)] {
            let walk = VectorWalk::new(len, stride);
            let mut pos = 100isize;
            for _ in 0..walk.len() {
                pos += walk.stride();
            }
            pos -= walk.reset();
            assert_eq!(pos, 100, "len={len} stride={stride}");
        }
    }

    #[test]
    fn offsets_visit_every_position() {
        let walk = VectorWalk::new(4, -3);
        let visited: Vec<isize> = walk.offsets(12).collect();
        assert_eq!(visited, vec![12, 9, 6, 3]);
        assert_eq!(walk.offsets(12).len(), 4);
        assert_eq!(walk.end(12), 0);
    }

    #[test]
    fn zero_stride_repeats_one_position() {
        let walk = VectorWalk::new(3, 0);
        assert!(walk.offsets(5).all(|p| p == 5));
        assert_eq!(walk.reset(), 0);
    }

    #[test]
    fn dense_len_accounts_for_lead_dim() {
        assert_eq!(MatrixLinearize::new(3, 2, 1, 3).dense_len(), 6);
        assert_eq!(MatrixLinearize::with_lead_dim(3, 2, 1, 3, 4).dense_len(), 10);
        assert_eq!(MatrixLinearize::new(0, 2, 1, 1).dense_len(), 0);
    }

    #[test]
    fn linearize_transposed_view() {
        // Column-major 2x3 matrix [[1,2,3],[4,5,6]].
        let data = [1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
        let view = MatrixView::new(&data, 0, VectorWalk::new(2, 1), VectorWalk::new(3, 2));
        let layout = MatrixLinearize::of(&view);
        let mut dense = vec![0.0; layout.dense_len()];
        linearize(&view, &layout, &mut dense);
        assert_eq!(dense, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn delinearize_restores_strided_layout() {
        let dense = [1.0, 2.0, -1.0, 3.0, 4.0];
        let layout = MatrixLinearize::with_lead_dim(2, 2, -2, 1, 3);
        let mut out = [0.0; 4];
        {
            // Rows stored bottom-up: row 0 at offset 2, row 1 at offset 0.
            let mut view =
                MatrixViewMut::new(&mut out, 2, VectorWalk::new(2, -2), VectorWalk::new(2, 1));
            delinearize(&dense, &layout, &mut view);
        }
        assert_eq!(out, [3.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn step_past_the_end_wraps_instead_of_overflowing() {
        let walk = VectorWalk::new(1, isize::MAX);
        assert_eq!(walk.offsets(1).collect::<Vec<_>>(), vec![1]);
        assert_eq!(walk.end(1).wrapping_sub(walk.reset()), 1);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "lead dim 1 below 2 columns")]
    fn linearize_rejects_overlapping_rows() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let view = MatrixView::new(&data, 0, VectorWalk::new(2, 2), VectorWalk::new(2, 1));
        let layout = MatrixLinearize::with_lead_dim(2, 2, 2, 1, 1);
        let mut dense = [0.0; 4];
        linearize(&view, &layout, &mut dense);
    }
}
