//! Dense strided matrix product.
//!
//! `Z[i, j] = Σ_k X[i, k] · Y[k, j]`, each sum accumulated left to right
//! from `0.0`. Every axis of every operand may have any stride, including
//! zero or negative; nothing assumes row- or column-major storage.
//!
//! Empty dimensions are fine: `M = 0` or `P = 0` writes nothing, and
//! `N = 0` writes `0.0` everywhere.

use crate::view::{MatrixView, MatrixViewMut, StridedView};

/// Inner product of two strided vectors, accumulated left to right.
#[inline]
#[must_use]
pub fn strided_dot(a: StridedView<'_>, b: StridedView<'_>) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "strided_dot: dimension mismatch");
    a.iter().zip(b.iter()).fold(0.0, |acc, (x, y)| acc + x * y)
}

/// `z = x · y` for `x: (M, N)`, `y: (N, P)`, `z: (M, P)`.
///
/// Output cells are visited row by row, each written exactly once.
///
/// # Example
///
/// ```rust
/// use distratio::{matmul::matmul, MatrixView, MatrixViewMut};
///
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [5.0, 6.0, 7.0, 8.0];
/// let mut z = [0.0; 4];
/// matmul(
///     MatrixView::row_major(&x, 2, 2),
///     MatrixView::row_major(&y, 2, 2),
///     &mut MatrixViewMut::row_major(&mut z, 2, 2),
/// );
/// assert_eq!(z, [19.0, 22.0, 43.0, 50.0]);
/// ```
pub fn matmul(x: MatrixView<'_>, y: MatrixView<'_>, z: &mut MatrixViewMut<'_>) {
    debug_assert_eq!(x.columns().len(), y.rows().len(), "matmul: inner dimension mismatch");
    z.assign_rows(
        x.row_views()
            .map(|row| y.column_views().map(move |column| strided_dot(row, column))),
    );
}
