//! Euclidean norm of a strided vector.

use crate::view::StridedView;

/// `sqrt(Σ x[t]²)`, accumulated left to right from `0.0`.
///
/// An empty vector has norm `0.0`.
///
/// # Example
///
/// ```rust
/// use distratio::{norm::norm, StridedView};
///
/// assert_eq!(norm(StridedView::contiguous(&[3.0, 4.0])), 5.0);
/// ```
#[inline]
#[must_use]
pub fn norm(x: StridedView<'_>) -> f64 {
    norm_squared(x).sqrt()
}

/// `Σ x[t]²`, accumulated left to right from `0.0`.
#[inline]
#[must_use]
pub fn norm_squared(x: StridedView<'_>) -> f64 {
    x.iter().fold(0.0, |acc, v| acc + v * v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::VectorWalk;

    #[test]
    fn three_four_five() {
        assert_eq!(norm(StridedView::contiguous(&[3.0, 4.0])), 5.0);
    }

    #[test]
    fn empty_is_positive_zero() {
        let n = norm(StridedView::contiguous(&[]));
        assert_eq!(n, 0.0);
        assert!(n.is_sign_positive());
    }

    #[test]
    fn strided_skips_interleaved_values() {
        let data = [3.0, 100.0, 4.0, 100.0];
        assert_eq!(norm(StridedView::new(&data, 0, VectorWalk::new(2, 2))), 5.0);
        assert_eq!(norm(StridedView::new(&data, 2, VectorWalk::new(2, -2))), 5.0);
    }

    #[test]
    fn nan_propagates() {
        assert!(norm(StridedView::contiguous(&[1.0, f64::NAN])).is_nan());
    }
}
