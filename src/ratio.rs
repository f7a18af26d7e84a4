//! Distance-ratio extremes between two embeddings of the same points.
//!
//! Given the same points expressed in a numerator space and a denominator
//! space, every pair `(i, j)` contributes
//!
//! ```text
//! ratio(i, j) = ||num[i] - num[j]||² / ||den[i] - den[j]||²
//! ```
//!
//! and the kernels report `sqrt(min ratio)` and `sqrt(max ratio)`.
//!
//! - [`pdist_ratio`]: unordered pairs `i < j` within one point set.
//! - [`cdist_ratio`]: every `(i, j)` between a "from" set and a "to" set.
//!
//! # IEEE behaviour
//!
//! A zero denominator gives `+inf`, which can become the maximum. `0/0`
//! gives NaN, and NaN loses every `<`/`>` comparison, so it never replaces
//! either running extreme. With no pairs at all the result is
//! `(+inf, 0)`.
//!
//! # Complexity
//!
//! - `pdist_ratio`: O(d² (m + n))
//! - `cdist_ratio`: O(d1 · d2 · (m + n))

use crate::view::{MatrixView, StridedView};

/// Squared Euclidean distance between two strided points.
///
/// Accumulates left to right from `0.0`. Lengths are assumed equal; the
/// shorter view bounds the walk.
#[inline]
#[must_use]
pub fn squared_distance(a: StridedView<'_>, b: StridedView<'_>) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "squared_distance: dimension mismatch");
    a.iter().zip(b.iter()).fold(0.0, |acc, (x, y)| {
        let separation = x - y;
        acc + separation * separation
    })
}

/// Running minimum and maximum of squared distance ratios.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatioExtremes {
    /// Smallest squared ratio seen, `+inf` before any pair.
    pub min: f64,
    /// Largest squared ratio seen, `0` before any pair.
    pub max: f64,
}

impl Default for RatioExtremes {
    fn default() -> Self {
        Self::new()
    }
}

impl RatioExtremes {
    /// Extremes before any pair has been seen.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: 0.0,
        }
    }

    /// Fold in one ratio. NaN compares false both ways and is skipped.
    #[inline]
    pub fn update(&mut self, ratio: f64) {
        if ratio < self.min {
            self.min = ratio;
        }
        if ratio > self.max {
            self.max = ratio;
        }
    }

    /// Fold in the ratio of one numerator/denominator pair of distances.
    #[inline]
    pub fn push(&mut self, numerator: f64, denominator: f64) {
        self.update(numerator / denominator);
    }

    /// `(sqrt(min), sqrt(max))`.
    #[inline]
    #[must_use]
    pub fn finish(&self) -> (f64, f64) {
        (self.min.sqrt(), self.max.sqrt())
    }
}

/// Min and max ratio of squared pairwise distances within one point set.
///
/// `num` is `(d, m)` and `den` is `(d, n)`: row `i` of each is point `i`.
/// Rows past the shorter of the two are ignored.
///
/// # Example
///
/// ```rust
/// use distratio::ratio::pdist_ratio;
/// use distratio::MatrixView;
///
/// let num = [0.0, 1.0, 3.0];
/// let den = [0.0, 2.0, 6.0];
/// let (lo, hi) = pdist_ratio(
///     MatrixView::row_major(&num, 3, 1),
///     MatrixView::row_major(&den, 3, 1),
/// );
/// assert_eq!((lo, hi), (0.5, 0.5));
/// ```
#[must_use]
pub fn pdist_ratio(num: MatrixView<'_>, den: MatrixView<'_>) -> (f64, f64) {
    let mut extremes = RatioExtremes::new();
    let points = num.row_views().zip(den.row_views());

    for (i, (num_from, den_from)) in points.clone().enumerate() {
        for (num_to, den_to) in points.clone().skip(i + 1) {
            extremes.push(
                squared_distance(num_from, num_to),
                squared_distance(den_from, den_to),
            );
        }
    }
    extremes.finish()
}

/// Min and max ratio of squared cross distances between two point sets.
///
/// `num_from` is `(d1, m)`, `num_to` is `(d2, m)`, `den_from` is `(d1, n)`
/// and `den_to` is `(d2, n)`. Every `(i, j)` pair is visited, including
/// pairs of identical points when the sets overlap.
#[must_use]
pub fn cdist_ratio(
    num_from: MatrixView<'_>,
    num_to: MatrixView<'_>,
    den_from: MatrixView<'_>,
    den_to: MatrixView<'_>,
) -> (f64, f64) {
    let mut extremes = RatioExtremes::new();
    let targets = num_to.row_views().zip(den_to.row_views());

    for (nf, df) in num_from.row_views().zip(den_from.row_views()) {
        for (nt, dt) in targets.clone() {
            extremes.push(squared_distance(nf, nt), squared_distance(df, dt));
        }
    }
    extremes.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::VectorWalk;

    fn rows(data: &[f64], n: usize, k: usize) -> MatrixView<'_> {
        MatrixView::row_major(data, n, k)
    }

    #[test]
    fn concrete_three_points() {
        let num = [0.0, 1.0, 3.0];
        let den = [0.0, 2.0, 6.0];
        let (lo, hi) = pdist_ratio(rows(&num, 3, 1), rows(&den, 3, 1));
        assert_eq!(lo, 0.5);
        assert_eq!(hi, 0.5);
    }

    #[test]
    fn fewer_than_two_points_is_degenerate() {
        let one = [1.0, 2.0];
        assert_eq!(pdist_ratio(rows(&one, 1, 2), rows(&one, 1, 2)), (f64::INFINITY, 0.0));
        let none: [f64; 0] = [];
        assert_eq!(pdist_ratio(rows(&none, 0, 2), rows(&none, 0, 2)), (f64::INFINITY, 0.0));
    }

    #[test]
    fn zero_denominator_is_infinite_max() {
        // Points 0 and 1 coincide in the denominator space only.
        let num = [0.0, 1.0, 2.0];
        let den = [0.0, 0.0, 4.0];
        let (lo, hi) = pdist_ratio(rows(&num, 3, 1), rows(&den, 3, 1));
        // Remaining ratios: 4/16 and 1/16.
        assert_eq!(hi, f64::INFINITY);
        assert_eq!(lo, 0.25);
    }

    #[test]
    fn nan_ratio_is_ignored() {
        // Points 0 and 1 coincide in both spaces: 0/0.
        let num = [1.0, 1.0, 3.0];
        let den = [2.0, 2.0, 4.0];
        let (lo, hi) = pdist_ratio(rows(&num, 3, 1), rows(&den, 3, 1));
        assert_eq!((lo, hi), (1.0, 1.0));
    }

    #[test]
    fn all_pairs_nan_keeps_initial_extremes() {
        let same = [5.0, 5.0];
        assert_eq!(pdist_ratio(rows(&same, 2, 1), rows(&same, 2, 1)), (f64::INFINITY, 0.0));
    }

    #[test]
    fn cdist_with_empty_side_is_degenerate() {
        let a = [1.0, 2.0];
        let none: [f64; 0] = [];
        let out = cdist_ratio(rows(&a, 2, 1), rows(&none, 0, 1), rows(&a, 2, 1), rows(&none, 0, 1));
        assert_eq!(out, (f64::INFINITY, 0.0));
    }

    #[test]
    fn cdist_visits_every_cross_pair() {
        // from = {0}, to = {1, 3}; numerator doubles distances vs denominator
        // for the first target and triples them for the second.
        let num_from = [0.0];
        let num_to = [2.0, 9.0];
        let den_from = [0.0];
        let den_to = [1.0, 3.0];
        let (lo, hi) = cdist_ratio(
            rows(&num_from, 1, 1),
            rows(&num_to, 2, 1),
            rows(&den_from, 1, 1),
            rows(&den_to, 2, 1),
        );
        assert_eq!(lo, 2.0);
        assert_eq!(hi, 3.0);
    }

    #[test]
    fn column_major_points_match_row_major() {
        let row_major = [0.0, 0.0, 3.0, 4.0, 6.0, 8.0];
        let col_major = [0.0, 3.0, 6.0, 0.0, 4.0, 8.0];
        let den = [0.0, 1.0, 3.0];
        let a = pdist_ratio(rows(&row_major, 3, 2), rows(&den, 3, 1));
        let cm = MatrixView::new(&col_major, 0, VectorWalk::new(3, 1), VectorWalk::new(2, 3));
        let b = pdist_ratio(cm, rows(&den, 3, 1));
        assert_eq!(a, b);
    }

    #[test]
    fn squared_distance_known_value() {
        let a = [0.0, 0.0];
        let b = [3.0, 4.0];
        assert_eq!(
            squared_distance(StridedView::contiguous(&a), StridedView::contiguous(&b)),
            25.0
        );
    }
}
