//! Chord distortion of a projection.
//!
//! A projection from `N` to `M` dimensions preserves a chord well when the
//! scaled length ratio `sqrt(N/M) * |P(x) - P(y)| / |x - y|` is close to 1.
//! The distortion of a set of chords is the largest deviation:
//!
//! ```text
//! distortion = max(|scale * drmin - 1|, |scale * drmax - 1|)
//! ```
//!
//! where `max` ignores NaN. The ratio extremes come from the
//! `pdist_ratio`/`cdist_ratio` operations, with the projected points as
//! numerator and the original points as denominator.

use crate::array::{ArrayView, ArrayViewMut};
use crate::error::{Error, Result};
use crate::gufunc::{self, broadcast_shape};
use crate::ratio::RatioExtremes;

/// `sqrt(den_dim / num_dim)`: rescales projected lengths so that an
/// isometric projection has ratio 1.
#[inline]
#[must_use]
pub fn projection_scale(den_dim: usize, num_dim: usize) -> f64 {
    (den_dim as f64 / num_dim as f64).sqrt()
}

/// Distortion from already square-rooted ratio extremes.
///
/// `f64::max` returns the non-NaN operand, so a NaN on one side is
/// ignored.
#[inline]
#[must_use]
pub fn distortion(scale: f64, drmin: f64, drmax: f64) -> f64 {
    (scale * drmin - 1.0).abs().max((scale * drmax - 1.0).abs())
}

impl RatioExtremes {
    /// Distortion of the chords folded in so far.
    ///
    /// With no chords `drmin` is infinite, so the distortion is too.
    #[must_use]
    pub fn distortion(&self, scale: f64) -> f64 {
        let (lo, hi) = self.finish();
        distortion(scale, lo, hi)
    }
}

fn batch_shape(operands: &[&ArrayView<'_>]) -> Result<Vec<usize>> {
    operands
        .iter()
        .enumerate()
        .try_fold(Vec::new(), |acc, (operand, a)| {
            let rank = a.ndim();
            if rank < 2 {
                return Err(Error::CoreRank { operand, rank, core: 2 });
            }
            broadcast_shape(&acc, &a.shape()[..rank - 2])
        })
}

fn last_dim(a: &ArrayView<'_>) -> usize {
    a.shape().last().copied().unwrap_or(0)
}

/// Run a ratio operation into fresh buffers and convert each batch
/// element's extremes into a distortion.
fn distortions<F>(batch: &[usize], scale: f64, run: F) -> Result<Vec<f64>>
where
    F: FnOnce(ArrayViewMut<'_>, ArrayViewMut<'_>) -> Result<()>,
{
    let len = batch.iter().product();
    let mut drmin = vec![0.0; len];
    let mut drmax = vec![0.0; len];
    run(
        ArrayViewMut::contiguous(&mut drmin, batch)?,
        ArrayViewMut::contiguous(&mut drmax, batch)?,
    )?;
    Ok(drmin
        .into_iter()
        .zip(drmax)
        .map(|(lo, hi)| distortion(scale, lo, hi))
        .collect())
}

/// Distortion of every chord within a point set, per batch element.
///
/// `projected` is `(..., d, m)` and `original` is `(..., d, n)`. The result
/// is laid out row-major over the broadcast batch shape.
///
/// # Example
///
/// ```rust
/// use distratio::distortion::pairwise_distortion;
/// use distratio::ArrayView;
///
/// // Halving every coordinate of 1-D points, with scale sqrt(1/1) = 1.
/// let original = [0.0, 2.0, 6.0];
/// let projected = [0.0, 1.0, 3.0];
/// let out = pairwise_distortion(
///     &ArrayView::contiguous(&projected, &[3, 1]).unwrap(),
///     &ArrayView::contiguous(&original, &[3, 1]).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(out, vec![0.5]);
/// ```
pub fn pairwise_distortion(projected: &ArrayView<'_>, original: &ArrayView<'_>) -> Result<Vec<f64>> {
    let batch = batch_shape(&[projected, original])?;
    let scale = projection_scale(last_dim(original), last_dim(projected));
    distortions(&batch, scale, |lo, hi| {
        gufunc::pdist_ratio(projected.clone(), original.clone(), lo, hi)
    })
}

/// Distortion of every chord between two point sets, per batch element.
///
/// `projected_from`/`projected_to` are `(..., d1, m)`/`(..., d2, m)` and
/// `original_from`/`original_to` are `(..., d1, n)`/`(..., d2, n)`.
pub fn cross_distortion(
    projected_from: &ArrayView<'_>,
    projected_to: &ArrayView<'_>,
    original_from: &ArrayView<'_>,
    original_to: &ArrayView<'_>,
) -> Result<Vec<f64>> {
    let batch = batch_shape(&[projected_from, projected_to, original_from, original_to])?;
    let scale = projection_scale(last_dim(original_from), last_dim(projected_from));
    distortions(&batch, scale, |lo, hi| {
        gufunc::cdist_ratio(
            projected_from.clone(),
            projected_to.clone(),
            original_from.clone(),
            original_to.clone(),
            lo,
            hi,
        )
    })
}
