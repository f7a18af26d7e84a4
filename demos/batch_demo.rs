//! Batched Distortion of Random Projections
//!
//! Projects one point set with several Gaussian random matrices at once and
//! measures how much each projection distorts the chords between points.
//! The projections share a single copy of the original points: its batch
//! dimension broadcasts against the projected batch.
//!
//! ```bash
//! cargo run --example batch_demo --release
//! ```

use distratio::distortion::{pairwise_distortion, projection_scale};
use distratio::{matmul, ArrayView, ArrayViewMut};
use rand::prelude::*;

fn main() -> distratio::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let (points, ambient) = (50, 200);
    let samples = 8;
    let mut rng = StdRng::seed_from_u64(42);

    // Points on a noisy circle embedded in the ambient space.
    let original: Vec<f64> = (0..points)
        .flat_map(|i| {
            let angle = i as f64 / points as f64 * std::f64::consts::TAU;
            let noise: Vec<f64> = (0..ambient - 2).map(|_| 0.01 * rng.gen_range(-1.0..1.0)).collect();
            [angle.cos(), angle.sin()].into_iter().chain(noise)
        })
        .collect();

    println!("{:>6} {:>10} {:>12}", "dim", "scale", "max distortion");
    for dim in [5, 20, 80] {
        // One (ambient x dim) projection matrix per sample, entries with
        // variance 1/ambient so squared lengths shrink by dim/ambient on average.
        let spread = (3.0 / ambient as f64).sqrt();
        let proj: Vec<f64> = (0..samples * ambient * dim)
            .map(|_| spread * rng.gen_range(-1.0..1.0))
            .collect();
        let mut projected = vec![0.0; samples * points * dim];
        matmul(
            ArrayView::contiguous(&original, &[points, ambient])?,
            ArrayView::contiguous(&proj, &[samples, ambient, dim])?,
            ArrayViewMut::contiguous(&mut projected, &[samples, points, dim])?,
        )?;

        let distortion = pairwise_distortion(
            &ArrayView::contiguous(&projected, &[samples, points, dim])?,
            &ArrayView::contiguous(&original, &[points, ambient])?,
        )?;
        let scale = projection_scale(ambient, dim);
        let worst = distortion.iter().copied().fold(0.0, f64::max);
        println!("{:>6} {:>10.4} {:>12.4}", dim, scale, worst);
    }

    Ok(())
}
