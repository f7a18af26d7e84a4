//! Basic Operations
//!
//! The minimal example: the four operations on single (unbatched) operands.
//!
//! | Operation   | Signature                              | Output                 |
//! |-------------|----------------------------------------|------------------------|
//! | pdist_ratio | `(d,m),(d,n)->(),()`                   | min/max distance ratio |
//! | cdist_ratio | `(d1,m),(d2,m),(d1,n),(d2,n)->(),()`   | same, cross pairs      |
//! | matmul      | `(m,n),(n,p)->(m,p)`                   | matrix product         |
//! | norm        | `(n)->()`                              | Euclidean norm         |
//!
//! Run with `RUST_LOG`-style debug output from the dispatcher:
//!
//! ```bash
//! cargo run --example 01_basic_ops --release
//! ```

use distratio::{cdist_ratio, matmul, norm, pdist_ratio, ArrayView, ArrayViewMut, Operation};

fn main() -> distratio::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    for op in Operation::ALL {
        println!("{:<12} {:<38} {}", op.name(), op.signature().to_string(), op.doc());
    }
    println!();

    // Three 1-D points and the same points stretched by two: every pairwise
    // distance ratio is 1/2.
    let num = [0.0, 1.0, 3.0];
    let den = [0.0, 2.0, 6.0];
    let (mut lo, mut hi) = ([0.0], [0.0]);
    pdist_ratio(
        ArrayView::contiguous(&num, &[3, 1])?,
        ArrayView::contiguous(&den, &[3, 1])?,
        ArrayViewMut::contiguous(&mut lo, &[])?,
        ArrayViewMut::contiguous(&mut hi, &[])?,
    )?;
    println!("pdist_ratio: drmin = {}, drmax = {}", lo[0], hi[0]);
    assert_eq!((lo[0], hi[0]), (0.5, 0.5));

    // Cross pairs between {0} and {1, 3}: ratios 2 and 3 in distance terms.
    let (nf, nt) = ([0.0], [2.0, 9.0]);
    let (df, dt) = ([0.0], [1.0, 3.0]);
    cdist_ratio(
        ArrayView::contiguous(&nf, &[1, 1])?,
        ArrayView::contiguous(&nt, &[2, 1])?,
        ArrayView::contiguous(&df, &[1, 1])?,
        ArrayView::contiguous(&dt, &[2, 1])?,
        ArrayViewMut::contiguous(&mut lo, &[])?,
        ArrayViewMut::contiguous(&mut hi, &[])?,
    )?;
    println!("cdist_ratio: drmin = {}, drmax = {}", lo[0], hi[0]);

    // [[1, 2], [3, 4]] @ [[5, 6], [7, 8]]
    let x = [1.0, 2.0, 3.0, 4.0];
    let y = [5.0, 6.0, 7.0, 8.0];
    let mut z = [0.0; 4];
    matmul(
        ArrayView::contiguous(&x, &[2, 2])?,
        ArrayView::contiguous(&y, &[2, 2])?,
        ArrayViewMut::contiguous(&mut z, &[2, 2])?,
    )?;
    println!("matmul: {:?}", z);
    assert_eq!(z, [19.0, 22.0, 43.0, 50.0]);

    // The same product with x read through its transpose (column-major strides).
    matmul(
        ArrayView::new(&x, &[2, 2], &[1, 2])?,
        ArrayView::contiguous(&y, &[2, 2])?,
        ArrayViewMut::contiguous(&mut z, &[2, 2])?,
    )?;
    println!("matmul(x^T, y): {:?}", z);

    let v = [3.0, 4.0];
    let mut r = [0.0];
    norm(ArrayView::contiguous(&v, &[2])?, ArrayViewMut::contiguous(&mut r, &[])?)?;
    println!("norm: {}", r[0]);
    assert_eq!(r[0], 5.0);

    Ok(())
}
