//! Strided, batched distance-ratio and linear-algebra kernels.
//!
//! `distratio` evaluates a handful of generalized-ufunc style operations over
//! `f64` arrays with arbitrary (including zero and negative) strides and any
//! number of leading batch dimensions:
//!
//! | Operation | Signature | Result |
//! |-----------|-----------|--------|
//! | [`pdist_ratio`] | `(d,m),(d,n)->(),()` | min/max of `‖Δnum‖ / ‖Δden‖` over pairs `i < j` |
//! | [`cdist_ratio`] | `(d1,m),(d2,m),(d1,n),(d2,n)->(),()` | the same over all cross pairs |
//! | [`matmul()`] | `(m,n),(n,p)->(m,p)` | matrix product |
//! | [`norm()`] | `(n)->()` | Euclidean norm |
//!
//! # Layers
//!
//! - **Kernels** ([`ratio`], [`mod@matmul`], [`mod@norm`]) work on one batch element
//!   through typed strided views ([`StridedView`], [`MatrixView`]).
//! - **Engine** ([`OuterLoop`]) advances one cursor per operand across the
//!   batch, and [`loops`] wires engine and kernels together per operation.
//! - **Binding** ([`gufunc`]) checks [`ArrayView`] operands against the
//!   operation's [`Signature`], broadcasts batch shapes, and dispatches.
//!
//! Kernels and loops never fail. All validation happens while binding and
//! is reported as [`Error`].
//!
//! # Summation order
//!
//! Every sum accumulates left to right starting from `0.0`, so results are
//! reproducible bit for bit regardless of layout. The `parallel` feature
//! only changes which thread computes a batch element, never the order of
//! its sums.
//!
//! # Example
//!
//! ```rust
//! use distratio::{pdist_ratio, ArrayView, ArrayViewMut};
//!
//! // Three 1-D points, and the same points scaled by two.
//! let num = [0.0, 1.0, 3.0];
//! let den = [0.0, 2.0, 6.0];
//! let (mut lo, mut hi) = ([0.0], [0.0]);
//!
//! pdist_ratio(
//!     ArrayView::contiguous(&num, &[3, 1]).unwrap(),
//!     ArrayView::contiguous(&den, &[3, 1]).unwrap(),
//!     ArrayViewMut::contiguous(&mut lo, &[]).unwrap(),
//!     ArrayViewMut::contiguous(&mut hi, &[]).unwrap(),
//! )
//! .unwrap();
//! assert_eq!((lo[0], hi[0]), (0.5, 0.5));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod distortion;
pub mod engine;
pub mod error;
pub mod gufunc;
pub mod loops;
pub mod matmul;
pub mod norm;
pub mod ratio;
pub mod signature;
pub mod view;
pub mod walk;

// Re-export the working set
pub use array::{ArrayView, ArrayViewMut};
pub use engine::OuterLoop;
pub use error::{Error, Result};
pub use gufunc::{cdist_ratio, matmul, norm, pdist_ratio, Operation};
pub use loops::LoopArgs;
pub use ratio::RatioExtremes;
pub use signature::Signature;
pub use view::{MatrixView, MatrixViewMut, StridedView, StridedViewMut};
pub use walk::{delinearize, linearize, MatrixLinearize, VectorWalk};

/// Width in bytes of one element, used to convert byte strides.
pub const F64_BYTES: usize = std::mem::size_of::<f64>();

/// Minimum inner batch length before the `parallel` feature hands a loop to
/// rayon.
///
/// Shorter batches run sequentially; splitting them costs more than it saves.
pub const PARALLEL_MIN_BATCH: usize = 64;
