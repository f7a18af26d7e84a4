//! Operation registry and binding.
//!
//! Turns checked [`ArrayView`]s into the loop calls of [`crate::loops`]:
//!
//! 1. Split each operand into leading batch dims and trailing core dims,
//!    using the operation's [`Signature`].
//! 2. Bind every core dimension name to one size across all operands.
//! 3. Broadcast the input batch shapes (NumPy rules) and require every
//!    output to carry exactly the broadcast batch shape.
//! 4. Hand the innermost batch dimension to the engine as its batch length
//!    and walk the remaining batch dimensions with an odometer, one loop
//!    call per outer index.
//!
//! # Example
//!
//! ```rust
//! use distratio::{ArrayView, ArrayViewMut, Operation};
//!
//! let x = [1.0, 2.0, 3.0, 4.0];
//! let y = [5.0, 6.0, 7.0, 8.0];
//! let mut z = [0.0; 4];
//!
//! let op: Operation = "matmul".parse().unwrap();
//! op.call(
//!     &[
//!         ArrayView::contiguous(&x, &[2, 2]).unwrap(),
//!         ArrayView::contiguous(&y, &[2, 2]).unwrap(),
//!     ],
//!     &mut [ArrayViewMut::contiguous(&mut z, &[2, 2]).unwrap()],
//! )
//! .unwrap();
//! assert_eq!(z, [19.0, 22.0, 43.0, 50.0]);
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::array::{ArrayView, ArrayViewMut};
use crate::engine::OuterLoop;
use crate::error::{Error, Result};
use crate::loops::{self, LoopArgs};
use crate::signature::Signature;

/// The registered operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `(d,m),(d,n)->(),()`
    PdistRatio,
    /// `(d1,m),(d2,m),(d1,n),(d2,n)->(),()`
    CdistRatio,
    /// `(m,n),(n,p)->(m,p)`
    Matmul,
    /// `(n)->()`
    Norm,
}

impl Operation {
    /// Every operation, in registration order.
    pub const ALL: [Operation; 4] = [
        Operation::PdistRatio,
        Operation::CdistRatio,
        Operation::Matmul,
        Operation::Norm,
    ];

    /// Registered name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Operation::PdistRatio => "pdist_ratio",
            Operation::CdistRatio => "cdist_ratio",
            Operation::Matmul => "matmul",
            Operation::Norm => "norm",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn doc(self) -> &'static str {
        match self {
            Operation::PdistRatio => {
                "Min and max ratio of pairwise distances between the same points in two spaces."
            }
            Operation::CdistRatio => {
                "Min and max ratio of cross distances between two point sets in two spaces."
            }
            Operation::Matmul => "Matrix product over the last two dimensions.",
            Operation::Norm => "Euclidean norm over the last dimension.",
        }
    }

    /// Core dimensions of every operand.
    #[must_use]
    pub fn signature(self) -> Signature {
        match self {
            Operation::PdistRatio => Signature::from_names(&[&["d", "m"], &["d", "n"]], &[&[], &[]]),
            Operation::CdistRatio => Signature::from_names(
                &[&["d1", "m"], &["d2", "m"], &["d1", "n"], &["d2", "n"]],
                &[&[], &[]],
            ),
            Operation::Matmul => Signature::from_names(&[&["m", "n"], &["n", "p"]], &[&["m", "p"]]),
            Operation::Norm => Signature::from_names(&[&["n"]], &[&[]]),
        }
    }

    /// Number of inputs.
    #[must_use]
    pub const fn nin(self) -> usize {
        match self {
            Operation::PdistRatio | Operation::Matmul => 2,
            Operation::CdistRatio => 4,
            Operation::Norm => 1,
        }
    }

    /// Number of outputs.
    #[must_use]
    pub const fn nout(self) -> usize {
        match self {
            Operation::PdistRatio | Operation::CdistRatio => 2,
            Operation::Matmul | Operation::Norm => 1,
        }
    }

    /// Bind `inputs` and `outputs` and run the operation over every batch
    /// element. Nothing is written if binding fails.
    pub fn call(self, inputs: &[ArrayView<'_>], outputs: &mut [ArrayViewMut<'_>]) -> Result<()> {
        let bound = self.bind(inputs, outputs)?;
        debug!(
            op = self.name(),
            batch = ?bound.batch_shape,
            dims = ?bound.dims,
            "dispatch"
        );

        match (self, inputs, outputs) {
            (Operation::PdistRatio, [num, den], [drmin, drmax]) => {
                for_each_block::<4, _>(&bound, |args| {
                    loops::pdist_ratio([num.data(), den.data()], [drmin.data_mut(), drmax.data_mut()], args)
                });
            }
            (Operation::CdistRatio, [nf, nt, df, dt], [drmin, drmax]) => {
                for_each_block::<6, _>(&bound, |args| {
                    loops::cdist_ratio(
                        [nf.data(), nt.data(), df.data(), dt.data()],
                        [drmin.data_mut(), drmax.data_mut()],
                        args,
                    )
                });
            }
            (Operation::Matmul, [x, y], [z]) => {
                for_each_block::<3, _>(&bound, |args| loops::matmul([x.data(), y.data()], [z.data_mut()], args));
            }
            (Operation::Norm, [x], [r]) => {
                for_each_block::<2, _>(&bound, |args| loops::norm([x.data()], [r.data_mut()], args));
            }
            (_, inputs, outputs) => {
                // `bind` already checked the counts.
                return Err(self.count_error(inputs.len(), outputs.len()));
            }
        }
        Ok(())
    }

    fn count_error(self, nin: usize, nout: usize) -> Error {
        if nin != self.nin() {
            Error::OperandCount {
                op: self.name(),
                kind: "input",
                expected: self.nin(),
                got: nin,
            }
        } else {
            Error::OperandCount {
                op: self.name(),
                kind: "output",
                expected: self.nout(),
                got: nout,
            }
        }
    }

    fn bind(self, inputs: &[ArrayView<'_>], outputs: &[ArrayViewMut<'_>]) -> Result<Bound> {
        if inputs.len() != self.nin() || outputs.len() != self.nout() {
            return Err(self.count_error(inputs.len(), outputs.len()));
        }
        let signature = self.signature();
        let names = signature.dim_names();
        let mut sizes: Vec<Option<usize>> = vec![None; names.len()];

        let operands = inputs
            .iter()
            .map(|a| (a.shape(), a.strides(), a.offset()))
            .chain(outputs.iter().map(|a| (a.shape(), a.strides(), a.offset())));

        let mut batch_shapes = Vec::new();
        let mut batch_strides = Vec::new();
        let mut steps = Vec::new();
        let mut offsets = Vec::new();

        for (operand, ((shape, strides, offset), core)) in operands.zip(signature.operands()).enumerate() {
            let rank = shape.len();
            if rank < core.len() {
                return Err(Error::CoreRank {
                    operand,
                    rank,
                    core: core.len(),
                });
            }
            let split = rank - core.len();
            for (name, &size) in core.iter().zip(&shape[split..]) {
                let slot = names.iter().position(|n| *n == name.as_str()).map(|i| &mut sizes[i]);
                match slot {
                    Some(Some(bound)) if *bound != size => {
                        return Err(Error::CoreDimMismatch {
                            dim: name.clone(),
                            expected: *bound,
                            found: size,
                        });
                    }
                    Some(slot) => *slot = Some(size),
                    None => {}
                }
            }
            batch_shapes.push(&shape[..split]);
            batch_strides.push(&strides[..split]);
            steps.extend_from_slice(&strides[split..]);
            offsets.push(isize::try_from(offset).map_err(|_| Error::Overflow)?);
        }

        let nin = inputs.len();
        let batch_shape = batch_shapes[..nin]
            .iter()
            .try_fold(Vec::new(), |acc, shape| broadcast_shape(&acc, shape))?;
        for (i, found) in batch_shapes[nin..].iter().enumerate() {
            if *found != batch_shape.as_slice() {
                return Err(Error::OutputShape {
                    operand: i,
                    expected: batch_shape.clone(),
                    found: found.to_vec(),
                });
            }
        }

        let batch_strides = batch_shapes
            .iter()
            .zip(&batch_strides)
            .map(|(shape, strides)| broadcast_strides(&batch_shape, shape, strides))
            .collect();

        Ok(Bound {
            dims: sizes.into_iter().map(|s| s.unwrap_or(0)).collect(),
            batch_shape,
            batch_strides,
            steps,
            offsets,
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

/// Broadcast two batch shapes with NumPy rules: right-aligned, each pair
/// of sizes equal or one of them 1.
///
/// ```rust
/// use distratio::gufunc::broadcast_shape;
///
/// assert_eq!(broadcast_shape(&[4, 1, 3], &[5, 1]).unwrap(), vec![4, 5, 3]);
/// assert!(broadcast_shape(&[2], &[3]).is_err());
/// ```
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let rank = a.len().max(b.len());
    let at = |s: &[usize], i: usize| (i + s.len()).checked_sub(rank).map_or(1, |j| s[j]);
    (0..rank)
        .map(|i| match (at(a, i), at(b, i)) {
            (x, y) if x == y => Ok(x),
            (1, y) => Ok(y),
            (x, 1) => Ok(x),
            _ => Err(Error::Broadcast(a.to_vec(), b.to_vec())),
        })
        .collect()
}

/// Strides of `shape` aligned to `target`; missing and size-1 dims get 0.
fn broadcast_strides(target: &[usize], shape: &[usize], strides: &[isize]) -> Vec<isize> {
    let pad = target.len() - shape.len();
    (0..target.len())
        .map(|i| match i.checked_sub(pad) {
            Some(j) if shape[j] != 1 => strides[j],
            _ => 0,
        })
        .collect()
}

/// Everything one call needs after binding.
#[derive(Debug)]
struct Bound {
    batch_shape: Vec<usize>,
    /// Per operand, aligned to `batch_shape`.
    batch_strides: Vec<Vec<isize>>,
    /// Core sizes in first-appearance order of the signature's names.
    dims: Vec<usize>,
    /// Core strides, operand by operand.
    steps: Vec<isize>,
    offsets: Vec<isize>,
}

/// Run `block` once per outer batch index.
fn for_each_block<const K: usize, F>(bound: &Bound, mut block: F)
where
    F: FnMut(&LoopArgs<'_, K>),
{
    let mut origins: [isize; K] = std::array::from_fn(|k| bound.offsets[k]);

    let Some((&inner, outer_shape)) = bound.batch_shape.split_last() else {
        block(&LoopArgs::new(OuterLoop::new(1, [0; K]), origins, &bound.dims, &bound.steps));
        return;
    };
    if inner == 0 || outer_shape.contains(&0) {
        return;
    }

    let last = outer_shape.len();
    let outer = OuterLoop::new(inner, std::array::from_fn(|k| bound.batch_strides[k][last]));
    let mut index = vec![0usize; last];

    loop {
        block(&LoopArgs::new(outer, origins, &bound.dims, &bound.steps));

        // Odometer step, innermost outer dim first.
        let mut axis = last;
        loop {
            if axis == 0 {
                return;
            }
            axis -= 1;
            index[axis] += 1;
            // Wraps only on the unread step past the end of an axis.
            for (k, origin) in origins.iter_mut().enumerate() {
                *origin = origin.wrapping_add(bound.batch_strides[k][axis]);
            }
            if index[axis] < outer_shape[axis] {
                break;
            }
            for (k, origin) in origins.iter_mut().enumerate() {
                let span = (outer_shape[axis] as isize).wrapping_mul(bound.batch_strides[k][axis]);
                *origin = origin.wrapping_sub(span);
            }
            index[axis] = 0;
        }
    }
}

/// Pairwise distance-ratio extremes: `num` is `(..., d, m)`, `den` is
/// `(..., d, n)`; `drmin` and `drmax` carry the broadcast batch shape.
pub fn pdist_ratio(
    num: ArrayView<'_>,
    den: ArrayView<'_>,
    drmin: ArrayViewMut<'_>,
    drmax: ArrayViewMut<'_>,
) -> Result<()> {
    Operation::PdistRatio.call(&[num, den], &mut [drmin, drmax])
}

/// Cross distance-ratio extremes between a "from" and a "to" point set.
pub fn cdist_ratio(
    num_from: ArrayView<'_>,
    num_to: ArrayView<'_>,
    den_from: ArrayView<'_>,
    den_to: ArrayView<'_>,
    drmin: ArrayViewMut<'_>,
    drmax: ArrayViewMut<'_>,
) -> Result<()> {
    Operation::CdistRatio.call(&[num_from, num_to, den_from, den_to], &mut [drmin, drmax])
}

/// Batched matrix product `z = x @ y`.
pub fn matmul(x: ArrayView<'_>, y: ArrayView<'_>, z: ArrayViewMut<'_>) -> Result<()> {
    Operation::Matmul.call(&[x, y], &mut [z])
}

/// Batched Euclidean norm over the last dimension.
pub fn norm(x: ArrayView<'_>, r: ArrayViewMut<'_>) -> Result<()> {
    Operation::Norm.call(&[x], &mut [r])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
            assert_eq!(op.signature().nin(), op.nin());
            assert_eq!(op.signature().nout(), op.nout());
        }
        assert_eq!(
            "nope".parse::<Operation>().unwrap_err(),
            Error::UnknownOperation("nope".into())
        );
    }

    #[test]
    fn signatures_render_canonically() {
        let rendered: Vec<String> = Operation::ALL.iter().map(|op| op.signature().to_string()).collect();
        assert_eq!(
            rendered,
            [
                "(d,m),(d,n)->(),()",
                "(d1,m),(d2,m),(d1,n),(d2,n)->(),()",
                "(m,n),(n,p)->(m,p)",
                "(n)->()",
            ]
        );
    }

    #[test]
    fn broadcast_rules() {
        assert_eq!(broadcast_shape(&[], &[3]).unwrap(), vec![3]);
        assert_eq!(broadcast_shape(&[2, 1], &[1, 5]).unwrap(), vec![2, 5]);
        assert_eq!(broadcast_shape(&[0], &[1]).unwrap(), vec![0]);
        assert_eq!(
            broadcast_shape(&[2, 3], &[4, 3]).unwrap_err(),
            Error::Broadcast(vec![2, 3], vec![4, 3])
        );
    }

    #[test]
    fn broadcast_strides_zero_missing_and_unit_dims() {
        assert_eq!(broadcast_strides(&[4, 5, 3], &[5, 1], &[7, 9]), vec![0, 7, 0]);
    }

    #[test]
    fn odometer_visits_outer_indices_in_order() {
        let bound = Bound {
            batch_shape: vec![2, 3, 4],
            batch_strides: vec![vec![100, 10, 1], vec![0, 0, 0]],
            dims: vec![],
            steps: vec![],
            offsets: vec![5, 0],
        };
        let mut origins = Vec::new();
        for_each_block::<2, _>(&bound, |args| {
            assert_eq!(args.outer.len(), 4);
            origins.push(args.origins[0]);
        });
        assert_eq!(origins, vec![5, 15, 25, 105, 115, 125]);
    }

    #[test]
    fn zero_rank_batch_runs_once() {
        let bound = Bound {
            batch_shape: vec![],
            batch_strides: vec![vec![], vec![]],
            dims: vec![],
            steps: vec![],
            offsets: vec![3, 4],
        };
        let mut calls = 0;
        for_each_block::<2, _>(&bound, |args| {
            assert_eq!(args.outer.len(), 1);
            assert_eq!(args.origins, [3, 4]);
            calls += 1;
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_size_outer_dim_runs_nothing() {
        let bound = Bound {
            batch_shape: vec![0, 3],
            batch_strides: vec![vec![3, 1]],
            dims: vec![],
            steps: vec![],
            offsets: vec![0],
        };
        let mut calls = 0;
        for_each_block::<1, _>(&bound, |_| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn binding_rejects_mismatched_core_dims() {
        let x = [0.0; 6];
        let y = [0.0; 6];
        let mut z = [0.0; 4];
        let err = matmul(
            ArrayView::contiguous(&x, &[2, 3]).unwrap(),
            ArrayView::contiguous(&y, &[2, 3]).unwrap(),
            ArrayViewMut::contiguous(&mut z, &[2, 2]).unwrap(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::CoreDimMismatch {
                dim: "n".into(),
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn binding_rejects_wrong_counts_and_ranks() {
        let x = [0.0; 3];
        let mut r = [0.0; 1];
        let err = Operation::Norm.call(&[], &mut [ArrayViewMut::contiguous(&mut r, &[]).unwrap()]);
        assert!(matches!(err, Err(Error::OperandCount { kind: "input", expected: 1, got: 0, .. })));

        let err = Operation::Matmul.call(
            &[ArrayView::contiguous(&x, &[3]).unwrap(), ArrayView::contiguous(&x, &[3, 1]).unwrap()],
            &mut [ArrayViewMut::contiguous(&mut r, &[1, 1]).unwrap()],
        );
        assert_eq!(err, Err(Error::CoreRank { operand: 0, rank: 1, core: 2 }));
    }

    #[test]
    fn output_must_have_broadcast_batch_shape() {
        let x = [0.0; 6];
        let mut r = [0.0; 3];
        let err = norm(
            ArrayView::contiguous(&x, &[2, 3]).unwrap(),
            ArrayViewMut::contiguous(&mut r, &[3]).unwrap(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::OutputShape {
                operand: 0,
                expected: vec![2],
                found: vec![3]
            }
        );
    }
}
