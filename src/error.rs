//! Errors raised while binding operands to an operation.
//!
//! The kernels and loops themselves never fail; everything here is detected
//! before any kernel runs.

/// Reasons a call is rejected before any kernel runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A signature string could not be parsed.
    #[error("invalid signature {signature:?}: {reason}")]
    Signature {
        /// The offending text.
        signature: String,
        /// What went wrong.
        reason: &'static str,
    },
    /// No operation is registered under this name.
    #[error("unknown operation {0:?}")]
    UnknownOperation(String),
    /// Wrong number of input or output operands.
    #[error("{op}: expected {expected} {kind} operands, got {got}")]
    OperandCount {
        /// Operation name.
        op: &'static str,
        /// `"input"` or `"output"`.
        kind: &'static str,
        /// Operands required by the signature.
        expected: usize,
        /// Operands supplied.
        got: usize,
    },
    /// An operand has fewer dimensions than its core shape needs.
    #[error("operand {operand}: rank {rank} is below core rank {core}")]
    CoreRank {
        /// Operand position (inputs first, then outputs).
        operand: usize,
        /// Operand rank.
        rank: usize,
        /// Core dimensions required.
        core: usize,
    },
    /// Two operands disagree on the size of a named core dimension.
    #[error("core dimension {dim:?}: size {found} conflicts with {expected}")]
    CoreDimMismatch {
        /// Dimension name from the signature.
        dim: String,
        /// Size bound first.
        expected: usize,
        /// Conflicting size.
        found: usize,
    },
    /// Input batch shapes do not broadcast.
    #[error("batch shapes {0:?} and {1:?} do not broadcast")]
    Broadcast(Vec<usize>, Vec<usize>),
    /// An output's batch shape is not the broadcast batch shape.
    #[error("output {operand}: batch shape {found:?} differs from broadcast shape {expected:?}")]
    OutputShape {
        /// Output position.
        operand: usize,
        /// Broadcast batch shape.
        expected: Vec<usize>,
        /// Output batch shape.
        found: Vec<usize>,
    },
    /// `shape` and `strides` have different lengths.
    #[error("shape has {shape} dims but strides has {strides}")]
    StrideLength {
        /// Length of the shape.
        shape: usize,
        /// Length of the strides.
        strides: usize,
    },
    /// A byte stride or offset is not a whole number of `f64` elements.
    #[error("byte distance {0} is not a multiple of the element size")]
    Misaligned(isize),
    /// The layout reaches outside the buffer.
    #[error("layout reaches elements {min}..={max} of a buffer of length {len}")]
    OutOfBounds {
        /// Lowest element offset reached.
        min: isize,
        /// Highest element offset reached.
        max: isize,
        /// Buffer length.
        len: usize,
    },
    /// Offset arithmetic overflowed `isize`.
    #[error("offset overflow while computing strided reach")]
    Overflow,
}

/// Result alias used by the binding layer.
pub type Result<T> = std::result::Result<T, Error>;
