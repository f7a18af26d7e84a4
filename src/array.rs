//! Checked n-dimensional strided operands.
//!
//! [`ArrayView`] and [`ArrayViewMut`] pair a `f64` buffer with an element
//! offset, a shape, and one signed element stride per dimension. Leading
//! dimensions are batch dimensions and trailing ones are core dimensions;
//! which is which is decided by the operation's signature, not here.
//!
//! Construction checks that every reachable element lies inside the
//! buffer, so the loops driven from [`crate::gufunc`] never index out of
//! bounds. Empty arrays (any zero-length dimension) reach nothing and pass.
//! Strides of size-1 dimensions, and every stride of an empty array, are
//! stored as 0 since no cursor ever reads through them.
//!
//! Byte strides, as a host array library reports them, are accepted by
//! [`ArrayView::from_byte_strides`] and converted to element strides.

use crate::error::{Error, Result};
use crate::F64_BYTES;

/// Offset, shape and strides shared by both view kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Layout {
    offset: usize,
    shape: Vec<usize>,
    strides: Vec<isize>,
}

impl Layout {
    fn new(offset: usize, shape: Vec<usize>, strides: Vec<isize>, len: usize) -> Result<Self> {
        if shape.len() != strides.len() {
            return Err(Error::StrideLength {
                shape: shape.len(),
                strides: strides.len(),
            });
        }
        let layout = Self {
            offset,
            strides: normalized_strides(&shape, strides),
            shape,
        };
        layout.check_reach(len)?;
        Ok(layout)
    }

    fn row_major(shape: Vec<usize>, len: usize) -> Result<Self> {
        let mut strides = vec![0isize; shape.len()];
        let mut step: isize = 1;
        for (stride, &n) in strides.iter_mut().zip(&shape).rev() {
            *stride = step;
            let n = isize::try_from(n).map_err(|_| Error::Overflow)?;
            step = step.checked_mul(n.max(1)).ok_or(Error::Overflow)?;
        }
        Self::new(0, shape, strides, len)
    }

    fn is_empty(&self) -> bool {
        self.shape.iter().any(|&n| n == 0)
    }

    fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Lowest and highest element offsets reachable, `None` when empty.
    fn reach(&self) -> Result<Option<(isize, isize)>> {
        if self.is_empty() {
            return Ok(None);
        }
        let origin = isize::try_from(self.offset).map_err(|_| Error::Overflow)?;
        let (mut min, mut max) = (origin, origin);
        for (&n, &stride) in self.shape.iter().zip(&self.strides) {
            let last = isize::try_from(n - 1).map_err(|_| Error::Overflow)?;
            let span = last.checked_mul(stride).ok_or(Error::Overflow)?;
            if span < 0 {
                min = min.checked_add(span).ok_or(Error::Overflow)?;
            } else {
                max = max.checked_add(span).ok_or(Error::Overflow)?;
            }
        }
        Ok(Some((min, max)))
    }

    fn check_reach(&self, len: usize) -> Result<()> {
        match self.reach()? {
            Some((min, max)) if min < 0 || max as usize >= len => {
                Err(Error::OutOfBounds { min, max, len })
            }
            _ => Ok(()),
        }
    }

    fn position(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut pos = self.offset as isize;
        for ((&i, &n), &stride) in index.iter().zip(&self.shape).zip(&self.strides) {
            if i >= n {
                return None;
            }
            pos += i as isize * stride;
        }
        Some(pos as usize)
    }
}

/// Zero the strides that never move a cursor to a readable element: those
/// of size-1 dimensions, and all of them when the array is empty.
fn normalized_strides(shape: &[usize], mut strides: Vec<isize>) -> Vec<isize> {
    let empty = shape.contains(&0);
    for (stride, &n) in strides.iter_mut().zip(shape) {
        if empty || n == 1 {
            *stride = 0;
        }
    }
    strides
}

fn bytes_to_elements(bytes: isize) -> Result<isize> {
    let width = F64_BYTES as isize;
    if bytes % width != 0 {
        return Err(Error::Misaligned(bytes));
    }
    Ok(bytes / width)
}

fn byte_layout(byte_offset: usize, byte_strides: &[isize]) -> Result<(usize, Vec<isize>)> {
    if byte_offset % F64_BYTES != 0 {
        return Err(Error::Misaligned(byte_offset as isize));
    }
    let strides = byte_strides
        .iter()
        .map(|&b| bytes_to_elements(b))
        .collect::<Result<Vec<_>>>()?;
    Ok((byte_offset / F64_BYTES, strides))
}

/// A read-only strided operand.
///
/// # Example
///
/// ```rust
/// use distratio::ArrayView;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// // 2x3 row-major, then the same data viewed as 3x2 column-major.
/// let a = ArrayView::contiguous(&data, &[2, 3]).unwrap();
/// let b = ArrayView::new(&data, &[3, 2], &[1, 3]).unwrap();
/// assert_eq!(a.get(&[1, 0]), Some(4.0));
/// assert_eq!(b.get(&[0, 1]), Some(4.0));
/// ```
#[derive(Clone, Debug)]
pub struct ArrayView<'a> {
    data: &'a [f64],
    layout: Layout,
}

impl<'a> ArrayView<'a> {
    /// View `data` with element `strides`, starting at element 0.
    pub fn new(
        data: &'a [f64],
        shape: &[usize],
        strides: &[isize],
    ) -> Result<Self> {
        Self::with_offset(data, 0, shape, strides)
    }

    /// View `data` with element `strides`, starting at element `offset`.
    pub fn with_offset(
        data: &'a [f64],
        offset: usize,
        shape: &[usize],
        strides: &[isize],
    ) -> Result<Self> {
        let layout = Layout::new(offset, shape.to_vec(), strides.to_vec(), data.len())?;
        Ok(Self { data, layout })
    }

    /// View `data` with byte offset and byte strides.
    pub fn from_byte_strides(
        data: &'a [f64],
        byte_offset: usize,
        shape: &[usize],
        byte_strides: &[isize],
    ) -> Result<Self> {
        let (offset, strides) = byte_layout(byte_offset, byte_strides)?;
        Self::with_offset(data, offset, shape, &strides)
    }

    /// View `data` as a packed row-major array of `shape`.
    pub fn contiguous(data: &'a [f64], shape: &[usize]) -> Result<Self> {
        let layout = Layout::row_major(shape.to_vec(), data.len())?;
        Ok(Self { data, layout })
    }

    /// Backing buffer.
    #[must_use]
    pub fn data(&self) -> &'a [f64] {
        self.data
    }

    /// Element offset of index `[0, 0, ...]`.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.layout.offset
    }

    /// Shape, batch dimensions first.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.layout.shape
    }

    /// Element strides, one per dimension.
    #[must_use]
    pub fn strides(&self) -> &[isize] {
        &self.layout.strides
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.layout.shape.len()
    }

    /// Number of logical elements.
    #[must_use]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Element at `index`, or `None` if the index is out of range.
    #[must_use]
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.layout.position(index).map(|pos| self.data[pos])
    }
}

/// A writable strided operand.
#[derive(Debug)]
pub struct ArrayViewMut<'a> {
    data: &'a mut [f64],
    layout: Layout,
}

impl<'a> ArrayViewMut<'a> {
    /// View `data` with element `strides`, starting at element 0.
    pub fn new(
        data: &'a mut [f64],
        shape: &[usize],
        strides: &[isize],
    ) -> Result<Self> {
        Self::with_offset(data, 0, shape, strides)
    }

    /// View `data` with element `strides`, starting at element `offset`.
    pub fn with_offset(
        data: &'a mut [f64],
        offset: usize,
        shape: &[usize],
        strides: &[isize],
    ) -> Result<Self> {
        let layout = Layout::new(offset, shape.to_vec(), strides.to_vec(), data.len())?;
        Ok(Self { data, layout })
    }

    /// View `data` with byte offset and byte strides.
    pub fn from_byte_strides(
        data: &'a mut [f64],
        byte_offset: usize,
        shape: &[usize],
        byte_strides: &[isize],
    ) -> Result<Self> {
        let (offset, strides) = byte_layout(byte_offset, byte_strides)?;
        Self::with_offset(data, offset, shape, &strides)
    }

    /// View `data` as a packed row-major array of `shape`.
    pub fn contiguous(data: &'a mut [f64], shape: &[usize]) -> Result<Self> {
        let layout = Layout::row_major(shape.to_vec(), data.len())?;
        Ok(Self { data, layout })
    }

    /// Element offset of index `[0, 0, ...]`.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.layout.offset
    }

    /// Shape, batch dimensions first.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.layout.shape
    }

    /// Element strides, one per dimension.
    #[must_use]
    pub fn strides(&self) -> &[isize] {
        &self.layout.strides
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.layout.shape.len()
    }

    /// Element at `index`, or `None` if the index is out of range.
    #[must_use]
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.layout.position(index).map(|pos| self.data[pos])
    }

    /// Overwrite the element at `index`. Returns `false` if out of range.
    pub fn set(&mut self, index: &[usize], value: f64) -> bool {
        match self.layout.position(index) {
            Some(pos) => {
                self.data[pos] = value;
                true
            }
            None => false,
        }
    }

    /// Read-only view of the same elements.
    #[must_use]
    pub fn as_view(&self) -> ArrayView<'_> {
        ArrayView {
            data: &*self.data,
            layout: self.layout.clone(),
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut *self.data
    }
}
