//! Typed strided views over `f64` buffers.
//!
//! A view is a buffer, a starting element offset, and one [`VectorWalk`] per
//! axis. Views never own or copy data. Every access is a bounds-checked
//! slice index, so a view whose walks reach outside its buffer panics
//! instead of reading stray memory; the checked constructors in
//! [`crate::array`] reject such layouts up front.
//!
//! Iteration advances positions by repeated addition of the stride, the
//! same discipline as the kernels' inner loops.

use crate::walk::VectorWalk;

#[inline]
fn at(pos: isize) -> usize {
    debug_assert!(pos >= 0, "strided position {pos} before buffer start");
    pos as usize
}

/// A read-only 1-D strided view.
#[derive(Clone, Copy, Debug)]
pub struct StridedView<'a> {
    data: &'a [f64],
    start: isize,
    walk: VectorWalk,
}

impl<'a> StridedView<'a> {
    /// View `walk.len()` elements of `data`, beginning at `start`.
    #[inline]
    #[must_use]
    pub fn new(data: &'a [f64], start: isize, walk: VectorWalk) -> Self {
        Self { data, start, walk }
    }

    /// View a contiguous slice.
    #[inline]
    #[must_use]
    pub fn contiguous(data: &'a [f64]) -> Self {
        Self::new(data, 0, VectorWalk::new(data.len(), 1))
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.walk.len()
    }

    /// `true` if the view has no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walk.is_empty()
    }

    /// The walk this view follows.
    #[inline]
    #[must_use]
    pub fn walk(&self) -> VectorWalk {
        self.walk
    }

    /// Element `index`.
    ///
    /// # Panics
    ///
    /// Panics if the addressed position is outside the buffer.
    #[inline]
    #[must_use]
    pub fn read(&self, index: usize) -> f64 {
        self.data[at(self.start + index as isize * self.walk.stride())]
    }

    /// Elements in walk order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = f64> + 'a {
        let data = self.data;
        self.walk.offsets(self.start).map(move |pos| data[at(pos)])
    }
}

/// A writable 1-D strided view.
#[derive(Debug)]
pub struct StridedViewMut<'a> {
    data: &'a mut [f64],
    start: isize,
    walk: VectorWalk,
}

impl<'a> StridedViewMut<'a> {
    /// View `walk.len()` elements of `data`, beginning at `start`.
    #[inline]
    pub fn new(data: &'a mut [f64], start: isize, walk: VectorWalk) -> Self {
        Self { data, start, walk }
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.walk.len()
    }

    /// `true` if the view has no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walk.is_empty()
    }

    /// Element `index`.
    #[inline]
    #[must_use]
    pub fn read(&self, index: usize) -> f64 {
        self.data[at(self.start + index as isize * self.walk.stride())]
    }

    /// Overwrite element `index`.
    #[inline]
    pub fn write(&mut self, index: usize, value: f64) {
        self.data[at(self.start + index as isize * self.walk.stride())] = value;
    }

    /// Write `values` in walk order, stopping at whichever ends first.
    pub fn assign<I: IntoIterator<Item = f64>>(&mut self, values: I) {
        for (pos, value) in self.walk.offsets(self.start).zip(values) {
            self.data[at(pos)] = value;
        }
    }
}

/// A read-only 2-D strided view: a row walk and a column walk.
#[derive(Clone, Copy, Debug)]
pub struct MatrixView<'a> {
    data: &'a [f64],
    start: isize,
    rows: VectorWalk,
    columns: VectorWalk,
}

impl<'a> MatrixView<'a> {
    /// View a matrix of `rows.len() x columns.len()` elements of `data`.
    #[inline]
    #[must_use]
    pub fn new(data: &'a [f64], start: isize, rows: VectorWalk, columns: VectorWalk) -> Self {
        Self {
            data,
            start,
            rows,
            columns,
        }
    }

    /// View a contiguous row-major matrix.
    #[must_use]
    pub fn row_major(data: &'a [f64], rows: usize, columns: usize) -> Self {
        Self::new(
            data,
            0,
            VectorWalk::new(rows, columns as isize),
            VectorWalk::new(columns, 1),
        )
    }

    /// Row walk.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> VectorWalk {
        self.rows
    }

    /// Column walk.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> VectorWalk {
        self.columns
    }

    /// Element at (`row`, `column`).
    #[inline]
    #[must_use]
    pub fn read(&self, row: usize, column: usize) -> f64 {
        let pos = self.start
            + row as isize * self.rows.stride()
            + column as isize * self.columns.stride();
        self.data[at(pos)]
    }

    /// Each row as a [`StridedView`] along the columns.
    #[inline]
    pub fn row_views(&self) -> impl Iterator<Item = StridedView<'a>> + Clone + 'a {
        let (data, columns) = (self.data, self.columns);
        self.rows
            .offsets(self.start)
            .map(move |pos| StridedView::new(data, pos, columns))
    }

    /// Each column as a [`StridedView`] along the rows.
    #[inline]
    pub fn column_views(&self) -> impl Iterator<Item = StridedView<'a>> + Clone + 'a {
        let (data, rows) = (self.data, self.rows);
        self.columns
            .offsets(self.start)
            .map(move |pos| StridedView::new(data, pos, rows))
    }

    /// The same data with rows and columns swapped.
    #[inline]
    #[must_use]
    pub fn t(&self) -> Self {
        Self::new(self.data, self.start, self.columns, self.rows)
    }
}

/// A writable 2-D strided view.
#[derive(Debug)]
pub struct MatrixViewMut<'a> {
    data: &'a mut [f64],
    start: isize,
    rows: VectorWalk,
    columns: VectorWalk,
}

impl<'a> MatrixViewMut<'a> {
    /// View a writable matrix of `rows.len() x columns.len()` elements.
    #[inline]
    pub fn new(data: &'a mut [f64], start: isize, rows: VectorWalk, columns: VectorWalk) -> Self {
        Self {
            data,
            start,
            rows,
            columns,
        }
    }

    /// View a contiguous row-major matrix.
    pub fn row_major(data: &'a mut [f64], rows: usize, columns: usize) -> Self {
        Self::new(
            data,
            0,
            VectorWalk::new(rows, columns as isize),
            VectorWalk::new(columns, 1),
        )
    }

    /// Row walk.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> VectorWalk {
        self.rows
    }

    /// Column walk.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> VectorWalk {
        self.columns
    }

    /// Element at (`row`, `column`).
    #[inline]
    #[must_use]
    pub fn read(&self, row: usize, column: usize) -> f64 {
        let pos = self.start
            + row as isize * self.rows.stride()
            + column as isize * self.columns.stride();
        self.data[at(pos)]
    }

    /// Overwrite element (`row`, `column`).
    #[inline]
    pub fn write(&mut self, row: usize, column: usize, value: f64) {
        let pos = self.start
            + row as isize * self.rows.stride()
            + column as isize * self.columns.stride();
        self.data[at(pos)] = value;
    }

    /// Write row by row. Each inner iterator fills one row in column order;
    /// surplus rows or values are ignored, missing ones leave data untouched.
    pub fn assign_rows<R, I>(&mut self, rows: R)
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = f64>,
    {
        let columns = self.columns;
        for (row_pos, values) in self.rows.offsets(self.start).zip(rows) {
            for (pos, value) in columns.offsets(row_pos).zip(values) {
                self.data[at(pos)] = value;
            }
        }
    }

    /// Read-only view of the same elements.
    #[inline]
    #[must_use]
    pub fn as_view(&self) -> MatrixView<'_> {
        MatrixView::new(&*self.data, self.start, self.rows, self.columns)
    }
}
