//! Broadcast outer-loop engine.
//!
//! Runs a kernel body once per batch element. Each of the `K` operands has
//! an origin and an outer step (elements to advance to the next batch
//! element); the engine keeps one cursor per operand and moves them all in
//! lock-step by adding their steps.
//!
//! ```text
//! cursor = origins
//! repeat len times:
//!     body(cursor)
//!     cursor[k] += steps[k]   for every operand k
//! ```
//!
//! The engine knows nothing about element types or core shapes. It never
//! touches memory; it only produces positions.
//!
//! # Example
//!
//! ```rust
//! use distratio::OuterLoop;
//!
//! let outer = OuterLoop::new(3, [2, -1]);
//! let mut seen = Vec::new();
//! outer.run([0, 10], |cursor| seen.push(*cursor));
//! assert_eq!(seen, vec![[0, 10], [2, 9], [4, 8]]);
//! ```

/// Outer loop over a batch of `len` elements for `K` operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OuterLoop<const K: usize> {
    len: usize,
    steps: [isize; K],
}

impl<const K: usize> OuterLoop<K> {
    /// A batch of `len` elements with per-operand outer `steps`.
    #[inline]
    #[must_use]
    pub const fn new(len: usize, steps: [isize; K]) -> Self {
        Self { len, steps }
    }

    /// Batch length.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` if the body will never run.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Per-operand outer steps.
    #[inline]
    #[must_use]
    pub const fn steps(&self) -> &[isize; K] {
        &self.steps
    }

    /// Call `body` once per batch element with the current cursors.
    #[inline]
    pub fn run<F>(&self, origins: [isize; K], mut body: F)
    where
        F: FnMut(&[isize; K]),
    {
        for cursor in self.cursors(origins) {
            body(&cursor);
        }
    }

    /// Cursors for every batch element, advanced by repeated addition.
    #[inline]
    pub fn cursors(&self, origins: [isize; K]) -> Cursors<K> {
        Cursors {
            cursor: origins,
            steps: self.steps,
            remaining: self.len,
        }
    }

    /// Cursor of batch element `index`, `origins + index * steps`.
    #[inline]
    #[must_use]
    pub fn cursor_at(&self, origins: [isize; K], index: usize) -> [isize; K] {
        let mut cursor = origins;
        for (c, &step) in cursor.iter_mut().zip(&self.steps) {
            *c = c.wrapping_add((index as isize).wrapping_mul(step));
        }
        cursor
    }

    /// Evaluate `body` for every batch element on the rayon pool.
    ///
    /// Results come back in batch order. Cursors are computed by
    /// multiplication, which lands on the same positions as [`Self::run`].
    #[cfg(feature = "parallel")]
    pub fn par_map<R, F>(&self, origins: [isize; K], body: F) -> Vec<R>
    where
        R: Send,
        F: Fn(&[isize; K]) -> R + Sync + Send,
    {
        use rayon::prelude::*;

        (0..self.len)
            .into_par_iter()
            .map(|i| body(&self.cursor_at(origins, i)))
            .collect()
    }
}

/// Iterator over the cursors of an [`OuterLoop`].
#[derive(Clone, Debug)]
pub struct Cursors<const K: usize> {
    cursor: [isize; K],
    steps: [isize; K],
    remaining: usize,
}

impl<const K: usize> Iterator for Cursors<K> {
    type Item = [isize; K];

    #[inline]
    fn next(&mut self) -> Option<[isize; K]> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.cursor;
        // The cursor after the last element is never read; let it wrap.
        for (c, &step) in self.cursor.iter_mut().zip(&self.steps) {
            *c = c.wrapping_add(step);
        }
        self.remaining -= 1;
        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<const K: usize> ExactSizeIterator for Cursors<K> {}
