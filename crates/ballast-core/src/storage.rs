//! Backing storage for the decaying history.
//!
//! The history only needs a fixed-length sequence of samples that can be read
//! and written by position. [`SampleStore`] captures exactly that, so the ring
//! can live in a heap slice, a `Vec`, or a fixed array without allocation.

use crate::compat::{Box, Vec};

/// Fixed-length, indexable, in-place modifiable sequence of samples.
///
/// Indices passed to [`read`](SampleStore::read) and
/// [`write`](SampleStore::write) are always below [`len`](SampleStore::len);
/// the history guarantees this.
pub trait SampleStore<S: Copy> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self, index: usize) -> S;

    fn write(&mut self, index: usize, value: S);

    fn as_slice(&self) -> &[S];

    fn as_mut_slice(&mut self) -> &mut [S];
}

impl<S: Copy> SampleStore<S> for Box<[S]> {
    #[inline]
    fn len(&self) -> usize {
        <[S]>::len(self)
    }

    #[inline]
    fn read(&self, index: usize) -> S {
        self[index]
    }

    #[inline]
    fn write(&mut self, index: usize, value: S) {
        self[index] = value;
    }

    fn as_slice(&self) -> &[S] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [S] {
        self
    }
}

impl<S: Copy> SampleStore<S> for Vec<S> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn read(&self, index: usize) -> S {
        self[index]
    }

    #[inline]
    fn write(&mut self, index: usize, value: S) {
        self[index] = value;
    }

    fn as_slice(&self) -> &[S] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [S] {
        self
    }
}

impl<S: Copy, const N: usize> SampleStore<S> for [S; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn read(&self, index: usize) -> S {
        self[index]
    }

    #[inline]
    fn write(&mut self, index: usize, value: S) {
        self[index] = value;
    }

    fn as_slice(&self) -> &[S] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [S] {
        self
    }
}
