//! Shared decaying sample history.
//!
//! A fixed-capacity ring of past input samples together with the
//! error-mitigating decay (EMD) constant every window reading from it uses.
//! The write cursor moves *down* through the ring: a sample written `n`
//! writes ago sits at `write_ptr + n` (modulo the live length), which is where
//! a window of `n` samples reads from.

use core::fmt;
use core::ops::{Index, IndexMut};

use num_traits::Float;
use tracing::debug;

use crate::compat::{AtomicUsize, Box, Ordering};
use crate::metrics::{DEFAULT_MIN_RATIO, DEFAULT_SNR_BITS};
use crate::{Error, Metrics, Result, Sample, SampleStore};

/// The live ring never gets shorter than this.
pub const MIN_HISTORY_SAMPLES: usize = 4;

/// Identity of a history instance; windows register against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistoryId(usize);

impl HistoryId {
    fn next() -> Self {
        static NEXT_ID: AtomicUsize = AtomicUsize::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Ring buffer of past samples plus the per-sample decay factor.
///
/// The capacity is fixed at construction. The *live* length
/// ([`max_window_samples`](Self::max_window_samples)) can be reduced to the
/// largest window in use, which keeps the ring compact, and grown back up to
/// the capacity later. Nothing is reallocated.
pub struct DecayingHistory<S: Sample, B: SampleStore<S> = Box<[S]>> {
    id: HistoryId,
    buffer: B,
    emd_samples: usize,
    emd_factor: S,
    history_end: usize,
    write_ptr: usize,
}

impl<S: Sample> DecayingHistory<S> {
    /// Heap-backed history with the default metrics (20 bits SNR, EMD at
    /// least 10 times the capacity).
    pub fn new(capacity: usize, emd_samples: usize) -> Result<Self> {
        Self::with_metrics::<DEFAULT_SNR_BITS, DEFAULT_MIN_RATIO>(capacity, emd_samples)
    }

    /// Heap-backed history validated against `Metrics<S, SNR_BITS, MIN_RATIO>`.
    pub fn with_metrics<const SNR_BITS: usize, const MIN_RATIO: usize>(
        capacity: usize,
        emd_samples: usize,
    ) -> Result<Self> {
        Metrics::<S, SNR_BITS, MIN_RATIO>::valid_combination(capacity, emd_samples)?;
        let buffer = vec![S::zero(); capacity].into_boxed_slice();
        Ok(Self::from_parts(buffer, emd_samples))
    }
}

impl<S: Sample, B: SampleStore<S>> DecayingHistory<S, B> {
    /// History over caller-provided storage; the capacity is `store.len()`.
    ///
    /// The store contents are kept as the initial history.
    pub fn from_store<const SNR_BITS: usize, const MIN_RATIO: usize>(
        store: B,
        emd_samples: usize,
    ) -> Result<Self> {
        Metrics::<S, SNR_BITS, MIN_RATIO>::valid_combination(store.len(), emd_samples)?;
        Ok(Self::from_parts(store, emd_samples))
    }

    fn from_parts(buffer: B, emd_samples: usize) -> Self {
        let emd_factor: f64 = Float::exp(-1.0 / emd_samples as f64);
        let history_end = buffer.len() - 1;
        let id = HistoryId::next();
        debug!(
            "Created decaying history {:?}: {} samples, emd {} (factor {})",
            id,
            buffer.len(),
            emd_samples,
            emd_factor
        );

        Self {
            id,
            buffer,
            emd_samples,
            emd_factor: S::from_f64(emd_factor),
            history_end,
            write_ptr: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> HistoryId {
        self.id
    }

    /// Allocated number of samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn emd_samples(&self) -> usize {
        self.emd_samples
    }

    #[inline]
    pub fn emd_factor(&self) -> S {
        self.emd_factor
    }

    #[inline]
    pub fn write_ptr(&self) -> usize {
        self.write_ptr
    }

    /// Live ring length: the largest window that can currently read from it.
    #[inline]
    pub fn max_window_samples(&self) -> usize {
        self.history_end + 1
    }

    #[inline]
    fn step(&self, ptr: &mut usize) {
        if *ptr > 0 {
            *ptr -= 1;
        } else {
            *ptr = self.history_end;
        }
    }

    /// Ring position of the sample written `delta` writes ago.
    #[inline]
    pub fn get_relative(&self, delta: usize) -> usize {
        (self.write_ptr + delta) % (self.history_end + 1)
    }

    /// Reads at `read_ptr` and moves it one step toward newer samples.
    #[inline]
    pub fn get_history_value(&self, read_ptr: &mut usize) -> S {
        debug_assert!(*read_ptr <= self.history_end);
        let value = self.buffer.read(*read_ptr);
        self.step(read_ptr);
        value
    }

    /// Stores `value` and moves the write cursor.
    #[inline]
    pub fn write(&mut self, value: S) {
        self.buffer.write(self.write_ptr, value);
        let mut ptr = self.write_ptr;
        self.step(&mut ptr);
        self.write_ptr = ptr;
    }

    /// Oldest live sample: the one the next write replaces.
    #[inline]
    pub fn current(&self) -> S {
        self.buffer.read(self.write_ptr)
    }

    pub fn get(&self, index: usize) -> Result<S> {
        self.check_index(index)?;
        Ok(self.buffer.read(index))
    }

    pub fn set(&mut self, index: usize, value: S) -> Result<()> {
        self.check_index(index)?;
        self.buffer.write(index, value);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index > self.history_end {
            return Err(Error::out_of_range("history index", index, 0, self.history_end));
        }
        Ok(())
    }

    /// Sets every slot, including capacity outside the live ring.
    pub fn fill_with_average(&mut self, average: S) {
        self.buffer.as_mut_slice().fill(average);
    }

    /// Live ring contents in storage order.
    pub fn as_slice(&self) -> &[S] {
        &self.buffer.as_slice()[..=self.history_end]
    }

    /// Resizes the live ring to `samples`, clamped to
    /// `MIN_HISTORY_SAMPLES..=capacity`. Returns whether the length changed;
    /// if it did, every window reading from this history must recompute its
    /// read position.
    pub fn optimise_for_maximum_window_samples(&mut self, samples: usize) -> bool {
        let history_end = samples.clamp(MIN_HISTORY_SAMPLES, self.capacity()) - 1;
        if history_end == self.history_end {
            return false;
        }

        debug!(
            "History {:?}: live length {} -> {}",
            self.id,
            self.history_end + 1,
            history_end + 1
        );
        self.history_end = history_end;
        if self.write_ptr > history_end {
            self.write_ptr %= history_end + 1;
        }
        true
    }
}

impl<S: Sample, B: SampleStore<S>> Index<usize> for DecayingHistory<S, B> {
    type Output = S;

    fn index(&self, index: usize) -> &S {
        &self.as_slice()[index]
    }
}

impl<S: Sample, B: SampleStore<S>> IndexMut<usize> for DecayingHistory<S, B> {
    fn index_mut(&mut self, index: usize) -> &mut S {
        let end = self.history_end;
        &mut self.buffer.as_mut_slice()[..=end][index]
    }
}

impl<S: Sample, B: SampleStore<S>> fmt::Debug for DecayingHistory<S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecayingHistory")
            .field("id", &self.id)
            .field("capacity", &self.capacity())
            .field("live", &self.max_window_samples())
            .field("emd_samples", &self.emd_samples)
            .field("emd_factor", &self.emd_factor)
            .field("write_ptr", &self.write_ptr)
            .finish()
    }
}
