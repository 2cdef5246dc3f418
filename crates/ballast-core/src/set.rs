//! Several scaled windows sharing one history.
//!
//! Typical use is multi-timescale metering: feed squared samples once and
//! read RMS-style averages over, say, 50 ms, 400 ms and 3 s from the same
//! ring. Each window reads the ring on its own, so the order in which they
//! are updated does not matter; the history is written once per input.

use tracing::debug;

use crate::compat::{Box, Vec};
use crate::metrics::{DEFAULT_MIN_RATIO, DEFAULT_SNR_BITS};
use crate::{DecayingHistory, Error, Result, Sample, ScaledWindow};

pub const MIN_WINDOWS: usize = 1;
pub const MAX_WINDOWS: usize = 32;

/// Up to [`MAX_WINDOWS`] scaled moving averages over one shared history.
///
/// All windows are configured at construction; [`set_used_windows`]
/// activates a prefix of them. The live history length follows the largest
/// active window.
///
/// [`set_used_windows`]: MovingAverageSet::set_used_windows
///
/// # Example
///
/// ```
/// use ballast_core::MovingAverageSet;
///
/// let mut set = MovingAverageSet::<f64>::new(4096, 40960, 3, 0.0)?;
/// set.set_window_size_and_scale(0, 64, 1.0)?;
/// set.set_window_size_and_scale(1, 512, 1.0)?;
/// set.set_window_size_and_scale(2, 4096, 1.0)?;
///
/// let peak = set.add_input_get_max(0.5, 0.0);
/// assert!(peak > 0.0);
/// assert!(set.average(0)? >= set.average(2)?);
/// # Ok::<(), ballast_core::Error>(())
/// ```
#[derive(Debug)]
pub struct MovingAverageSet<
    S: Sample = f64,
    const SNR_BITS: usize = DEFAULT_SNR_BITS,
    const MIN_RATIO: usize = DEFAULT_MIN_RATIO,
> {
    entries: Box<[ScaledWindow<S>]>,
    used_windows: usize,
    history: DecayingHistory<S>,
}

impl<S: Sample, const SNR_BITS: usize, const MIN_RATIO: usize>
    MovingAverageSet<S, SNR_BITS, MIN_RATIO>
{
    /// Window `i` starts at `(i + 1) * max_window_samples / max_windows`
    /// samples with scale 1; every window and the history start at
    /// `initial_average`, and all windows are active.
    pub fn new(
        max_window_samples: usize,
        emd_samples: usize,
        max_windows: usize,
        initial_average: S,
    ) -> Result<Self> {
        if !(MIN_WINDOWS..=MAX_WINDOWS).contains(&max_windows) {
            return Err(Error::InvalidArgument(format!(
                "the (maximum) number of windows {} must lie between {} and {}",
                max_windows, MIN_WINDOWS, MAX_WINDOWS
            )));
        }

        let mut history =
            DecayingHistory::with_metrics::<SNR_BITS, MIN_RATIO>(max_window_samples, emd_samples)?;
        history.fill_with_average(initial_average);

        let mut entries = Vec::with_capacity(max_windows);
        for i in 0..max_windows {
            let window_samples = ((i + 1) * max_window_samples / max_windows).max(1);
            let mut entry = ScaledWindow::new();
            entry.bind(&history)?;
            entry.set_raw_average(initial_average);
            entry.set_window_samples_and_scale(&history, window_samples, S::one())?;
            entries.push(entry);
        }

        debug!(
            "Created moving average set: {} windows over {} samples, emd {}",
            max_windows, max_window_samples, emd_samples
        );

        Ok(Self {
            entries: entries.into_boxed_slice(),
            used_windows: max_windows,
            history,
        })
    }

    pub fn max_windows(&self) -> usize {
        self.entries.len()
    }

    pub fn used_windows(&self) -> usize {
        self.used_windows
    }

    /// Largest window size accepted, fixed at construction.
    pub fn max_window_samples(&self) -> usize {
        self.history.capacity()
    }

    pub fn emd_samples(&self) -> usize {
        self.history.emd_samples()
    }

    pub fn history(&self) -> &DecayingHistory<S> {
        &self.history
    }

    fn check_window_index(&self, index: usize) -> Result<usize> {
        if index < self.used_windows {
            return Ok(index);
        }
        Err(Error::out_of_range(
            "window index",
            index,
            0,
            self.used_windows - 1,
        ))
    }

    fn refresh_read_ptrs(&mut self) -> Result<()> {
        for entry in self.entries[..self.used_windows].iter_mut() {
            entry.set_read_ptr(&self.history)?;
        }
        Ok(())
    }

    /// Fits the live history to the largest active window. Read positions of
    /// active windows are recomputed when the length changed or `force` is set.
    fn optimise_for_maximum_samples(&mut self, force: bool) -> Result<()> {
        let maximum = self.entries[..self.used_windows]
            .iter()
            .map(ScaledWindow::window_samples)
            .max()
            .unwrap_or(1);
        let changed = self.history.optimise_for_maximum_window_samples(maximum);
        if changed || force {
            self.refresh_read_ptrs()?;
        }
        Ok(())
    }

    /// Activates the first `windows` entries (`1..=max_windows()`).
    pub fn set_used_windows(&mut self, windows: usize) -> Result<()> {
        if windows < MIN_WINDOWS || windows > self.max_windows() {
            return Err(Error::out_of_range(
                "used windows",
                windows,
                MIN_WINDOWS,
                self.max_windows(),
            ));
        }

        debug!("Moving average set: {} of {} windows in use", windows, self.max_windows());
        self.used_windows = windows;
        // Entries that were inactive kept stale read positions.
        self.optimise_for_maximum_samples(true)
    }

    /// Reconfigures active window `index`. Rejected without any change when
    /// the index is not active or `window_samples` is outside
    /// `1..=max_window_samples()`.
    pub fn set_window_size_and_scale(
        &mut self,
        index: usize,
        window_samples: usize,
        scale: S,
    ) -> Result<()> {
        let capacity = self.history.capacity();
        if window_samples < 1 || window_samples > capacity {
            return Err(Error::out_of_range(
                "window samples",
                window_samples,
                1,
                capacity,
            ));
        }
        let index = self.check_window_index(index)?;

        if window_samples > self.history.max_window_samples() {
            self.history.optimise_for_maximum_window_samples(window_samples);
            self.refresh_read_ptrs()?;
        }
        self.entries[index].set_window_samples_and_scale(&self.history, window_samples, scale)?;
        self.optimise_for_maximum_samples(false)
    }

    /// Seeds every window (active or not) and the whole history.
    pub fn set_averages(&mut self, average: S) {
        for entry in self.entries.iter_mut() {
            entry.set_raw_average(average);
        }
        self.history.fill_with_average(average);
    }

    /// Scaled average of active window `index`.
    pub fn average(&self, index: usize) -> Result<S> {
        Ok(self.entries[self.check_window_index(index)?].average())
    }

    pub fn window_size(&self, index: usize) -> Result<usize> {
        Ok(self.entries[self.check_window_index(index)?].window_samples())
    }

    pub fn window_scale(&self, index: usize) -> Result<S> {
        Ok(self.entries[self.check_window_index(index)?].scale())
    }

    pub fn read_ptr(&self, index: usize) -> Result<usize> {
        Ok(self.entries[self.check_window_index(index)?].read_ptr())
    }

    pub fn write_ptr(&self) -> usize {
        self.history.write_ptr()
    }

    /// Oldest sample in the shared history.
    pub fn current(&self) -> S {
        self.history.current()
    }

    /// Scaled averages of the active windows, in index order.
    pub fn averages(&self) -> impl Iterator<Item = S> + '_ {
        self.entries[..self.used_windows]
            .iter()
            .map(ScaledWindow::average)
    }

    #[inline]
    pub fn add_input(&mut self, input: S) {
        for entry in self.entries[..self.used_windows].iter_mut() {
            entry.add_input(&self.history, input);
        }
        self.history.write(input);
    }

    /// Like [`add_input`](Self::add_input), returning the largest scaled
    /// average among the active windows, but never less than `minimum`.
    #[inline]
    pub fn add_input_get_max(&mut self, input: S, minimum: S) -> S {
        let mut maximum = minimum;
        for entry in self.entries[..self.used_windows].iter_mut() {
            entry.add_input(&self.history, input);
            maximum = maximum.max(entry.average());
        }
        self.history.write(input);
        maximum
    }
}
