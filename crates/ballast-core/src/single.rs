//! One window over one history.

use tracing::debug;

use crate::metrics::{DEFAULT_MIN_RATIO, DEFAULT_SNR_BITS};
use crate::{DecayingHistory, Error, Result, Sample, Window};

/// Moving average with a runtime-adjustable window.
///
/// The history is allocated for `max_window_samples` and shrunk to the
/// current window length, so a short window does not drag a long ring
/// through the cache.
///
/// # Example
///
/// ```
/// use ballast_core::MovingAverage;
///
/// let mut avg = MovingAverage::<f64>::new(48_000, 480_000)?;
/// avg.set_window_size(4_800)?;
/// let level = avg.add_input(0.25);
/// assert!(level > 0.0);
/// # Ok::<(), ballast_core::Error>(())
/// ```
#[derive(Debug)]
pub struct MovingAverage<
    S: Sample = f64,
    const SNR_BITS: usize = DEFAULT_SNR_BITS,
    const MIN_RATIO: usize = DEFAULT_MIN_RATIO,
> {
    history: DecayingHistory<S>,
    window: Window<S>,
}

impl<S: Sample, const SNR_BITS: usize, const MIN_RATIO: usize> MovingAverage<S, SNR_BITS, MIN_RATIO> {
    /// Fails with [`Error::InvalidArgument`] when `max_window_samples` or
    /// `emd_samples` lies outside [`Metrics`](crate::Metrics) bounds. The window starts at
    /// `max_window_samples` with an average of zero.
    pub fn new(max_window_samples: usize, emd_samples: usize) -> Result<Self> {
        let history =
            DecayingHistory::with_metrics::<SNR_BITS, MIN_RATIO>(max_window_samples, emd_samples)?;
        let mut window = Window::new();
        window.bind(&history)?;
        window.set_window_samples(&history, max_window_samples)?;

        Ok(Self { history, window })
    }

    /// Seeds the window and the whole history with a known average.
    pub fn set_average(&mut self, average: S) {
        self.window.set_average(average);
        self.history.fill_with_average(average);
    }

    /// Accepts `1..=max_window_samples()`; anything else is rejected with
    /// [`Error::OutOfRange`] and leaves the average untouched.
    pub fn set_window_size(&mut self, window_samples: usize) -> Result<()> {
        let capacity = self.history.capacity();
        if window_samples < 1 || window_samples > capacity {
            return Err(Error::out_of_range(
                "window samples",
                window_samples,
                1,
                capacity,
            ));
        }

        if self.history.optimise_for_maximum_window_samples(window_samples) {
            debug!(
                "Moving average history resized to {} samples",
                self.history.max_window_samples()
            );
        }
        self.window.set_window_samples(&self.history, window_samples)
    }

    /// Adds one sample and returns the new average.
    #[inline]
    pub fn add_input(&mut self, input: S) -> S {
        self.window.add_input(&self.history, input);
        self.history.write(input);
        self.window.average()
    }

    /// Feeds a block of samples; returns the average after the last one.
    pub fn add_inputs(&mut self, inputs: &[S]) -> S {
        for &input in inputs {
            self.window.add_input(&self.history, input);
            self.history.write(input);
        }
        self.window.average()
    }

    #[inline]
    pub fn average(&self) -> S {
        self.window.average()
    }

    pub fn window_size(&self) -> usize {
        self.window.window_samples()
    }

    /// Largest window this average was built for.
    pub fn max_window_samples(&self) -> usize {
        self.history.capacity()
    }

    pub fn emd_samples(&self) -> usize {
        self.history.emd_samples()
    }

    pub fn read_ptr(&self) -> usize {
        self.window.read_ptr()
    }

    pub fn write_ptr(&self) -> usize {
        self.history.write_ptr()
    }

    /// History sample the next input will subtract.
    pub fn next_history_value(&self) -> S {
        self.history.as_slice()[self.window.read_ptr()]
    }

    pub fn history(&self) -> &DecayingHistory<S> {
        &self.history
    }

    pub fn window(&self) -> &Window<S> {
        &self.window
    }
}
