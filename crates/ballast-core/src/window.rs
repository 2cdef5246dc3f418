//! Windows reading from a shared [`DecayingHistory`].
//!
//! A window keeps a running average that every input pushes forward:
//!
//! ```text
//! average = emd_factor * average + input_factor * input - history_factor * oldest
//! ```
//!
//! where `oldest` is the sample that just left the window. Because the
//! average and every historic contribution decay with the same `emd_factor`,
//! a rounding error made at one sample shrinks geometrically afterwards
//! instead of piling up like it does in a plain running sum.
//!
//! The factors are chosen so a sample's net weight is zero once it has left
//! the window, and so a constant input produces exactly that constant:
//!
//! ```text
//! decay          = exp(-window_samples / emd_samples)
//! input_factor   = (1 - emd_factor) / (1 - decay)
//! history_factor = input_factor * decay
//! ```

use num_traits::Float;
use tracing::debug;

use crate::history::HistoryId;
use crate::{DecayingHistory, Error, Result, Sample, SampleStore};

/// Scales with a smaller magnitude are treated as zero.
pub const MIN_SCALE: f64 = 1e-12;
/// Scales are clamped to `-MAX_SCALE..=MAX_SCALE`.
pub const MAX_SCALE: f64 = 1e12;

/// Running average over the last `window_samples` samples of a history.
///
/// A window does not own its history: it registers against one with
/// [`bind`](Window::bind) and every operation that needs the history takes it
/// by reference.
#[derive(Debug, Clone)]
pub struct Window<S> {
    owner: Option<HistoryId>,
    window_samples: usize,
    input_factor: S,
    history_factor: S,
    read_ptr: usize,
    average: S,
}

impl<S: Sample> Default for Window<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sample> Window<S> {
    /// Unbound window of one sample.
    pub fn new() -> Self {
        Self {
            owner: None,
            window_samples: 1,
            input_factor: S::one(),
            history_factor: S::one(),
            read_ptr: 0,
            average: S::zero(),
        }
    }

    /// Registers this window with `history`. A window binds exactly once.
    pub fn bind<B: SampleStore<S>>(&mut self, history: &DecayingHistory<S, B>) -> Result<()> {
        if self.owner.is_some() {
            return Err(Error::AlreadyBound);
        }
        self.owner = Some(history.id());
        Ok(())
    }

    pub fn is_owned_by<B: SampleStore<S>>(&self, history: &DecayingHistory<S, B>) -> bool {
        self.owner == Some(history.id())
    }

    pub fn owner(&self) -> Option<HistoryId> {
        self.owner
    }

    fn check_owner<B: SampleStore<S>>(&self, history: &DecayingHistory<S, B>) -> Result<()> {
        match self.owner {
            None => Err(Error::NotBound),
            Some(id) if id != history.id() => Err(Error::ForeignHistory),
            Some(_) => Ok(()),
        }
    }

    #[inline]
    pub fn average(&self) -> S {
        self.average
    }

    pub fn set_average(&mut self, average: S) {
        self.average = average;
    }

    #[inline]
    pub fn window_samples(&self) -> usize {
        self.window_samples
    }

    #[inline]
    pub fn read_ptr(&self) -> usize {
        self.read_ptr
    }

    #[inline]
    pub fn input_factor(&self) -> S {
        self.input_factor
    }

    #[inline]
    pub fn history_factor(&self) -> S {
        self.history_factor
    }

    /// Changes the window length without touching the average; the average
    /// just starts moving at the new window's pace.
    pub fn set_window_samples<B: SampleStore<S>>(
        &mut self,
        history: &DecayingHistory<S, B>,
        window_samples: usize,
    ) -> Result<()> {
        self.check_owner(history)?;
        let max = history.max_window_samples();
        if window_samples < 1 || window_samples > max {
            return Err(Error::out_of_range("window samples", window_samples, 1, max));
        }

        let decay: f64 = Float::exp(-(window_samples as f64) / history.emd_samples() as f64);
        let input_factor = (1.0 - history.emd_factor().as_f64()) / (1.0 - decay);
        self.window_samples = window_samples;
        self.input_factor = S::from_f64(input_factor);
        self.history_factor = S::from_f64(input_factor * decay);
        self.read_ptr = history.get_relative(window_samples);
        Ok(())
    }

    /// Re-derives the read position after the history's live length changed.
    pub fn set_read_ptr<B: SampleStore<S>>(&mut self, history: &DecayingHistory<S, B>) -> Result<()> {
        self.check_owner(history)?;
        let max = history.max_window_samples();
        if self.window_samples > max {
            return Err(Error::out_of_range("window samples", self.window_samples, 1, max));
        }
        self.read_ptr = history.get_relative(self.window_samples);
        Ok(())
    }

    /// Pushes one input through the average. The caller writes `input` to the
    /// history afterwards, once for all windows sharing it.
    #[inline]
    pub fn add_input<B: SampleStore<S>>(&mut self, history: &DecayingHistory<S, B>, input: S) {
        debug_assert!(self.is_owned_by(history));
        let oldest = history.get_history_value(&mut self.read_ptr);
        self.average = history.emd_factor() * self.average + self.input_factor * input
            - self.history_factor * oldest;
    }
}

/// A [`Window`] whose reported average is multiplied by a scale, so windows of
/// different kinds (peak, RMS, ...) can be compared in the same units.
#[derive(Debug, Clone)]
pub struct ScaledWindow<S> {
    window: Window<S>,
    scale: S,
}

impl<S: Sample> Default for ScaledWindow<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sample> ScaledWindow<S> {
    pub fn new() -> Self {
        Self {
            window: Window::new(),
            scale: S::one(),
        }
    }

    pub fn window(&self) -> &Window<S> {
        &self.window
    }

    pub fn bind<B: SampleStore<S>>(&mut self, history: &DecayingHistory<S, B>) -> Result<()> {
        self.window.bind(history)
    }

    pub fn is_owned_by<B: SampleStore<S>>(&self, history: &DecayingHistory<S, B>) -> bool {
        self.window.is_owned_by(history)
    }

    #[inline]
    pub fn scale(&self) -> S {
        self.scale
    }

    /// Sets the output scale and returns the value actually applied:
    /// magnitudes below [`MIN_SCALE`] become zero, values beyond
    /// [`MAX_SCALE`] are clamped.
    pub fn set_scale(&mut self, scale: S) -> S {
        let min = S::from_f64(MIN_SCALE);
        let max = S::from_f64(MAX_SCALE);
        self.scale = if scale.abs() < min {
            S::zero()
        } else if scale > max {
            max
        } else if scale < -max {
            -max
        } else {
            scale
        };
        self.scale
    }

    /// Window length and scale together; nothing changes if the length is
    /// rejected.
    pub fn set_window_samples_and_scale<B: SampleStore<S>>(
        &mut self,
        history: &DecayingHistory<S, B>,
        window_samples: usize,
        scale: S,
    ) -> Result<()> {
        self.window.set_window_samples(history, window_samples)?;
        self.set_scale(scale);
        debug!(
            "Scaled window: {} samples, scale {}",
            window_samples, self.scale
        );
        Ok(())
    }

    pub fn set_read_ptr<B: SampleStore<S>>(&mut self, history: &DecayingHistory<S, B>) -> Result<()> {
        self.window.set_read_ptr(history)
    }

    #[inline]
    pub fn window_samples(&self) -> usize {
        self.window.window_samples()
    }

    #[inline]
    pub fn read_ptr(&self) -> usize {
        self.window.read_ptr()
    }

    /// Scaled average.
    #[inline]
    pub fn average(&self) -> S {
        self.scale * self.window.average()
    }

    /// Average before scaling.
    #[inline]
    pub fn raw_average(&self) -> S {
        self.window.average()
    }

    pub fn set_raw_average(&mut self, average: S) {
        self.window.set_average(average);
    }

    /// Sets the internal average so that [`average`](Self::average) reports
    /// `output`. With a zero scale the raw average is set to `output`.
    pub fn set_output(&mut self, output: S) {
        let raw = if self.scale != S::zero() {
            output / self.scale
        } else {
            output
        };
        self.window.set_average(raw);
    }

    #[inline]
    pub fn add_input<B: SampleStore<S>>(&mut self, history: &DecayingHistory<S, B>, input: S) {
        self.window.add_input(history, input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn history() -> DecayingHistory<f64> {
        DecayingHistory::new(1024, 10240).unwrap()
    }

    #[test]
    fn test_unbound_window_rejects_configuration() {
        let h = history();
        let mut w = Window::<f64>::new();
        assert_eq!(w.set_window_samples(&h, 16), Err(Error::NotBound));
        assert_eq!(w.set_read_ptr(&h), Err(Error::NotBound));
        assert_eq!(w.owner(), None);
    }

    #[test]
    fn test_bind_once() {
        let h1 = history();
        let h2 = history();
        let mut w = Window::<f64>::new();
        w.bind(&h1).unwrap();
        assert!(w.is_owned_by(&h1));
        assert!(!w.is_owned_by(&h2));
        assert_eq!(w.bind(&h2), Err(Error::AlreadyBound));
        assert_eq!(w.bind(&h1), Err(Error::AlreadyBound));
        assert!(w.is_owned_by(&h1));
    }

    #[test]
    fn test_foreign_history_rejected() {
        let h1 = history();
        let h2 = history();
        let mut w = Window::<f64>::new();
        w.bind(&h1).unwrap();
        assert_eq!(w.set_window_samples(&h2, 16), Err(Error::ForeignHistory));
    }

    #[test]
    fn test_factors() {
        let h = history();
        let mut w = Window::<f64>::new();
        w.bind(&h).unwrap();
        w.set_window_samples(&h, 256).unwrap();

        let emd_factor: f64 = Float::exp(-1.0 / 10240.0);
        let decay: f64 = Float::exp(-256.0 / 10240.0);
        let input_factor = (1.0 - emd_factor) / (1.0 - decay);
        assert_relative_eq!(w.input_factor(), input_factor, max_relative = 1e-12);
        assert_relative_eq!(w.history_factor(), input_factor * decay, max_relative = 1e-12);
        assert_eq!(w.read_ptr(), h.get_relative(256));
    }

    #[test]
    fn test_window_size_bounds() {
        let h = history();
        let mut w = Window::<f64>::new();
        w.bind(&h).unwrap();
        w.set_window_samples(&h, 100).unwrap();
        let before = w.clone();

        assert!(matches!(
            w.set_window_samples(&h, 0),
            Err(Error::OutOfRange { value: 0, .. })
        ));
        assert!(matches!(
            w.set_window_samples(&h, 1025),
            Err(Error::OutOfRange { value: 1025, max: 1024, .. })
        ));
        assert_eq!(w.window_samples(), before.window_samples());
        assert_eq!(w.read_ptr(), before.read_ptr());
        assert_eq!(w.input_factor(), before.input_factor());
    }

    #[test]
    fn test_resize_keeps_average() {
        let h = history();
        let mut w = Window::<f64>::new();
        w.bind(&h).unwrap();
        w.set_window_samples(&h, 100).unwrap();
        w.set_average(0.7);
        w.set_window_samples(&h, 300).unwrap();
        assert_eq!(w.average(), 0.7);
    }

    #[test]
    fn test_constant_input_is_steady_state() {
        let mut h = history();
        h.fill_with_average(0.5);
        let mut w = Window::<f64>::new();
        w.bind(&h).unwrap();
        w.set_window_samples(&h, 128).unwrap();
        w.set_average(0.5);
        for _ in 0..10_000 {
            w.add_input(&h, 0.5);
            h.write(0.5);
        }
        assert_abs_diff_eq!(w.average(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_step_response_reaches_input_after_one_window() {
        let mut h = history();
        let mut w = Window::<f64>::new();
        w.bind(&h).unwrap();
        w.set_window_samples(&h, 64).unwrap();
        for i in 0..64 {
            w.add_input(&h, 1.0);
            h.write(1.0);
            if i < 63 {
                assert!(w.average() < 1.0);
            }
        }
        assert_abs_diff_eq!(w.average(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_clamping() {
        let mut w = ScaledWindow::<f64>::new();
        assert_eq!(w.scale(), 1.0);
        assert_eq!(w.set_scale(1e-13), 0.0);
        assert_eq!(w.set_scale(-1e-13), 0.0);
        assert_eq!(w.set_scale(1e13), MAX_SCALE);
        assert_eq!(w.set_scale(-1e13), -MAX_SCALE);
        assert_eq!(w.set_scale(-2.0), -2.0);
        assert_eq!(w.scale(), -2.0);
    }

    #[test]
    fn test_scaled_average_and_output() {
        let mut w = ScaledWindow::<f64>::new();
        w.set_scale(4.0);
        w.set_output(2.0);
        assert_eq!(w.average(), 2.0);
        assert_eq!(w.raw_average(), 0.5);

        w.set_scale(0.0);
        w.set_output(3.0);
        assert_eq!(w.raw_average(), 3.0);
        assert_eq!(w.average(), 0.0);
    }

    #[test]
    fn test_window_and_scale_rejected_together() {
        let h = history();
        let mut w = ScaledWindow::<f64>::new();
        w.bind(&h).unwrap();
        w.set_window_samples_and_scale(&h, 64, 2.0).unwrap();
        assert!(w.set_window_samples_and_scale(&h, 2048, 8.0).is_err());
        assert_eq!(w.window_samples(), 64);
        assert_eq!(w.scale(), 2.0);
    }

    #[test]
    fn test_scaled_window_matches_plain_window() {
        let h = history();
        let mut plain = Window::<f64>::new();
        let mut scaled = ScaledWindow::<f64>::new();
        plain.bind(&h).unwrap();
        scaled.bind(&h).unwrap();
        plain.set_window_samples(&h, 100).unwrap();
        scaled.set_window_samples_and_scale(&h, 100, 3.0).unwrap();

        let inner = scaled.window();
        assert!(inner.is_owned_by(&h));
        assert_eq!(inner.input_factor(), plain.input_factor());
        assert_eq!(inner.history_factor(), plain.history_factor());
        assert_eq!(inner.read_ptr(), plain.read_ptr());

        for x in [0.5, 1.0, -0.25, 2.0] {
            plain.add_input(&h, x);
            scaled.add_input(&h, x);
        }
        assert_eq!(scaled.window().average(), plain.average());
        assert_eq!(scaled.average(), 3.0 * plain.average());
    }
}
