//! Builder for configuring and constructing moving averages.

use std::marker::PhantomData;

use ballast_core::{
    MeterConfig, MovingAverage, MovingAverageSet, Sample, WindowConfig, DEFAULT_MIN_RATIO,
    DEFAULT_SNR_BITS,
};
use tracing::{debug, warn};

use crate::Result;

/// Collects a [`MeterConfig`] and turns it into a [`MovingAverage`] or a
/// [`MovingAverageSet`].
///
/// The sample type and bounds are type parameters, so `MeterBuilder::new()`
/// builds `f64` engines with the default metrics. For `f32`, which cannot
/// meet the default 20 bits of SNR, lower the bits:
///
/// ```
/// use ballast::MeterBuilder;
///
/// let mut avg = MeterBuilder::<f32, 8, 10>::default()
///     .max_window_samples(4_800)
///     .emd_samples(48_000)
///     .build_single()?;
/// avg.add_input(0.5);
/// # Ok::<(), ballast::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MeterBuilder<
    S: Sample = f64,
    const SNR_BITS: usize = DEFAULT_SNR_BITS,
    const MIN_RATIO: usize = DEFAULT_MIN_RATIO,
> {
    config: MeterConfig,
    _sample: PhantomData<S>,
}

impl<S: Sample, const SNR_BITS: usize, const MIN_RATIO: usize> Default
    for MeterBuilder<S, SNR_BITS, MIN_RATIO>
{
    fn default() -> Self {
        Self {
            config: MeterConfig::default(),
            _sample: PhantomData,
        }
    }
}

impl MeterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: MeterConfig) -> Self {
        Self::default().config(config)
    }
}

impl<S: Sample, const SNR_BITS: usize, const MIN_RATIO: usize> MeterBuilder<S, SNR_BITS, MIN_RATIO> {
    /// Replaces everything set so far.
    pub fn config(mut self, config: MeterConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: 48000
    pub fn max_window_samples(mut self, samples: usize) -> Self {
        self.config.max_window_samples = samples;
        self
    }

    /// Default: 480000
    pub fn emd_samples(mut self, samples: usize) -> Self {
        self.config.emd_samples = samples;
        self
    }

    /// Default: 1. Only used by [`build_set`](Self::build_set).
    pub fn max_windows(mut self, windows: usize) -> Self {
        self.config.max_windows = windows;
        self
    }

    /// Default: 0.0
    pub fn initial_average(mut self, average: f64) -> Self {
        self.config.initial_average = average;
        self
    }

    /// Appends an explicit window.
    pub fn window(mut self, samples: usize, scale: f64) -> Self {
        self.config.windows.push(WindowConfig::new(samples, scale));
        self
    }

    pub fn windows(mut self, windows: impl IntoIterator<Item = WindowConfig>) -> Self {
        self.config.windows.extend(windows);
        self
    }

    pub fn as_config(&self) -> &MeterConfig {
        &self.config
    }

    fn reject(result: ballast_core::Result<()>) -> Result<()> {
        if let Err(e) = result {
            warn!("Rejected meter config for {}: {}", S::TYPE_NAME, e);
            return Err(e.into());
        }
        Ok(())
    }

    /// Single window engine. The first configured window, if any, sets the
    /// window size (its scale is not used); otherwise the window spans
    /// `max_window_samples`. `max_windows` and further windows are ignored.
    pub fn build_single(self) -> Result<MovingAverage<S, SNR_BITS, MIN_RATIO>> {
        Self::reject(self.config.validate_single::<S, SNR_BITS, MIN_RATIO>())?;
        let config = self.config;

        let mut avg = MovingAverage::new(config.max_window_samples, config.emd_samples)?;
        if let Some(window) = config.windows.first() {
            avg.set_window_size(window.samples)?;
        }
        avg.set_average(S::from_f64(config.initial_average));

        debug!(
            "Built moving average: window {} of {} samples",
            avg.window_size(),
            avg.max_window_samples()
        );
        Ok(avg)
    }

    /// Multi-window engine. Configured windows are applied in order and
    /// exactly that many are activated; without explicit windows all
    /// `max_windows` evenly spread defaults stay active.
    pub fn build_set(self) -> Result<MovingAverageSet<S, SNR_BITS, MIN_RATIO>> {
        Self::reject(self.config.validate::<S, SNR_BITS, MIN_RATIO>())?;
        let config = self.config;

        let mut set = MovingAverageSet::new(
            config.max_window_samples,
            config.emd_samples,
            config.max_windows,
            S::from_f64(config.initial_average),
        )?;
        for (i, window) in config.windows.iter().enumerate() {
            set.set_window_size_and_scale(i, window.samples, S::from_f64(window.scale))?;
        }
        if !config.windows.is_empty() {
            set.set_used_windows(config.windows.len())?;
        }

        debug!(
            "Built moving average set: {} of {} windows active",
            set.used_windows(),
            set.max_windows()
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_builder() {
        let builder = MeterBuilder::new();
        assert_eq!(builder.as_config(), &MeterConfig::default());

        let avg = builder.build_single().unwrap();
        assert_eq!(avg.window_size(), 48_000);
        assert_eq!(avg.max_window_samples(), 48_000);
        assert_eq!(avg.emd_samples(), 480_000);
    }

    #[test]
    fn test_build_single_uses_first_window() {
        let mut avg = MeterBuilder::new()
            .max_window_samples(1024)
            .emd_samples(10240)
            .initial_average(0.5)
            .window(256, 4.0)
            .window(512, 1.0)
            .build_single()
            .unwrap();
        assert_eq!(avg.window_size(), 256);
        assert_eq!(avg.average(), 0.5);
        assert_abs_diff_eq!(avg.add_input(0.5), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_build_single_ignores_set_only_settings() {
        let avg = MeterBuilder::new()
            .max_window_samples(1024)
            .emd_samples(10240)
            .max_windows(33)
            .windows((1..=40).map(|i| WindowConfig::new(i * 20, 1.0)))
            .build_single()
            .unwrap();
        assert_eq!(avg.window_size(), 20);

        let result = MeterBuilder::new()
            .max_window_samples(1024)
            .emd_samples(10240)
            .window(2048, 1.0)
            .build_single();
        assert!(matches!(
            result,
            Err(Error::Core(ballast_core::Error::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_build_set_activates_configured_windows() {
        let set = MeterBuilder::new()
            .max_window_samples(1024)
            .emd_samples(10240)
            .max_windows(4)
            .window(64, 1.0)
            .window(256, 2.0)
            .build_set()
            .unwrap();
        assert_eq!(set.max_windows(), 4);
        assert_eq!(set.used_windows(), 2);
        assert_eq!(set.window_size(1), Ok(256));
        assert_eq!(set.window_scale(1), Ok(2.0));
        assert_eq!(set.history().max_window_samples(), 256);
    }

    #[test]
    fn test_build_set_without_windows_keeps_defaults() {
        let set = MeterBuilder::new()
            .max_window_samples(1000)
            .emd_samples(10000)
            .max_windows(4)
            .build_set()
            .unwrap();
        assert_eq!(set.used_windows(), 4);
        assert_eq!(set.window_size(0), Ok(250));
        assert_eq!(set.window_size(3), Ok(1000));
    }

    #[test]
    fn test_rejected_config() {
        let result = MeterBuilder::new().emd_samples(1000).build_single();
        assert!(matches!(
            result,
            Err(Error::Core(ballast_core::Error::InvalidConfig(_)))
        ));

        let result = MeterBuilder::new().max_windows(33).build_set();
        assert!(matches!(
            result,
            Err(Error::Core(ballast_core::Error::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_f32_builder() {
        let result = MeterBuilder::<f32>::default().build_single();
        assert!(result.is_err());

        let avg = MeterBuilder::<f32, 8, 10>::default()
            .max_window_samples(4800)
            .emd_samples(48_000)
            .build_single()
            .unwrap();
        assert_eq!(avg.window_size(), 4800);
    }
}
