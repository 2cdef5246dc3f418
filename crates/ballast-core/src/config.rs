//! Meter configuration.

use serde::{Deserialize, Serialize};

use crate::compat::Vec;
use crate::{Error, Metrics, Result, Sample, MAX_WINDOWS, MIN_WINDOWS};

/// One window of a multi-window meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub samples: usize,
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl WindowConfig {
    pub fn new(samples: usize, scale: f64) -> Self {
        Self { samples, scale }
    }
}

/// Configuration for a moving average or a set of them.
///
/// Fields missing from a serialized config take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Capacity of the shared history; no window may exceed it.
    pub max_window_samples: usize,
    pub emd_samples: usize,
    pub max_windows: usize,
    pub initial_average: f64,
    /// Explicit windows. Empty means the evenly spread defaults.
    pub windows: Vec<WindowConfig>,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            max_window_samples: 48_000,
            emd_samples: 480_000,
            max_windows: 1,
            initial_average: 0.0,
            windows: Vec::new(),
        }
    }
}

impl MeterConfig {
    /// Checks the config for a multi-window set against the bounds for
    /// sample type `S`.
    pub fn validate<S: Sample, const SNR_BITS: usize, const MIN_RATIO: usize>(
        &self,
    ) -> Result<()> {
        self.validate_history::<S, SNR_BITS, MIN_RATIO>()?;

        if !(MIN_WINDOWS..=MAX_WINDOWS).contains(&self.max_windows) {
            return Err(Error::InvalidConfig(format!(
                "max_windows {} out of range ({}-{})",
                self.max_windows, MIN_WINDOWS, MAX_WINDOWS
            )));
        }

        if self.windows.len() > self.max_windows {
            return Err(Error::InvalidConfig(format!(
                "{} windows configured but max_windows is {}",
                self.windows.len(),
                self.max_windows
            )));
        }

        for (i, window) in self.windows.iter().enumerate() {
            self.validate_window(i, window)?;
        }
        Ok(())
    }

    /// Checks the config for a single moving average. Only the first window
    /// is used; `max_windows` and further windows are ignored.
    pub fn validate_single<S: Sample, const SNR_BITS: usize, const MIN_RATIO: usize>(
        &self,
    ) -> Result<()> {
        self.validate_history::<S, SNR_BITS, MIN_RATIO>()?;
        if let Some(window) = self.windows.first() {
            self.validate_window(0, window)?;
        }
        Ok(())
    }

    fn validate_history<S: Sample, const SNR_BITS: usize, const MIN_RATIO: usize>(
        &self,
    ) -> Result<()> {
        Metrics::<S, SNR_BITS, MIN_RATIO>::valid_combination(
            self.max_window_samples,
            self.emd_samples,
        )
        .map_err(|e| match e {
            Error::InvalidArgument(msg) => Error::InvalidConfig(msg),
            other => other,
        })?;

        if !self.initial_average.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "initial_average {} is not finite",
                self.initial_average
            )));
        }
        Ok(())
    }

    fn validate_window(&self, index: usize, window: &WindowConfig) -> Result<()> {
        if window.samples < 1 || window.samples > self.max_window_samples {
            return Err(Error::InvalidConfig(format!(
                "window {} has {} samples, must lie between 1 and {}",
                index, window.samples, self.max_window_samples
            )));
        }
        if !window.scale.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "window {} scale {} is not finite",
                index, window.scale
            )));
        }
        Ok(())
    }
}
