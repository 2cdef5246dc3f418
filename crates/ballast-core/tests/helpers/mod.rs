//! Shared fixtures for ballast-core integration tests
//!
//! The reference average is recomputed from scratch on every call, so it
//! carries no accumulated rounding error and serves as ground truth for the
//! incrementally updated averages.

#![allow(dead_code)]

pub mod tolerances;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Capacity used by most tests.
pub const TEST_MAX_WINDOW: usize = 1024;

/// Error-mitigating decay used by most tests (ratio 10 to the capacity).
pub const TEST_EMD: usize = 10_240;

/// Reproducible white noise in -1..1.
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_samples).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Squared sine, the kind of signal an RMS meter feeds its averages.
pub fn generate_power_sine(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|i| {
            let s = (2.0 * std::f64::consts::PI * frequency * i as f64 / sample_rate).sin();
            s * s
        })
        .collect()
}

/// Exact decayed window average of `signal[..=end]`, assuming zeros before
/// the start of the signal.
pub fn reference_average(signal: &[f64], end: usize, window: usize, emd: usize) -> f64 {
    let emd_factor = (-1.0 / emd as f64).exp();
    let decay = (-(window as f64) / emd as f64).exp();
    let input_factor = (1.0 - emd_factor) / (1.0 - decay);

    let mut sum = 0.0;
    let mut weight = 1.0;
    for k in 0..window.min(end + 1) {
        sum += weight * signal[end - k];
        weight *= emd_factor;
    }
    input_factor * sum
}

/// Exact decayed window average of samples given newest first.
pub fn reference_from_newest(
    newest_first: impl Iterator<Item = f64>,
    window: usize,
    emd: usize,
) -> f64 {
    let emd_factor = (-1.0 / emd as f64).exp();
    let decay = (-(window as f64) / emd as f64).exp();
    let input_factor = (1.0 - emd_factor) / (1.0 - decay);

    let mut sum = 0.0;
    let mut weight = 1.0;
    for x in newest_first.take(window) {
        sum += weight * x;
        weight *= emd_factor;
    }
    input_factor * sum
}

/// Plain mean of the last `window` samples up to `end`.
pub fn plain_average(signal: &[f64], end: usize, window: usize) -> f64 {
    let start = (end + 1).saturating_sub(window);
    signal[start..=end].iter().sum::<f64>() / window as f64
}
