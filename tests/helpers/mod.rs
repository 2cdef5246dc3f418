//! Test helpers and fixtures for ballast integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-9): Steady state and step responses in `f64`
//! - `METER_EPSILON` (1e-3): RMS readings against analytic values
//! - `SILENCE_THRESHOLD` (1e-6): Decayed readings after silence

#![allow(dead_code)]

pub mod tolerances;

use ballast::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// Samples in `ms` milliseconds at the test sample rate.
pub fn ms(ms: f64) -> usize {
    (TEST_SAMPLE_RATE * ms / 1000.0) as usize
}

/// A three-window RMS meter: 50 ms, 400 ms and 3 s.
pub fn test_meter() -> MovingAverageSet<f64> {
    MeterBuilder::new()
        .max_window_samples(ms(3000.0))
        .emd_samples(10 * ms(3000.0))
        .max_windows(3)
        .window(ms(50.0), 1.0)
        .window(ms(400.0), 1.0)
        .window(ms(3000.0), 1.0)
        .build_set()
        .expect("Failed to create test meter")
}

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f64, amplitude: f64, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / TEST_SAMPLE_RATE;
            amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence (zero samples).
pub fn generate_silence(num_samples: usize) -> Vec<f64> {
    vec![0.0; num_samples]
}

/// Generate white noise (reproducible random samples in -1..1).
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_samples).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0_f64, |a, b| a.max(b))
}

/// Feed squared samples through a meter; returns the RMS of each window.
pub fn meter_rms(meter: &mut MovingAverageSet<f64>, samples: &[f64]) -> Vec<f64> {
    for &s in samples {
        meter.add_input(s * s);
    }
    meter.averages().map(|p| p.max(0.0).sqrt()).collect()
}
