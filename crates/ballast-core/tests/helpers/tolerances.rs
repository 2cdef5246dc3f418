//! Tolerance constants for numerical tests.

/// Deviation allowed between an `f64` average and its recomputed reference.
pub const F64_EPSILON: f64 = 1e-9;

/// Deviation allowed for `f32` averages, which carry about 7 digits.
pub const F32_EPSILON: f64 = 1e-3;

/// Step response tolerance after one full window.
pub const STEP_EPSILON: f64 = 1e-6;
