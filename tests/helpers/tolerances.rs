//! Tolerance constants for metering tests.

/// Steady state and step responses in `f64`.
pub const FLOAT_EPSILON: f64 = 1e-9;

/// RMS readings against analytic values. The decayed window weights recent
/// samples slightly more than a plain mean.
pub const METER_EPSILON: f64 = 1e-3;

/// Readings after a full window of silence.
pub const SILENCE_THRESHOLD: f64 = 1e-6;
