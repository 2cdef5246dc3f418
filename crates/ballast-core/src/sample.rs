//! Floating-point sample types.

use core::fmt::{Debug, Display};
use num_traits::Float;

/// Floating-point type the averages are computed in.
///
/// Implemented for `f32` and `f64`. Coefficients are derived in `f64` and
/// converted once, so both types see the same decay constants.
pub trait Sample: Float + Debug + Display + Default + Send + Sync + 'static {
    /// Name used in bound violation messages.
    const TYPE_NAME: &'static str;

    fn from_f64(value: f64) -> Self;

    fn as_f64(self) -> f64;
}

impl Sample for f32 {
    const TYPE_NAME: &'static str = "f32";

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    const TYPE_NAME: &'static str = "f64";

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}
