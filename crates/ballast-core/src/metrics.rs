//! Valid window and error-mitigating decay sizes for a sample type.
//!
//! The window must be long enough that a single increment is negligible
//! against the window average, and the error-mitigating decay (EMD) must stay
//! short enough that `exp(-1/emd)` is still distinguishable from one in the
//! sample type. Both bounds depend on the type's epsilon, the required
//! signal to error-noise ratio and the minimum EMD to window ratio.

use core::marker::PhantomData;

use crate::compat::String;
use crate::{Error, Result, Sample};

pub const DEFAULT_SNR_BITS: usize = 20;
pub const DEFAULT_MIN_RATIO: usize = 10;

pub const MIN_SNR_BITS: usize = 4;
pub const MAX_SNR_BITS: usize = 44;

pub const MIN_MIN_RATIO: usize = 1;
pub const MAX_MIN_RATIO: usize = 1000;

/// Smallest maximum window any history may be built for.
pub const MIN_WINDOW_SAMPLES: usize = 64;

/// Bounds for sample type `S`, `SNR_BITS` bits of signal to error-noise ratio
/// and an EMD at least `MIN_RATIO` times the window size.
///
/// `SNR_BITS` must lie in `4..=44` and `MIN_RATIO` in `1..=1000`; other values
/// fail to compile.
///
/// ```
/// use ballast_core::Metrics;
///
/// type M = Metrics<f64, 20, 10>;
/// assert_eq!(M::min_window_samples(), 64);
/// assert_eq!(M::min_error_mitigating_decay_samples(), 640);
/// assert!(M::is_valid_window_size(48_000));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Metrics<
    S,
    const SNR_BITS: usize = DEFAULT_SNR_BITS,
    const MIN_RATIO: usize = DEFAULT_MIN_RATIO,
> {
    _sample: PhantomData<S>,
}

impl<S: Sample, const SNR_BITS: usize, const MIN_RATIO: usize> Metrics<S, SNR_BITS, MIN_RATIO> {
    const PARAMETERS_VALID: () = {
        assert!(
            SNR_BITS >= MIN_SNR_BITS && SNR_BITS <= MAX_SNR_BITS,
            "SNR_BITS must lie between 4 and 44"
        );
        assert!(
            MIN_RATIO >= MIN_MIN_RATIO && MIN_RATIO <= MAX_MIN_RATIO,
            "MIN_RATIO must lie between 1 and 1000"
        );
    };

    #[inline]
    fn epsilon() -> f64 {
        #[allow(clippy::let_unit_value)]
        let () = Self::PARAMETERS_VALID;
        S::epsilon().as_f64()
    }

    /// Longer decay constants lose precision in `exp(-1/emd)` itself.
    pub fn max_error_mitigating_decay_samples() -> usize {
        // Float to integer casts saturate at usize::MAX.
        (0.01 / Self::epsilon()) as usize
    }

    pub fn max_window_samples_boundary() -> usize {
        Self::max_error_mitigating_decay_samples() / MIN_RATIO
    }

    pub fn min_window_samples() -> usize {
        MIN_WINDOW_SAMPLES
    }

    pub fn max_window_samples() -> usize {
        let snr = (1u64 << SNR_BITS) as f64;
        let by_snr = (1.0 / (snr * Self::epsilon())) as usize;
        by_snr.min(Self::max_window_samples_boundary())
    }

    pub fn min_error_mitigating_decay_samples() -> usize {
        MIN_RATIO * MIN_WINDOW_SAMPLES
    }

    pub fn is_valid_window_size(samples: usize) -> bool {
        (Self::min_window_samples()..=Self::max_window_samples()).contains(&samples)
    }

    pub fn is_valid_error_mitigating_decay_samples(samples: usize) -> bool {
        (Self::min_error_mitigating_decay_samples()..=Self::max_error_mitigating_decay_samples())
            .contains(&samples)
    }

    pub fn valid_window_size(samples: usize) -> Result<usize> {
        if Self::is_valid_window_size(samples) {
            return Ok(samples);
        }
        Err(Error::InvalidArgument(Self::window_size_message(samples)))
    }

    pub fn valid_error_mitigating_decay_samples(samples: usize) -> Result<usize> {
        if Self::is_valid_error_mitigating_decay_samples(samples) {
            return Ok(samples);
        }
        Err(Error::InvalidArgument(format!(
            "error mitigating decay samples {} must lie between {} and {} for sample type {}",
            samples,
            Self::min_error_mitigating_decay_samples(),
            Self::max_error_mitigating_decay_samples(),
            S::TYPE_NAME
        )))
    }

    /// Validates both sizes and requires `window * MIN_RATIO <= emd`.
    pub fn valid_combination(window_samples: usize, emd_samples: usize) -> Result<(usize, usize)> {
        let emd_samples = Self::valid_error_mitigating_decay_samples(emd_samples)?;
        let window_samples = Self::valid_window_size(window_samples)?;
        if window_samples > emd_samples / MIN_RATIO {
            return Err(Error::InvalidArgument(format!(
                "window of {} samples needs at least {} error mitigating decay samples (ratio {}), got {}",
                window_samples,
                window_samples.saturating_mul(MIN_RATIO),
                MIN_RATIO,
                emd_samples
            )));
        }
        Ok((window_samples, emd_samples))
    }

    fn window_size_message(samples: usize) -> String {
        format!(
            "window size of {} samples must lie between {} and {} for a minimum of {} bits of signal to error-noise ratio and sample type {}",
            samples,
            Self::min_window_samples(),
            Self::max_window_samples(),
            SNR_BITS,
            S::TYPE_NAME
        )
    }
}
