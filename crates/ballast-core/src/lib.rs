//! Numerically stable moving averages for real-time metering.
//!
//! A plain running sum (`sum += new; sum -= old`) picks up a rounding error on
//! every sample that never goes away. The averages in this crate let every
//! sample decay with a long error-mitigating time constant (EMD) and correct
//! the subtraction of old samples for that decay, so rounding errors are
//! damped geometrically and stay bounded over arbitrarily long runs.
//!
//! # Primary API
//!
//! - [`MovingAverage`]: one window over one history
//! - [`MovingAverageSet`]: up to 32 scaled windows sharing one history
//! - [`Metrics`]: valid window / EMD ranges for a sample type and SNR
//! - [`DecayingHistory`], [`Window`], [`ScaledWindow`]: the building blocks
//! - [`MeterConfig`]: serializable configuration with validation
//!
//! # Example
//!
//! ```
//! use ballast_core::MovingAverage;
//!
//! let mut avg = MovingAverage::<f64>::new(1024, 10240)?;
//! avg.set_window_size(256)?;
//! avg.set_average(0.0);
//!
//! for _ in 0..256 {
//!     avg.add_input(1.0);
//! }
//! assert!((avg.average() - 1.0).abs() < 1e-6);
//! # Ok::<(), ballast_core::Error>(())
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
extern crate alloc;

pub mod error;
pub use error::{Error, Result};

/// Compatibility layer for no_std + alloc.
pub mod compat;

mod sample;
pub use sample::Sample;

pub mod storage;
pub use storage::SampleStore;

pub mod metrics;
pub use metrics::{Metrics, DEFAULT_MIN_RATIO, DEFAULT_SNR_BITS};

pub mod history;
pub use history::{DecayingHistory, HistoryId, MIN_HISTORY_SAMPLES};

pub mod window;
pub use window::{ScaledWindow, Window, MAX_SCALE, MIN_SCALE};

mod single;
pub use single::MovingAverage;

mod set;
pub use set::{MovingAverageSet, MAX_WINDOWS, MIN_WINDOWS};

pub mod config;
pub use config::{MeterConfig, WindowConfig};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{
        Error, MeterConfig, Metrics, MovingAverage, MovingAverageSet, Result, Sample,
        ScaledWindow, Window, WindowConfig,
    };
}
