//! # Ballast - Stable Moving Averages for Metering
//!
//! Moving averages that run for days without drifting, for level meters,
//! loudness windows and any other sliding average over a sample stream.
//!
//! ## Architecture
//!
//! Ballast is an umbrella crate over:
//! - **ballast-core** - Decaying history, windows, single and multi-window
//!   engines, bounds metrics, configuration (`no_std` + `alloc`)
//!
//! and adds [`MeterBuilder`] for building engines from a [`MeterConfig`].
//!
//! ## Quick Start
//!
//! ```
//! use ballast::prelude::*;
//!
//! // 50 ms, 400 ms and 3 s windows at 48 kHz over one shared history
//! let mut meter = MeterBuilder::new()
//!     .max_window_samples(144_000)
//!     .emd_samples(1_440_000)
//!     .max_windows(3)
//!     .window(2_400, 1.0)
//!     .window(19_200, 1.0)
//!     .window(144_000, 1.0)
//!     .build_set()?;
//!
//! let x = 0.5_f64;
//! let loudest = meter.add_input_get_max(x * x, 0.0);
//! assert!(loudest > 0.0);
//! # Ok::<(), ballast::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default) - Enables `std` in ballast-core

mod builder;
mod error;

pub use builder::MeterBuilder;
pub use error::{Error, Result};

// Core types
pub use ballast_core::{
    DecayingHistory,
    HistoryId,
    MeterConfig,
    // Bounds
    Metrics,
    // Engines
    MovingAverage,
    MovingAverageSet,
    Sample,
    SampleStore,
    ScaledWindow,
    Window,
    WindowConfig,
    DEFAULT_MIN_RATIO,
    DEFAULT_SNR_BITS,
    MAX_SCALE,
    MAX_WINDOWS,
    MIN_HISTORY_SAMPLES,
    MIN_SCALE,
    MIN_WINDOWS,
};

// Core modules for direct access
pub use ballast_core::{config, history, metrics, storage, window};

/// Prelude module for convenient imports.
///
/// ```
/// use ballast::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Error, MeterBuilder, MeterConfig, Metrics, MovingAverage, MovingAverageSet, Result,
        Sample, ScaledWindow, WindowConfig,
    };
}
