//! Error types for ballast-core.

use crate::compat::String;
use thiserror::Error;

/// Error type for ballast-core operations.
///
/// Every error is raised before any state is touched: a rejected call leaves
/// the history, windows and averages exactly as they were.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{what} {value} out of range: must lie between {min} and {max}")]
    OutOfRange {
        what: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("Window already bound to a history")]
    AlreadyBound,

    #[error("Window not bound to a history")]
    NotBound,

    #[error("Window is bound to a different history")]
    ForeignHistory,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn out_of_range(what: &'static str, value: usize, min: usize, max: usize) -> Self {
        Error::OutOfRange {
            what,
            value,
            min,
            max,
        }
    }
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
