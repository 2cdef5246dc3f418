//! Centralized error type for the ballast umbrella crate.
//!
//! Wraps core errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] ballast_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
