//! Error types for the solver crate.
//!
//! These errors stay internal to the analysis engines: the public entry
//! points normalize every failure into the `error` field of the returned
//! report.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Singular matrix")]
    SingularMatrix,

    #[error("No Ground (GND) found.")]
    NoGround,
}

pub type Result<T> = std::result::Result<T, Error>;
