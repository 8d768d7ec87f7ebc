//! Error taxonomy for the direction-finding toolbox.
//!
//! Only two conditions are raised by the numerical core: a malformed rotation operand and a
//! missing required record. Everything else (division by zero, undefined tangent ratios) is
//! left to IEEE-754 and propagates as infinities or NaNs.

use thiserror::Error;

/// Errors raised by frame composition, geometry assembly and scenario I/O.
#[derive(Debug, Error)]
pub enum GeoError {
    /// A rotation operand was absent (empty) or not exactly 3×3.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A required value record was not supplied.
    #[error("missing required value: {0}")]
    MissingValue(&'static str),
    /// Scenario file could not be read or written.
    #[error("scenario i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Scenario file contents could not be parsed or serialized.
    #[error("scenario format error: {0}")]
    Parse(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, GeoError>;
