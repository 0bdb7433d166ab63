//! Error types for the Ripple wave-lattice engine.
//!
//! Only construction can fail. Once a lattice or propagator exists, the
//! per-tick path is infallible: out-of-bounds reads return zero and
//! out-of-bounds writes are ignored.

use std::error::Error;
use std::fmt;

/// Errors from lattice construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LatticeError {
    /// A lattice was requested with a zero dimension, or with a
    /// dimension that does not fit the `i32` coordinate space.
    InvalidDimensions {
        /// Requested width (columns).
        width: u32,
        /// Requested height (rows).
        height: u32,
    },
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid lattice dimensions {width}x{height}")
            }
        }
    }
}

impl Error for LatticeError {}

/// Errors from propagator construction.
#[derive(Clone, Debug, PartialEq)]
pub enum PropagatorError {
    /// The shadow lattice of a dark propagator does not match the
    /// lattice it clears.
    ConfigurationMismatch {
        /// Dimensions of the real lattice, `(width, height)`.
        expected: (u32, u32),
        /// Dimensions of the offending lattice, `(width, height)`.
        actual: (u32, u32),
    },
    /// A numeric parameter is NaN, infinite, or outside its domain.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable description of the valid range.
        reason: String,
    },
    /// Building the padded working lattice failed.
    Lattice(LatticeError),
}

impl fmt::Display for PropagatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigurationMismatch { expected, actual } => write!(
                f,
                "lattice size mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter '{name}': {reason}")
            }
            Self::Lattice(e) => write!(f, "lattice: {e}"),
        }
    }
}

impl Error for PropagatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lattice(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LatticeError> for PropagatorError {
    fn from(e: LatticeError) -> Self {
        Self::Lattice(e)
    }
}
