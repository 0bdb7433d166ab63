//! Core types and traits for the Ripple wave-lattice engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, error types, and the [`SourceWriter`] capability
//! shared by lattices, propagators, and sources.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod traits;

pub use error::{LatticeError, PropagatorError};
pub use id::{PotentialId, TickId};
pub use traits::SourceWriter;
