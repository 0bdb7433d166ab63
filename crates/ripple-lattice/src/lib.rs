//! Scalar lattices for Ripple simulations.
//!
//! [`Lattice2D`] is the grid every other crate reads and writes: a
//! fixed-size, row-major field of `f32` amplitudes with bounds-safe
//! access. [`Window`] clips square (Chebyshev) neighbourhoods to a
//! lattice and is shared by smoothing and wavefront detection.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod lattice;
pub mod window;

pub use lattice::Lattice2D;
pub use window::Window;
