//! Wave propagation for Ripple simulations.
//!
//! [`WavePropagator`] advances a lattice one step of the discretised 2D
//! wave equation, damped inside a padding margin so waves leave the
//! visible area instead of reflecting. [`Potential`] regions block
//! propagation; a [`Barrier`] arranges three of them into slits.
//! [`DarkPropagator`] runs the same scheme on a shadow lattice to find
//! the advancing wavefront.
//!
//! # Step order (each tick)
//!
//! 1. Sources write through [`SourceWriter`](ripple_core::SourceWriter)
//! 2. [`WavePropagator::propagate`] advances the primary lattice
//! 3. [`DarkPropagator::propagate`] advances the shadow and clears the
//!    front on the primary's visible lattice

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod barrier;
pub mod damping;
pub mod dark;
pub mod potential;
pub mod propagator;

pub use barrier::{Barrier, BarrierSlots, BarrierStyle};
pub use damping::{DampingConfig, DampingProfile};
pub use dark::DarkPropagator;
pub use potential::Potential;
pub use propagator::{WavePropagator, WavePropagatorBuilder};
