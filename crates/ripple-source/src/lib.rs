//! Wave sources for Ripple simulations.
//!
//! An [`Oscillator`] writes `amplitude·cos(2π·f·t + phase)` into a disk
//! of cells each tick through a [`SourceWriter`](ripple_core::SourceWriter).
//! It either runs continuously or emits a single one-cycle pulse that
//! starts at a zero crossing and switches itself off.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod oscillator;

pub use oscillator::{Oscillator, OscillatorState};
