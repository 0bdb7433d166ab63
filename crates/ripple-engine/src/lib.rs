//! Simulation driver for Ripple wave lattices.
//!
//! [`WaveSimulation`] owns a primary [`WavePropagator`](ripple_propagator::WavePropagator),
//! an optional [`DarkPropagator`](ripple_propagator::DarkPropagator), a
//! slit [`Barrier`](ripple_propagator::Barrier), and a set of named
//! [`Oscillator`](ripple_source::Oscillator)s, and advances them in a
//! fixed order each tick. It is built from a validated
//! [`SimulationConfig`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod simulation;

pub use config::{BarrierConfig, ConfigError, SimulationConfig};
pub use metrics::StepMetrics;
pub use simulation::WaveSimulation;
