//! Ripple: a discrete wave-lattice engine.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Ripple sub-crates. For most users, adding `ripple` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ripple::prelude::*;
//!
//! let config = SimulationConfig {
//!     width: 48,
//!     height: 48,
//!     barrier: BarrierConfig {
//!         style: BarrierStyle::SingleSlit,
//!         x: 24.0,
//!         slit_width: 6.0,
//!         ..BarrierConfig::default()
//!     },
//!     ..SimulationConfig::default()
//! };
//! let mut sim = WaveSimulation::new(config).unwrap();
//!
//! let mut source = Oscillator::new(8.0, 24.0, 1.0, 0.1, 1.0);
//! source.set_enabled(true);
//! sim.add_oscillator("source", source).unwrap();
//!
//! let metrics = sim.run(20);
//! assert!(metrics.max_abs > 0.0);
//! assert_eq!(sim.tick(), TickId(20));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ripple-core` | IDs, error types, the `SourceWriter` trait |
//! | [`lattice`] | `ripple-lattice` | `Lattice2D` and neighbourhood windows |
//! | [`propagator`] | `ripple-propagator` | Wave and dark propagators, potentials, barriers, damping |
//! | [`source`] | `ripple-source` | Oscillators |
//! | [`engine`] | `ripple-engine` | Simulation config, tick driver, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`ripple-core`).
pub use ripple_core as types;

/// Bounds-safe scalar lattices (`ripple-lattice`).
pub use ripple_lattice as lattice;

/// Wave propagation, potentials, barriers, and wavefront tracking
/// (`ripple-propagator`).
///
/// [`propagator::WavePropagator`] is the finite-difference stepper;
/// [`propagator::DarkPropagator`] tracks its wavefront.
pub use ripple_propagator as propagator;

/// Continuous and pulsed sources (`ripple-source`).
pub use ripple_source as source;

/// The simulation driver (`ripple-engine`).
pub use ripple_engine as engine;

/// Common imports for typical Ripple usage.
///
/// ```rust
/// use ripple::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use ripple_core::{LatticeError, PotentialId, PropagatorError, SourceWriter, TickId};

    // Lattice
    pub use ripple_lattice::Lattice2D;

    // Propagation
    pub use ripple_propagator::{
        Barrier, BarrierStyle, DampingConfig, DampingProfile, DarkPropagator, Potential,
        WavePropagator,
    };

    // Sources
    pub use ripple_source::{Oscillator, OscillatorState};

    // Engine
    pub use ripple_engine::{
        BarrierConfig, ConfigError, SimulationConfig, StepMetrics, WaveSimulation,
    };
}
