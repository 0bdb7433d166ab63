//! Benchmark profiles for the Ripple wave-lattice engine.
//!
//! Provides pre-built simulations for benchmarking and examples:
//!
//! - [`reference_profile`]: 128x128 lattice, double slit, one source
//! - [`stress_profile`]: 512x512 lattice with dark-wave tracking

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ripple_engine::{BarrierConfig, ConfigError, SimulationConfig, WaveSimulation};
use ripple_propagator::BarrierStyle;
use ripple_source::Oscillator;

/// Build a reference benchmark profile: 128x128 lattice (16K cells,
/// 25K padded).
///
/// Double slit at x=64, one continuous source at the left, no dark wave.
pub fn reference_profile() -> Result<WaveSimulation, ConfigError> {
    profile(128, false)
}

/// Build a stress benchmark profile: 512x512 lattice (~262K cells).
///
/// Same layout as [`reference_profile`] scaled up, with dark-wave
/// tracking enabled.
pub fn stress_profile() -> Result<WaveSimulation, ConfigError> {
    profile(512, true)
}

fn profile(size: u32, dark_wave: bool) -> Result<WaveSimulation, ConfigError> {
    let half = size as f32 / 2.0;
    let mut sim = WaveSimulation::new(SimulationConfig {
        width: size,
        height: size,
        dark_wave,
        barrier: BarrierConfig {
            style: BarrierStyle::DoubleSlit,
            x: half,
            thickness: 2.0,
            slit_width: size as f32 / 32.0,
            slit_separation: size as f32 / 8.0,
            unit_scale: 1.0,
        },
        ..SimulationConfig::default()
    })?;
    let mut source = Oscillator::new(size as f32 / 8.0, half, 1.0, 0.05, 1.0);
    source.set_enabled(true);
    sim.add_oscillator("source", source)?;
    Ok(sim)
}
