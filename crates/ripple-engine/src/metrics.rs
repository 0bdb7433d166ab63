//! Per-tick metrics for the simulation driver.
//!
//! [`StepMetrics`] captures timing and field statistics for a single
//! tick, for profiling and for checking that a run stays bounded.

/// Timing and field statistics collected during a single tick.
///
/// All durations are in microseconds. [`WaveSimulation::step`](crate::WaveSimulation::step)
/// fills every field; the values describe the most recent tick only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire tick, in microseconds.
    pub total_us: u64,
    /// Time spent updating oscillators, in microseconds.
    pub oscillator_us: u64,
    /// Time spent in the primary propagator, in microseconds.
    pub propagate_us: u64,
    /// Time spent in the dark propagator, in microseconds. Zero when
    /// dark-wave tracking is off.
    pub dark_us: u64,
    /// Padded cells on the wavefront after this tick.
    pub wavefront_cells: usize,
    /// Σ|v| over the visible lattice after this tick.
    pub sum_abs: f64,
    /// Largest |v| on the visible lattice after this tick.
    pub max_abs: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.oscillator_us, 0);
        assert_eq!(m.propagate_us, 0);
        assert_eq!(m.dark_us, 0);
        assert_eq!(m.wavefront_cells, 0);
        assert_eq!(m.sum_abs, 0.0);
        assert_eq!(m.max_abs, 0.0);
    }
}
