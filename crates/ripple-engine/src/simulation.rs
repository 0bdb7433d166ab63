//! The per-tick driver.
//!
//! Each [`WaveSimulation::step`] runs, in order:
//!
//! 1. every oscillator, in insertion order, at the current simulated time
//! 2. the primary propagator
//! 3. the dark propagator, if enabled, which clears the primary's
//!    visible lattice along the wavefront
//!
//! then advances the tick counter and simulated time.

use std::time::Instant;

use indexmap::IndexMap;
use log::{debug, trace};
use ripple_core::{SourceWriter, TickId};
use ripple_lattice::Lattice2D;
use ripple_propagator::{Barrier, BarrierSlots, BarrierStyle, DarkPropagator, WavePropagator};
use ripple_source::Oscillator;

use crate::config::{BarrierConfig, ConfigError, SimulationConfig};
use crate::metrics::StepMetrics;

/// Forwards oscillator writes to the primary propagator and, when
/// present, the dark propagator's shadow, so both see the same sources.
struct SourceFanout<'a> {
    primary: &'a mut WavePropagator,
    dark: Option<&'a mut DarkPropagator>,
}

impl SourceWriter for SourceFanout<'_> {
    fn dimensions(&self) -> (u32, u32) {
        self.primary.lattice().dimensions()
    }

    fn is_valid_point(&self, x: i32, y: i32) -> bool {
        self.primary.is_valid_point(x, y)
    }

    fn set_source_value(&mut self, x: i32, y: i32, value: f32) {
        self.primary.set_source_value(x, y, value);
        if let Some(dark) = self.dark.as_deref_mut() {
            dark.set_source_value(x, y, value);
        }
    }
}

/// A wave lattice with its sources, barrier, and optional wavefront
/// tracking, advanced one tick at a time.
///
/// # Examples
///
/// ```
/// use ripple_engine::{SimulationConfig, WaveSimulation};
/// use ripple_source::Oscillator;
///
/// let mut sim = WaveSimulation::new(SimulationConfig::default()).unwrap();
/// let mut source = Oscillator::new(32.0, 32.0, 0.0, 0.1, 1.0);
/// source.set_enabled(true);
/// sim.add_oscillator("source", source).unwrap();
///
/// sim.run(10);
/// assert_eq!(sim.tick().0, 10);
/// assert!(sim.lattice().value(32, 32) != 0.0);
/// ```
pub struct WaveSimulation {
    config: SimulationConfig,
    primary: WavePropagator,
    dark: Option<DarkPropagator>,
    barrier: Barrier,
    primary_slots: BarrierSlots,
    dark_slots: Option<BarrierSlots>,
    oscillators: IndexMap<String, Oscillator>,
    time: f64,
    tick: TickId,
    metrics: StepMetrics,
}

impl WaveSimulation {
    /// Validate `config` and build the lattice, propagators, and barrier.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut primary = build_propagator(&config)?;
        let mut dark = if config.dark_wave {
            let shadow = build_propagator(&config)?;
            Some(
                DarkPropagator::new(shadow, primary.lattice())?
                    .with_untouched_value(config.untouched_value),
            )
        } else {
            None
        };

        let b = &config.barrier;
        let mut barrier = Barrier::with_unit_scale(b.x, b.thickness, b.unit_scale);
        barrier.configure(b.style, config.height, b.slit_width, b.slit_separation);
        let primary_slots = barrier.register(&mut primary);
        let dark_slots = dark.as_mut().map(|d| barrier.register(d.shadow_mut()));

        debug!(
            "simulation {}x{} dt={} dark_wave={} barrier={:?}",
            config.width, config.height, config.dt, config.dark_wave, b.style
        );

        Ok(Self {
            config,
            primary,
            dark,
            barrier,
            primary_slots,
            dark_slots,
            oscillators: IndexMap::new(),
            time: 0.0,
            tick: TickId::default(),
            metrics: StepMetrics::default(),
        })
    }

    /// Execute one tick and return its metrics.
    pub fn step(&mut self) -> &StepMetrics {
        let tick_start = Instant::now();

        // 1. Sources.
        let osc_start = Instant::now();
        {
            let mut writer = SourceFanout {
                primary: &mut self.primary,
                dark: self.dark.as_mut(),
            };
            for osc in self.oscillators.values_mut() {
                osc.update(self.time, &mut writer);
            }
        }
        let oscillator_us = osc_start.elapsed().as_micros() as u64;

        // 2. Primary propagation.
        let prop_start = Instant::now();
        self.primary.propagate();
        let propagate_us = prop_start.elapsed().as_micros() as u64;

        // 3. Wavefront clearing.
        let dark_start = Instant::now();
        let mut wavefront_cells = 0;
        if let Some(dark) = self.dark.as_mut() {
            dark.propagate(self.primary.lattice_mut());
            wavefront_cells = dark.wavefront_cells();
        }
        let dark_us = if self.dark.is_some() {
            dark_start.elapsed().as_micros() as u64
        } else {
            0
        };

        self.tick = self.tick.next();
        self.time = self.tick.0 as f64 * self.config.dt;

        let lattice = self.primary.lattice();
        self.metrics = StepMetrics {
            total_us: tick_start.elapsed().as_micros() as u64,
            oscillator_us,
            propagate_us,
            dark_us,
            wavefront_cells,
            sum_abs: lattice.sum_abs(),
            max_abs: lattice.max_abs(),
        };
        trace!(
            "tick {} t={} wavefront={} max_abs={}",
            self.tick,
            self.time,
            wavefront_cells,
            self.metrics.max_abs
        );
        &self.metrics
    }

    /// Execute `ticks` steps. Returns the metrics of the last one.
    pub fn run(&mut self, ticks: u64) -> &StepMetrics {
        for _ in 0..ticks {
            self.step();
        }
        &self.metrics
    }

    /// The visible lattice as of the last tick.
    pub fn lattice(&self) -> &Lattice2D {
        self.primary.lattice()
    }

    /// Simulated seconds elapsed: `tick · dt`.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Ticks completed since construction or [`reset`](Self::reset).
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// Metrics from the most recent tick.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// The configuration, including the current barrier layout.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The primary propagator.
    pub fn propagator(&self) -> &WavePropagator {
        &self.primary
    }

    /// The dark propagator, when dark-wave tracking is on.
    pub fn dark(&self) -> Option<&DarkPropagator> {
        self.dark.as_ref()
    }

    /// The slit barrier.
    pub fn barrier(&self) -> &Barrier {
        &self.barrier
    }

    /// Zero the field and wavefront state. Time, tick, and oscillators
    /// are untouched.
    pub fn clear(&mut self) {
        self.primary.clear();
        if let Some(dark) = self.dark.as_mut() {
            dark.clear();
        }
    }

    /// [`clear`](Self::clear), reset every oscillator, and rewind time
    /// and tick to zero.
    pub fn reset(&mut self) {
        self.clear();
        for osc in self.oscillators.values_mut() {
            osc.reset();
        }
        self.time = 0.0;
        self.tick = TickId::default();
        self.metrics = StepMetrics::default();
        debug!("simulation reset");
    }

    // ── Oscillators ────────────────────────────────────────────────

    /// Register an oscillator under `name`. Oscillators update in
    /// registration order.
    pub fn add_oscillator(
        &mut self,
        name: impl Into<String>,
        oscillator: Oscillator,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if self.oscillators.contains_key(&name) {
            return Err(ConfigError::DuplicateOscillator { name });
        }
        self.oscillators.insert(name, oscillator);
        Ok(())
    }

    /// Remove and return the oscillator named `name`, keeping the
    /// order of the rest.
    pub fn remove_oscillator(&mut self, name: &str) -> Option<Oscillator> {
        self.oscillators.shift_remove(name)
    }

    /// The oscillator named `name`.
    pub fn oscillator(&self, name: &str) -> Option<&Oscillator> {
        self.oscillators.get(name)
    }

    /// Mutable access to the oscillator named `name`.
    pub fn oscillator_mut(&mut self, name: &str) -> Option<&mut Oscillator> {
        self.oscillators.get_mut(name)
    }

    /// All oscillators in update order.
    pub fn oscillators(&self) -> impl Iterator<Item = (&str, &Oscillator)> {
        self.oscillators.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fire a pulse on `name` whose zero crossing falls on the next tick.
    ///
    /// Returns the pulse duration in seconds, or `Ok(None)` if that
    /// oscillator is already pulsing.
    pub fn fire_pulse(&mut self, name: &str) -> Result<Option<f64>, ConfigError> {
        let time = self.time;
        let osc = self
            .oscillators
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownOscillator {
                name: name.to_string(),
            })?;
        Ok(osc.fire_pulse_at(time))
    }

    // ── Barrier ────────────────────────────────────────────────────

    /// Recompute the barrier layout and push it to the propagators.
    pub fn configure_barrier(
        &mut self,
        style: BarrierStyle,
        slit_width: f32,
        slit_separation: f32,
    ) -> Result<(), ConfigError> {
        let mut next = self.config.barrier;
        next.style = style;
        next.slit_width = slit_width;
        next.slit_separation = slit_separation;
        self.set_barrier_config(next)
    }

    /// Move the barrier to `x` (model units), keeping its layout.
    pub fn set_barrier_x(&mut self, x: f32) -> Result<(), ConfigError> {
        let mut next = self.config.barrier;
        next.x = x;
        self.set_barrier_config(next)
    }

    fn set_barrier_config(&mut self, barrier: BarrierConfig) -> Result<(), ConfigError> {
        let candidate = SimulationConfig {
            barrier,
            ..self.config.clone()
        };
        candidate.validate()?;
        self.config = candidate;

        self.barrier.set_x(barrier.x);
        self.barrier.configure(
            barrier.style,
            self.config.height,
            barrier.slit_width,
            barrier.slit_separation,
        );
        self.barrier.apply(&mut self.primary, self.primary_slots);
        if let (Some(dark), Some(slots)) = (self.dark.as_mut(), self.dark_slots) {
            self.barrier.apply(dark.shadow_mut(), slots);
        }
        Ok(())
    }
}

fn build_propagator(config: &SimulationConfig) -> Result<WavePropagator, ConfigError> {
    Ok(WavePropagator::builder()
        .lattice(Lattice2D::zeros(config.width, config.height)?)
        .damp_x(config.damp_x)
        .damp_y(config.damp_y)
        .courant(config.courant)
        .damping(config.damping)
        .build()?)
}

impl std::fmt::Debug for WaveSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveSimulation")
            .field("width", &self.config.width)
            .field("height", &self.config.height)
            .field("tick", &self.tick)
            .field("time", &self.time)
            .field("oscillators", &self.oscillators.len())
            .field("barrier", &self.barrier.style())
            .field("dark_wave", &self.dark.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(dark_wave: bool) -> WaveSimulation {
        WaveSimulation::new(SimulationConfig {
            width: 21,
            height: 21,
            damp_x: 4,
            damp_y: 4,
            dark_wave,
            ..SimulationConfig::default()
        })
        .unwrap()
    }

    fn continuous(x: f32, y: f32, freq: f64) -> Oscillator {
        let mut osc = Oscillator::new(x, y, 0.0, freq, 1.0);
        osc.set_enabled(true);
        osc
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = WaveSimulation::new(SimulationConfig {
            height: 0,
            ..SimulationConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Lattice(_)));
    }

    #[test]
    fn step_advances_time_and_tick() {
        let mut sim = WaveSimulation::new(SimulationConfig {
            width: 8,
            height: 8,
            dt: 0.25,
            ..SimulationConfig::default()
        })
        .unwrap();
        sim.run(4);
        assert_eq!(sim.tick(), TickId(4));
        assert_eq!(sim.time(), 1.0);
        assert_eq!(sim.propagator().num_steps(), 4);
    }

    #[test]
    fn oscillators_drive_at_current_time() {
        let mut sim = small(false);
        sim.add_oscillator("a", continuous(10.0, 10.0, 0.25)).unwrap();
        // t = 0: cos(0) = 1, held through the step.
        sim.step();
        assert_eq!(sim.lattice().value(10, 10), 1.0);
        // t = 1: cos(π/2) ≈ 0.
        sim.step();
        assert!(sim.lattice().value(10, 10).abs() < 1e-6);
        assert_eq!(sim.oscillator("a").unwrap().time(), 1.0);
    }

    #[test]
    fn oscillator_names_are_unique() {
        let mut sim = small(false);
        sim.add_oscillator("a", continuous(1.0, 1.0, 0.1)).unwrap();
        let err = sim
            .add_oscillator("a", continuous(2.0, 2.0, 0.1))
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateOscillator { name: "a".into() });
        assert!(sim.remove_oscillator("a").is_some());
        assert!(sim.oscillator("a").is_none());
    }

    #[test]
    fn oscillators_keep_insertion_order() {
        let mut sim = small(false);
        for name in ["c", "a", "b"] {
            sim.add_oscillator(name, continuous(1.0, 1.0, 0.1)).unwrap();
        }
        let names: Vec<&str> = sim.oscillators().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn fire_pulse_unknown_name() {
        let mut sim = small(false);
        assert_eq!(
            sim.fire_pulse("nope"),
            Err(ConfigError::UnknownOscillator {
                name: "nope".into()
            })
        );
    }

    #[test]
    fn fire_pulse_starts_at_next_tick() {
        let mut sim = small(false);
        sim.add_oscillator("p", Oscillator::new(10.0, 10.0, 0.0, 0.25, 1.0))
            .unwrap();
        sim.run(3);
        assert_eq!(sim.lattice().sum_abs(), 0.0);

        let duration = sim.fire_pulse("p").unwrap().unwrap();
        assert_eq!(duration, 3.0);
        assert_eq!(sim.fire_pulse("p").unwrap(), None);
        sim.step();
        assert!(sim.lattice().value(10, 10).abs() < 1e-6);
        sim.step();
        assert!((sim.lattice().value(10, 10) + 1.0).abs() < 1e-6);
        sim.run(3);
        assert!(!sim.oscillator("p").unwrap().enabled());
    }

    #[test]
    fn sources_reach_the_shadow() {
        let mut sim = small(true);
        sim.add_oscillator("a", continuous(10.0, 10.0, 0.1)).unwrap();
        sim.step();
        let dark = sim.dark().unwrap();
        assert_eq!(dark.num_steps(), 1);
        assert_eq!(dark.shadow().lattice().value(10, 10), 1.0);
        assert!(sim.last_metrics().wavefront_cells > 0);
    }

    #[test]
    fn barrier_is_installed_once_per_propagator() {
        let mut sim = WaveSimulation::new(SimulationConfig {
            width: 40,
            height: 40,
            damp_x: 4,
            damp_y: 4,
            dark_wave: true,
            barrier: BarrierConfig {
                style: BarrierStyle::SingleSlit,
                x: 20.0,
                slit_width: 4.0,
                ..BarrierConfig::default()
            },
            ..SimulationConfig::default()
        })
        .unwrap();
        assert_eq!(sim.propagator().potentials().len(), 3);

        sim.configure_barrier(BarrierStyle::DoubleSlit, 2.0, 10.0)
            .unwrap();
        sim.set_barrier_x(25.0).unwrap();
        assert_eq!(sim.propagator().potentials().len(), 3);
        assert_eq!(
            sim.dark().unwrap().shadow().potentials(),
            sim.propagator().potentials()
        );
        assert!(sim.propagator().potentials().iter().all(|p| p.x() == 25.0));
        assert_eq!(sim.config().barrier.style, BarrierStyle::DoubleSlit);
    }

    #[test]
    fn invalid_barrier_update_is_rejected() {
        let mut sim = small(false);
        let before = sim.config().clone();
        assert!(sim
            .configure_barrier(BarrierStyle::SingleSlit, f32::NAN, 1.0)
            .is_err());
        assert_eq!(sim.config(), &before);
        assert_eq!(sim.barrier().style(), BarrierStyle::None);
    }

    #[test]
    fn metrics_track_field() {
        let mut sim = small(false);
        sim.add_oscillator("a", continuous(10.0, 10.0, 0.1)).unwrap();
        let m = sim.step().clone();
        assert_eq!(m.max_abs, 1.0);
        assert_eq!(m.sum_abs, 1.0 + 4.0 * 0.5);
        assert_eq!(m.dark_us, 0);
        assert_eq!(m.wavefront_cells, 0);
    }

    #[test]
    fn reset_rewinds_everything() {
        let mut sim = small(true);
        sim.add_oscillator("a", continuous(10.0, 10.0, 0.1)).unwrap();
        sim.run(5);
        sim.reset();
        assert_eq!(sim.tick(), TickId(0));
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.lattice().sum_abs(), 0.0);
        assert!(!sim.oscillator("a").unwrap().enabled());
        assert_eq!(sim.dark().unwrap().num_steps(), 0);
        assert_eq!(sim.last_metrics(), &StepMetrics::default());
    }

    #[test]
    fn clear_keeps_time() {
        let mut sim = small(false);
        sim.add_oscillator("a", continuous(10.0, 10.0, 0.1)).unwrap();
        sim.run(5);
        sim.clear();
        assert_eq!(sim.tick(), TickId(5));
        assert_eq!(sim.lattice().sum_abs(), 0.0);
        assert!(sim.oscillator("a").unwrap().enabled());
    }

    #[test]
    fn debug_impl_doesnt_panic() {
        let sim = small(true);
        let s = format!("{sim:?}");
        assert!(s.contains("WaveSimulation"));
    }
}
