//! Simulation configuration, validation, and error types.
//!
//! [`SimulationConfig`] is the input to
//! [`WaveSimulation::new`](crate::WaveSimulation::new).
//! [`validate()`](SimulationConfig::validate) checks every field before
//! any lattice is allocated.

use std::error::Error;
use std::fmt;

use ripple_core::{LatticeError, PropagatorError};
use ripple_propagator::{BarrierStyle, DampingConfig, WavePropagator};

// ── BarrierConfig ──────────────────────────────────────────────────

/// Slit barrier layout. Lengths are in model units; `unit_scale`
/// converts them to lattice cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarrierConfig {
    /// Layout. Default: [`BarrierStyle::None`].
    pub style: BarrierStyle,
    /// Wall position along x. Default: 0.
    pub x: f32,
    /// Wall thickness. Default: 1.
    pub thickness: f32,
    /// Width of each slit. Default: 4.
    pub slit_width: f32,
    /// Centre-to-centre distance between the two slits. Default: 12.
    pub slit_separation: f32,
    /// Lattice cells per model unit. Default: 1.
    pub unit_scale: f32,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            style: BarrierStyle::None,
            x: 0.0,
            thickness: 1.0,
            slit_width: 4.0,
            slit_separation: 12.0,
            unit_scale: 1.0,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building or reconfiguring a simulation.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Lattice dimensions are invalid.
    Lattice(LatticeError),
    /// Propagator construction failed.
    Propagator(PropagatorError),
    /// `dt` is NaN, infinite, zero, or negative.
    InvalidTimeStep {
        /// The invalid value.
        value: f64,
    },
    /// A barrier length is NaN, infinite, or negative.
    InvalidBarrier {
        /// Description of which field was rejected.
        reason: String,
    },
    /// An oscillator with this name already exists.
    DuplicateOscillator {
        /// The conflicting name.
        name: String,
    },
    /// No oscillator with this name exists.
    UnknownOscillator {
        /// The requested name.
        name: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lattice(e) => write!(f, "lattice: {e}"),
            Self::Propagator(e) => write!(f, "propagator: {e}"),
            Self::InvalidTimeStep { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::InvalidBarrier { reason } => write!(f, "invalid barrier: {reason}"),
            Self::DuplicateOscillator { name } => {
                write!(f, "oscillator '{name}' already exists")
            }
            Self::UnknownOscillator { name } => write!(f, "no oscillator named '{name}'"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lattice(e) => Some(e),
            Self::Propagator(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LatticeError> for ConfigError {
    fn from(e: LatticeError) -> Self {
        Self::Lattice(e)
    }
}

impl From<PropagatorError> for ConfigError {
    fn from(e: PropagatorError) -> Self {
        Self::Propagator(e)
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete configuration for a [`WaveSimulation`](crate::WaveSimulation).
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Visible lattice columns. Default: 64.
    pub width: u32,
    /// Visible lattice rows. Default: 64.
    pub height: u32,
    /// Damping margin columns on each side. Default: 16.
    pub damp_x: u32,
    /// Damping margin rows on each side. Default: 16.
    pub damp_y: u32,
    /// Courant coefficient `c²Δt²/Δx²`. Default: 0.5. Values above 0.5
    /// are accepted but unstable.
    pub courant: f32,
    /// Margin attenuation. Default: smoothstep at strength 0.5.
    pub damping: DampingConfig,
    /// Simulated seconds per tick. Default: 1.0.
    pub dt: f64,
    /// Run a dark propagator to clear the real lattice along the
    /// wavefront. Default: false.
    pub dark_wave: bool,
    /// Value the dark propagator writes to wavefront cells. Default: 0.
    pub untouched_value: f32,
    /// Slit barrier. Default: no barrier.
    pub barrier: BarrierConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            damp_x: WavePropagator::DEFAULT_MARGIN,
            damp_y: WavePropagator::DEFAULT_MARGIN,
            courant: WavePropagator::MAX_STABLE_COURANT,
            damping: DampingConfig::default(),
            dt: 1.0,
            dark_wave: false,
            untouched_value: 0.0,
            barrier: BarrierConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate all fields.
    ///
    /// Lattice sizes that only fail once padded are caught later, by the
    /// propagator builder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Visible lattice must be non-empty and addressable.
        if self.width == 0
            || self.height == 0
            || self.width > ripple_lattice::Lattice2D::MAX_DIM
            || self.height > ripple_lattice::Lattice2D::MAX_DIM
        {
            return Err(LatticeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            }
            .into());
        }
        // 2. Time step.
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep { value: self.dt });
        }
        // 3. Propagator parameters.
        if !(self.courant.is_finite() && self.courant > 0.0) {
            return Err(PropagatorError::InvalidParameter {
                name: "courant",
                reason: format!("must be finite and > 0, got {}", self.courant),
            }
            .into());
        }
        self.damping
            .validate()
            .map_err(|reason| PropagatorError::InvalidParameter {
                name: "damping",
                reason,
            })?;
        // 4. Barrier lengths.
        let b = &self.barrier;
        for (name, value) in [
            ("x", b.x),
            ("thickness", b.thickness),
            ("slit_width", b.slit_width),
            ("slit_separation", b.slit_separation),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidBarrier {
                    reason: format!("{name} must be finite and >= 0, got {value}"),
                });
            }
        }
        if !b.unit_scale.is_finite() || b.unit_scale <= 0.0 {
            return Err(ConfigError::InvalidBarrier {
                reason: format!("unit_scale must be finite and > 0, got {}", b.unit_scale),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let cfg = SimulationConfig {
            width: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::Lattice(LatticeError::InvalidDimensions {
                width: 0,
                height: 64,
            }))
        );
    }

    #[test]
    fn bad_dt_is_rejected() {
        for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let cfg = SimulationConfig {
                dt,
                ..SimulationConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(ConfigError::InvalidTimeStep { .. })),
                "dt={dt}"
            );
        }
    }

    #[test]
    fn bad_courant_is_rejected() {
        let cfg = SimulationConfig {
            courant: -0.5,
            ..SimulationConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("courant"));
        assert!(err.source().is_some());
    }

    #[test]
    fn bad_barrier_is_rejected() {
        let mut cfg = SimulationConfig::default();
        cfg.barrier.slit_width = -2.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidBarrier { .. })
        ));

        let mut cfg = SimulationConfig::default();
        cfg.barrier.unit_scale = 0.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("unit_scale"));
    }

    #[test]
    fn oscillator_errors_display_name() {
        let e = ConfigError::UnknownOscillator {
            name: "left".into(),
        };
        assert_eq!(e.to_string(), "no oscillator named 'left'");
        let e = ConfigError::DuplicateOscillator {
            name: "left".into(),
        };
        assert!(e.to_string().contains("left"));
    }
}
