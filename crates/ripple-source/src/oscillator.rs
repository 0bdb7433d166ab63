//! Time-driven point and disk sources.

use std::f64::consts::{FRAC_PI_2, TAU};

use log::{debug, warn};
use ripple_core::SourceWriter;
use smallvec::SmallVec;

/// Emission state of an [`Oscillator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OscillatorState {
    /// Writes nothing.
    #[default]
    Disabled,
    /// Emits every tick until disabled.
    Continuous,
    /// Emits one cycle from a zero crossing, then returns to `Disabled`.
    Pulsing,
}

/// A source that drives a disk of lattice cells with a cosine.
///
/// Each [`update`](Self::update) computes
/// `amplitude · cos(2π · frequency · t + pulse_phase)` and writes it to
/// every lattice cell within Euclidean `radius` of the cell nearest
/// `(x, y)`. Coordinates are in lattice cells, time in seconds.
///
/// The covered cells are cached per lattice size and rebuilt only when
/// the position, radius, or writer dimensions change.
#[derive(Clone, Debug)]
pub struct Oscillator {
    x: f32,
    y: f32,
    radius: f32,
    frequency: f64,
    amplitude: f32,
    pulse_phase: f64,
    time: f64,
    state: OscillatorState,
    footprint: SmallVec<[(i32, i32); 16]>,
    footprint_dims: Option<(u32, u32)>,
}

impl Oscillator {
    /// A disabled oscillator. Negative or non-finite radii become 0.
    pub fn new(x: f32, y: f32, radius: f32, frequency: f64, amplitude: f32) -> Self {
        Self {
            x,
            y,
            radius: sanitize_radius(radius),
            frequency,
            amplitude,
            pulse_phase: 0.0,
            time: 0.0,
            state: OscillatorState::Disabled,
            footprint: SmallVec::new(),
            footprint_dims: None,
        }
    }

    /// Current emission state.
    pub fn state(&self) -> OscillatorState {
        self.state
    }

    /// Whether the oscillator writes on update (continuous or pulsing).
    pub fn enabled(&self) -> bool {
        self.state != OscillatorState::Disabled
    }

    /// Whether a one-shot pulse is in progress.
    pub fn pulse_enabled(&self) -> bool {
        self.state == OscillatorState::Pulsing
    }

    /// Switch continuous emission on or off.
    ///
    /// Enabling a pulsing oscillator leaves the pulse running; disabling
    /// cancels it.
    pub fn set_enabled(&mut self, enabled: bool) {
        match (enabled, self.state) {
            (true, OscillatorState::Disabled) => {
                self.pulse_phase = 0.0;
                self.state = OscillatorState::Continuous;
            }
            (false, _) => {
                self.pulse_phase = 0.0;
                self.state = OscillatorState::Disabled;
            }
            _ => {}
        }
    }

    /// Disable, and zero the pulse phase and the last update time.
    pub fn reset(&mut self) {
        self.state = OscillatorState::Disabled;
        self.pulse_phase = 0.0;
        self.time = 0.0;
    }

    /// Centre column.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Centre row.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Move the source.
    pub fn set_position(&mut self, x: f32, y: f32) {
        if (x, y) != (self.x, self.y) {
            self.x = x;
            self.y = y;
            self.footprint_dims = None;
        }
    }

    /// Disk radius in cells.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the disk radius. Negative or non-finite values become 0.
    pub fn set_radius(&mut self, radius: f32) {
        let radius = sanitize_radius(radius);
        if radius != self.radius {
            self.radius = radius;
            self.footprint_dims = None;
        }
    }

    /// Frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Set the frequency in Hz. A running pulse keeps its phase offset.
    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    /// Peak value written to the lattice.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Set the peak value.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// Phase offset of the running pulse, 0 otherwise.
    pub fn pulse_phase(&self) -> f64 {
        self.pulse_phase
    }

    /// Time passed to the last [`update`](Self::update).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Seconds per cycle.
    pub fn period(&self) -> f64 {
        1.0 / self.frequency
    }

    /// Cells covered on a `width x height` lattice, row-major.
    ///
    /// Only in-bounds cells are produced, so the cost is bounded by the
    /// lattice size however large the radius.
    pub fn footprint(&mut self, width: u32, height: u32) -> &[(i32, i32)] {
        if self.footprint_dims != Some((width, height)) {
            self.rebuild_footprint(width, height);
        }
        &self.footprint
    }

    /// The waveform at `time`, regardless of state.
    pub fn value_at(&self, time: f64) -> f32 {
        (f64::from(self.amplitude) * (self.cos_arg(time) + self.pulse_phase).cos()) as f32
    }

    /// Emit at `time` through `writer`.
    ///
    /// Does nothing while disabled. A pulse writes its final value on
    /// the update where the phase completes a full cycle, then disables
    /// the oscillator.
    pub fn update(&mut self, time: f64, writer: &mut impl SourceWriter) {
        self.time = time;
        if self.state == OscillatorState::Disabled {
            return;
        }

        let value = self.value_at(time);
        let (w, h) = writer.dimensions();
        if self.footprint_dims != Some((w, h)) {
            self.rebuild_footprint(w, h);
        }
        for &(cx, cy) in &self.footprint {
            if writer.is_valid_point(cx, cy) {
                writer.set_source_value(cx, cy, value);
            }
        }

        if self.state == OscillatorState::Pulsing && self.cos_arg(time) + self.pulse_phase >= TAU {
            debug!("pulse at ({}, {}) finished at t={time}", self.x, self.y);
            self.state = OscillatorState::Disabled;
            self.pulse_phase = 0.0;
        }
    }

    /// Start a one-cycle pulse from a zero crossing at the last update time.
    ///
    /// Returns the pulse duration in seconds (`0.75 / frequency`), or
    /// `None` if a pulse is already running or the frequency is not
    /// positive.
    pub fn fire_pulse(&mut self) -> Option<f64> {
        self.fire_pulse_at(self.time)
    }

    /// Start a pulse whose zero crossing falls at `time`, the time the
    /// next [`update`](Self::update) will be called with.
    pub fn fire_pulse_at(&mut self, time: f64) -> Option<f64> {
        if self.state == OscillatorState::Pulsing {
            return None;
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            warn!("cannot pulse at frequency {}", self.frequency);
            return None;
        }
        self.time = time;
        self.pulse_phase = -self.cos_arg(time) + FRAC_PI_2;
        self.state = OscillatorState::Pulsing;
        let duration = 0.75 / self.frequency;
        debug!(
            "pulse at ({}, {}) fired at t={} for {duration}s",
            self.x, self.y, self.time
        );
        Some(duration)
    }

    fn cos_arg(&self, time: f64) -> f64 {
        TAU * self.frequency * time
    }

    /// Cells of a `width x height` lattice within `radius` of the cell
    /// nearest the centre.
    ///
    /// Works row by row in `f64`: each row's half-span is the largest
    /// `dx` with `dx² + dy² <= radius²`, clipped to the lattice before any
    /// cell is produced.
    fn rebuild_footprint(&mut self, width: u32, height: u32) {
        self.footprint.clear();
        self.footprint_dims = Some((width, height));
        if !(self.x.is_finite() && self.y.is_finite()) || width == 0 || height == 0 {
            return;
        }
        let cx = f64::from(self.x.round());
        let cy = f64::from(self.y.round());
        let radius = f64::from(self.radius);
        let r2 = f64::from(self.radius * self.radius);
        let (w, h) = (f64::from(width), f64::from(height));

        let y0 = (cy - radius.floor()).max(0.0);
        let y1 = (cy + radius.floor()).min(h - 1.0);
        if y0 > y1 {
            return;
        }
        // Bounds are now integral and inside [0, dim), which fits i32.
        for y in y0 as u32..=y1 as u32 {
            let dy = f64::from(y) - cy;
            let rem = r2 - dy * dy;
            if rem < 0.0 {
                continue;
            }
            let half = rem.sqrt().floor();
            let x0 = (cx - half).max(0.0);
            let x1 = (cx + half).min(w - 1.0);
            if x0 > x1 {
                continue;
            }
            for x in x0 as u32..=x1 as u32 {
                self.footprint.push((x as i32, y as i32));
            }
        }
    }
}

fn sanitize_radius(radius: f32) -> f32 {
    if radius.is_finite() {
        radius.max(0.0)
    } else {
        0.0
    }
}
