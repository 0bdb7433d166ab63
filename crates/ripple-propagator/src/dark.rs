//! Wavefront tracking on a shadow lattice.
//!
//! The shadow runs the same scheme as the primary propagator and is
//! driven by the same sources. A padded cell is *touched* once its
//! shadow value has exceeded [`TOUCH_THRESHOLD`] in magnitude; the latch
//! never resets until [`DarkPropagator::clear`]. A cell is on the
//! wavefront when its 3×3 neighbourhood holds both touched and untouched
//! cells. Cells the shadow pins to zero (blocked by a potential, or on
//! the fixed outer ring) can never be touched, so they are left out of
//! the count. Each step the real-lattice cells under the front are
//! overwritten with the untouched sentinel.

use log::debug;
use ripple_core::{PropagatorError, SourceWriter};
use ripple_lattice::{Lattice2D, Window};

use crate::propagator::WavePropagator;

/// Magnitude above which a shadow cell counts as reached by the wave.
pub const TOUCH_THRESHOLD: f32 = 1e-6;

/// Runs a shadow [`WavePropagator`] and clears the real lattice along
/// its advancing wavefront.
#[derive(Debug, Clone)]
pub struct DarkPropagator {
    shadow: WavePropagator,
    touched: Lattice2D,
    untouched_value: f32,
    front: Vec<(i32, i32)>,
    num_steps: u64,
}

impl DarkPropagator {
    /// Track the wavefront of `shadow` over a real lattice shaped like `real`.
    ///
    /// # Errors
    ///
    /// [`PropagatorError::ConfigurationMismatch`] if the shadow's visible
    /// lattice and `real` differ in size.
    pub fn new(shadow: WavePropagator, real: &Lattice2D) -> Result<Self, PropagatorError> {
        let expected = real.dimensions();
        let actual = shadow.lattice().dimensions();
        if expected != actual {
            return Err(PropagatorError::ConfigurationMismatch { expected, actual });
        }
        let (pw, ph) = shadow.padded().dimensions();
        let touched = Lattice2D::zeros(pw, ph)?;
        debug!("dark propagator {}x{} padded {pw}x{ph}", expected.0, expected.1);
        Ok(Self {
            shadow,
            touched,
            untouched_value: 0.0,
            front: Vec::new(),
            num_steps: 0,
        })
    }

    /// Sentinel written to real cells under the wavefront (default 0.0).
    pub fn with_untouched_value(mut self, value: f32) -> Self {
        self.untouched_value = value;
        self
    }

    /// The sentinel written to real cells under the wavefront.
    pub fn untouched_value(&self) -> f32 {
        self.untouched_value
    }

    /// Whether `(x, y)` sits on the boundary between touched and
    /// untouched territory of `lattice`.
    ///
    /// Counts the in-bounds cells of the 3×3 neighbourhood (the cell
    /// itself included) and how many of them exceed [`TOUCH_THRESHOLD`].
    /// True iff some but not all of them do. Off-lattice cells are
    /// never on the front.
    pub fn is_wavefront(lattice: &Lattice2D, x: i32, y: i32) -> bool {
        front_excluding(lattice, x, y, |_, _| false)
    }

    /// Advance the shadow one step, then clear the real lattice along
    /// the new wavefront.
    pub fn propagate(&mut self, real: &mut Lattice2D) {
        self.shadow.propagate();

        for (latch, &v) in self
            .touched
            .as_mut_slice()
            .iter_mut()
            .zip(self.shadow.padded().as_slice())
        {
            if v.abs() > TOUCH_THRESHOLD {
                *latch = 1.0;
            }
        }

        self.front.clear();
        let shadow = &self.shadow;
        let (pw, ph) = self.touched.dimensions();
        for j in 0..ph as i32 {
            for i in 0..pw as i32 {
                if front_excluding(&self.touched, i, j, |x, y| shadow.is_held(x, y)) {
                    self.front.push((i, j));
                }
            }
        }

        let dx = self.shadow.damp_x() as i32;
        let dy = self.shadow.damp_y() as i32;
        for &(i, j) in &self.front {
            real.set_value(i - dx, j - dy, self.untouched_value);
        }
        self.num_steps += 1;
    }

    /// The shadow propagator.
    pub fn shadow(&self) -> &WavePropagator {
        &self.shadow
    }

    /// Mutable shadow, e.g. to register potentials mirroring the primary's.
    pub fn shadow_mut(&mut self) -> &mut WavePropagator {
        &mut self.shadow
    }

    /// Padded latch: 1.0 where the shadow has been reached, else 0.0.
    pub fn touched(&self) -> &Lattice2D {
        &self.touched
    }

    /// Padded cells classified as wavefront on the last step.
    pub fn wavefront_cells(&self) -> usize {
        self.front.len()
    }

    /// Completed `propagate()` calls since construction or [`clear`](Self::clear).
    pub fn num_steps(&self) -> u64 {
        self.num_steps
    }

    /// Reset the shadow field and the touched latch.
    pub fn clear(&mut self) {
        self.shadow.clear();
        self.touched.clear();
        self.front.clear();
        self.num_steps = 0;
    }
}

/// Wavefront test that ignores cells for which `held` is true. A held
/// cell is never on the front itself.
fn front_excluding(
    lattice: &Lattice2D,
    x: i32,
    y: i32,
    held: impl Fn(i32, i32) -> bool,
) -> bool {
    if !lattice.contains(x, y) || held(x, y) {
        return false;
    }
    let Some(window) = Window::chebyshev(x, y, 1, lattice.width(), lattice.height()) else {
        return false;
    };
    let mut checked = 0;
    let mut passed = 0;
    for (cx, cy) in window.cells().filter(|&(cx, cy)| !held(cx, cy)) {
        checked += 1;
        if lattice.value(cx, cy).abs() > TOUCH_THRESHOLD {
            passed += 1;
        }
    }
    passed > 0 && passed < checked
}

impl SourceWriter for DarkPropagator {
    fn dimensions(&self) -> (u32, u32) {
        self.shadow.lattice().dimensions()
    }

    fn is_valid_point(&self, x: i32, y: i32) -> bool {
        self.shadow.is_valid_point(x, y)
    }

    fn set_source_value(&mut self, x: i32, y: i32, value: f32) {
        self.shadow.set_source_value(x, y, value)
    }
}
