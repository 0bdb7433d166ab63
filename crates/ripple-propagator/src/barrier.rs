//! Slit barriers assembled from three potential regions.
//!
//! A barrier is a vertical wall at a fixed x position, split into
//! bottom, middle, and top regions along y. Depending on the
//! [`BarrierStyle`] zero, one, or two gaps (slits) are left open:
//!
//! ```text
//!  y = height ┌───┐
//!             │top│
//!             └───┘  ← slit
//!             ┌───┐
//!             │mid│  (double slit only)
//!             └───┘  ← slit
//!             ┌───┐
//!             │bot│
//!  y = 0      └───┘
//! ```

use log::debug;
use ripple_core::PotentialId;

use crate::potential::Potential;
use crate::propagator::WavePropagator;

/// Barrier layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BarrierStyle {
    /// No barrier; all regions disabled.
    #[default]
    None = 0,
    /// One centred slit between the bottom and top regions.
    SingleSlit = 1,
    /// Two slits either side of a middle region.
    DoubleSlit = 2,
}

impl TryFrom<u8> for BarrierStyle {
    type Error = u8;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::None),
            1 => Ok(Self::SingleSlit),
            2 => Ok(Self::DoubleSlit),
            other => Err(other),
        }
    }
}

/// The potential ids a barrier occupies on one propagator, in
/// `[top, middle, bottom]` order. Returned by [`Barrier::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrierSlots([PotentialId; 3]);

impl BarrierSlots {
    /// The three ids, `[top, middle, bottom]`.
    pub fn ids(&self) -> [PotentialId; 3] {
        self.0
    }
}

/// A wall with up to two slits, built from three [`Potential`]s.
///
/// Positions and lengths passed to the barrier are in model units and
/// converted to lattice cells by `unit_scale` (1 by default). Every call
/// to [`configure`](Self::configure) recomputes all three regions from
/// scratch.
#[derive(Clone, Debug, PartialEq)]
pub struct Barrier {
    x: f32,
    thickness: f32,
    unit_scale: f32,
    style: BarrierStyle,
    top: Potential,
    middle: Potential,
    bottom: Potential,
}

impl Barrier {
    /// A barrier at `x` with the given wall thickness, in lattice cells.
    pub fn new(x: f32, thickness: f32) -> Self {
        Self::with_unit_scale(x, thickness, 1.0)
    }

    /// A barrier whose inputs are in model units; `unit_scale` is the
    /// number of lattice cells per model unit.
    pub fn with_unit_scale(x: f32, thickness: f32, unit_scale: f32) -> Self {
        Self {
            x,
            thickness,
            unit_scale,
            style: BarrierStyle::None,
            top: Potential::disabled(),
            middle: Potential::disabled(),
            bottom: Potential::disabled(),
        }
    }

    /// Current layout.
    pub fn style(&self) -> BarrierStyle {
        self.style
    }

    /// Wall position in model units.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Region above the upper slit.
    pub fn top(&self) -> &Potential {
        &self.top
    }

    /// Region between the slits (double slit only).
    pub fn middle(&self) -> &Potential {
        &self.middle
    }

    /// Region below the lower slit.
    pub fn bottom(&self) -> &Potential {
        &self.bottom
    }

    /// All three regions, `[top, middle, bottom]`.
    pub fn potentials(&self) -> [Potential; 3] {
        [self.top, self.middle, self.bottom]
    }

    /// Recompute the three regions for a lattice `lattice_height` cells tall.
    ///
    /// `slit_width` and `slit_separation` (centre to centre) are in model
    /// units.
    pub fn configure(
        &mut self,
        style: BarrierStyle,
        lattice_height: u32,
        slit_width: f32,
        slit_separation: f32,
    ) {
        let h = lattice_height as f32;
        let sw = slit_width * self.unit_scale;
        let sep = slit_separation * self.unit_scale;
        let x = self.x * self.unit_scale;
        let thick = self.thickness * self.unit_scale;

        self.style = style;
        self.top = Potential::disabled();
        self.middle = Potential::disabled();
        self.bottom = Potential::disabled();

        match style {
            BarrierStyle::None => {}
            BarrierStyle::SingleSlit => {
                let slit_center = (h / 2.0).round();
                let box_height = (slit_center - (sw / 2.0).round()).max(0.0);
                self.bottom = Potential::new(x, 0.0, thick, box_height);
                self.top = Potential::new(x, h - box_height, thick, box_height);
            }
            BarrierStyle::DoubleSlit => {
                let middle_height = (sep - sw).max(1.0);
                let end_height = (h / 2.0 - middle_height / 2.0 - sw).max(0.0);
                let middle_y = end_height + sw;
                self.bottom = Potential::new(x, 0.0, thick, end_height);
                self.middle = Potential::new(x, middle_y, thick, middle_height);
                self.top = Potential::new(x, middle_y + middle_height + sw, thick, end_height);
            }
        }

        debug!(
            "barrier {style:?} at x={x} height={lattice_height} slit_width={sw} separation={sep}: \
             bottom {}+{} middle {}+{} top {}+{}",
            self.bottom.y(),
            self.bottom.height(),
            self.middle.y(),
            self.middle.height(),
            self.top.y(),
            self.top.height()
        );
    }

    /// Move the wall to `x` (model units), keeping its current layout.
    pub fn set_x(&mut self, x: f32) {
        self.x = x;
        let cells = x * self.unit_scale;
        for p in [&mut self.top, &mut self.middle, &mut self.bottom] {
            p.set_x(cells);
        }
    }

    /// Register the three regions on `propagator`.
    ///
    /// Call once per propagator; keep the returned slots and use
    /// [`apply`](Self::apply) after later reconfiguration.
    pub fn register(&self, propagator: &mut WavePropagator) -> BarrierSlots {
        BarrierSlots(self.potentials().map(|p| propagator.add_potential(p)))
    }

    /// Overwrite previously registered slots with the current geometry.
    pub fn apply(&self, propagator: &mut WavePropagator, slots: BarrierSlots) {
        for (id, p) in slots.0.into_iter().zip(self.potentials()) {
            if let Some(slot) = propagator.potential_mut(id) {
                *slot = p;
            }
        }
    }
}
