//! Capability traits shared across the workspace.

/// Narrow write capability handed to wave sources.
///
/// A source never sees the propagator or the simulation that owns it;
/// it only needs to know which cells exist and how to drive one.
/// Coordinates are visible-lattice cells (`x` is the column, `y` the row).
pub trait SourceWriter {
    /// Visible lattice size, `(width, height)`.
    fn dimensions(&self) -> (u32, u32);

    /// Whether `(x, y)` lies on the visible lattice.
    fn is_valid_point(&self, x: i32, y: i32) -> bool;

    /// Drive cell `(x, y)` to `value` for the coming step.
    ///
    /// A driven cell bypasses the wave-equation update on the next
    /// propagation step: the source sets the field rather than being
    /// derived from it. Out-of-bounds writes are ignored.
    fn set_source_value(&mut self, x: i32, y: i32, value: f32);
}

impl<W: SourceWriter + ?Sized> SourceWriter for &mut W {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn is_valid_point(&self, x: i32, y: i32) -> bool {
        (**self).is_valid_point(x, y)
    }

    fn set_source_value(&mut self, x: i32, y: i32, value: f32) {
        (**self).set_source_value(x, y, value)
    }
}
