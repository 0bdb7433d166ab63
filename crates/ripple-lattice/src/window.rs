//! Square neighbourhoods clipped to lattice bounds.

/// An inclusive rectangle of cells, already clipped to a lattice.
///
/// Produced by [`Window::chebyshev`] for the `(2r+1)²` neighbourhood of
/// a cell. Windows never contain out-of-bounds cells, so callers can
/// index without further checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    x0: i32,
    x1: i32,
    y0: i32,
    y1: i32,
}

// Empty windows are never constructed, so `len` has no `is_empty` twin.
#[allow(clippy::len_without_is_empty)]
impl Window {
    /// Cells within Chebyshev distance `radius` of `(x, y)`, clipped to
    /// a `width x height` lattice.
    ///
    /// Returns `None` when the clipped window is empty, i.e. the
    /// neighbourhood lies entirely off the lattice.
    pub fn chebyshev(x: i32, y: i32, radius: u32, width: u32, height: u32) -> Option<Self> {
        let r = i64::from(radius);
        let x0 = (i64::from(x) - r).max(0);
        let y0 = (i64::from(y) - r).max(0);
        let x1 = (i64::from(x) + r).min(i64::from(width) - 1);
        let y1 = (i64::from(y) + r).min(i64::from(height) - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        // All four bounds now lie in [0, dim), and dims fit i32.
        Some(Self {
            x0: x0 as i32,
            x1: x1 as i32,
            y0: y0 as i32,
            y1: y1 as i32,
        })
    }

    /// Number of cells in the window.
    pub fn len(&self) -> usize {
        ((self.x1 - self.x0 + 1) as usize) * ((self.y1 - self.y0 + 1) as usize)
    }

    /// Iterate `(x, y)` over the window in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.y0..=self.y1).flat_map(move |y| (self.x0..=self.x1).map(move |x| (x, y)))
    }
}
