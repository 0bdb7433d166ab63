//! Fixed-size 2D grid of scalar amplitudes.

use crate::window::Window;
use ripple_core::LatticeError;

/// A two-dimensional lattice of `f32` amplitudes.
///
/// Cell `(x, y)` is column `x`, row `y`, with `0 <= x < width` and
/// `0 <= y < height`. Storage is row-major. The lattice is never resized
/// after construction.
///
/// Access is bounds-safe rather than bounds-checked: reading outside
/// the lattice returns `0.0` and writing outside it does nothing. This
/// keeps stencil loops near the edges free of special cases.
///
/// `Clone` is a deep copy; a clone shares nothing with its original.
#[derive(Clone, Debug, PartialEq)]
pub struct Lattice2D {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Lattice2D {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a `width x height` lattice with every cell set to `initial`.
    ///
    /// Returns `Err(LatticeError::InvalidDimensions)` if either
    /// dimension is 0, exceeds [`MAX_DIM`](Self::MAX_DIM), or the cell
    /// count overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ripple_lattice::Lattice2D;
    ///
    /// let mut lattice = Lattice2D::new(4, 3, 0.0).unwrap();
    /// lattice.set_value(1, 2, 0.5);
    /// assert_eq!(lattice.value(1, 2), 0.5);
    ///
    /// // Out-of-bounds access is a no-op / zero read.
    /// lattice.set_value(-1, 0, 9.0);
    /// assert_eq!(lattice.value(-1, 0), 0.0);
    /// ```
    pub fn new(width: u32, height: u32, initial: f32) -> Result<Self, LatticeError> {
        let invalid = LatticeError::InvalidDimensions { width, height };
        if width == 0 || height == 0 || width > Self::MAX_DIM || height > Self::MAX_DIM {
            return Err(invalid);
        }
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(invalid)?;
        Ok(Self {
            width,
            height,
            data: vec![initial; count],
        })
    }

    /// Create a lattice filled with zeros.
    pub fn zeros(width: u32, height: u32) -> Result<Self, LatticeError> {
        Self::new(width, height, 0.0)
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.data.len()
    }

    /// Whether `(x, y)` lies on the lattice.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Cell value, or `0.0` outside the lattice.
    #[inline]
    pub fn value(&self, x: i32, y: i32) -> f32 {
        self.index(x, y).map_or(0.0, |i| self.data[i])
    }

    /// Overwrite a cell. Ignored outside the lattice.
    #[inline]
    pub fn set_value(&mut self, x: i32, y: i32, value: f32) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = value;
        }
    }

    /// Overwrite this lattice in place from `other`.
    ///
    /// Dimensions of `self` never change. When the sizes differ only the
    /// overlapping top-left region is copied; the rest of `self` keeps
    /// its values.
    pub fn copy_from(&mut self, other: &Lattice2D) {
        if self.dimensions() == other.dimensions() {
            self.data.copy_from_slice(&other.data);
            return;
        }
        let w = self.width.min(other.width) as usize;
        let h = self.height.min(other.height) as usize;
        for y in 0..h {
            let dst = y * self.width as usize;
            let src = y * other.width as usize;
            self.data[dst..dst + w].copy_from_slice(&other.data[src..src + w]);
        }
    }

    /// Copy a `width x height` block from `source` into `self`.
    ///
    /// The block starts at `(src_x, src_y)` in `source` and lands at
    /// `(dst_x, dst_y)` in `self`. Cells falling outside either lattice
    /// are skipped, so offsets may be negative. Used to move between a
    /// padded working lattice and the visible lattice it surrounds.
    #[allow(clippy::too_many_arguments)]
    pub fn copy_area(
        &mut self,
        source: &Lattice2D,
        width: u32,
        height: u32,
        src_x: i32,
        src_y: i32,
        dst_x: i32,
        dst_y: i32,
    ) {
        // Clip the block against both lattices once, then copy row slices.
        let lo_x = 0i64.max(-i64::from(src_x)).max(-i64::from(dst_x));
        let lo_y = 0i64.max(-i64::from(src_y)).max(-i64::from(dst_y));
        let hi_x = i64::from(width)
            .min(i64::from(source.width) - i64::from(src_x))
            .min(i64::from(self.width) - i64::from(dst_x));
        let hi_y = i64::from(height)
            .min(i64::from(source.height) - i64::from(src_y))
            .min(i64::from(self.height) - i64::from(dst_y));
        if lo_x >= hi_x || lo_y >= hi_y {
            return;
        }
        let run = (hi_x - lo_x) as usize;
        for j in lo_y..hi_y {
            let sy = (i64::from(src_y) + j) as usize;
            let dy = (i64::from(dst_y) + j) as usize;
            let sx = (i64::from(src_x) + lo_x) as usize;
            let dx = (i64::from(dst_x) + lo_x) as usize;
            let s = sy * source.width as usize + sx;
            let d = dy * self.width as usize + dx;
            self.data[d..d + run].copy_from_slice(&source.data[s..s + run]);
        }
    }

    /// Mean of all cells within Chebyshev distance `radius` of `(x, y)`.
    ///
    /// The `(2r+1)²` square is clipped to the lattice; only in-bounds
    /// cells count toward the mean. Returns `0.0` if no cell of the
    /// square is on the lattice.
    pub fn avg(&self, x: i32, y: i32, radius: u32) -> f32 {
        let Some(window) = Window::chebyshev(x, y, radius, self.width, self.height) else {
            return 0.0;
        };
        // Accumulate in f64 so a constant field averages back exactly.
        let sum: f64 = window
            .cells()
            .map(|(cx, cy)| f64::from(self.value(cx, cy)))
            .sum();
        (sum / window.len() as f64) as f32
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Set every cell to zero.
    pub fn clear(&mut self) {
        self.fill(0.0);
    }

    /// Multiply every cell by `factor`.
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.data {
            *v *= factor;
        }
    }

    /// Sum of absolute cell values.
    pub fn sum_abs(&self) -> f64 {
        self.data.iter().map(|v| f64::from(v.abs())).sum()
    }

    /// Largest absolute cell value.
    pub fn max_abs(&self) -> f32 {
        self.data.iter().fold(0.0f32, |m, v| m.max(v.abs()))
    }

    /// Row-major cell data.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable row-major cell data.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}
