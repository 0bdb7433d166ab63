//! Rectangular regions that block propagation.

/// An axis-aligned rectangle of visible-lattice cells.
///
/// `(x, y)` is the corner with the smallest coordinates; the region
/// covers cells `x <= cx < x + width` and `y <= cy < y + height`.
/// Geometry is fractional so that barriers can be laid out in model
/// units before conversion to cells.
///
/// An enabled potential is a hard zero-amplitude zone: cells inside it
/// are forced to 0 every step. A disabled potential has no effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Potential {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    enabled: bool,
}

impl Default for Potential {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Potential {
    /// An enabled region.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            enabled: true,
        }
    }

    /// An empty, disabled region.
    pub fn disabled() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            enabled: false,
        }
    }

    /// Left edge.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Top edge (smallest row).
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Extent along x.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Extent along y.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Whether this region currently blocks propagation.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the region.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Move the region horizontally.
    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    /// Replace the whole geometry at once.
    pub fn set_bounds(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
    }

    /// Whether cell `(x, y)` lies inside the rectangle, enabled or not.
    #[inline]
    pub fn contains_cell(&self, x: i32, y: i32) -> bool {
        let (cx, cy) = (x as f32, y as f32);
        cx >= self.x && cx < self.x + self.width && cy >= self.y && cy < self.y + self.height
    }

    /// Multiplier applied to cells inside the region: 0 when enabled, 1 otherwise.
    #[inline]
    pub fn attenuation_factor(&self) -> f32 {
        if self.enabled {
            0.0
        } else {
            1.0
        }
    }

    /// Whether the region covers any cell of a `width x height` lattice.
    pub fn intersects(&self, width: u32, height: u32) -> bool {
        let x0 = self.x.ceil().max(0.0);
        let y0 = self.y.ceil().max(0.0);
        let x_end = (self.x + self.width).min(width as f32);
        let y_end = (self.y + self.height).min(height as f32);
        x0 < x_end && y0 < y_end
    }
}
