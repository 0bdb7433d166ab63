//! Absorbing boundary: per-cell attenuation inside the padding margin.
//!
//! A margin cell's depth is its distance past the visible edge divided
//! by the margin width, so `d` runs from just above 0 next to the
//! visible lattice to 1 at the outer ring. Each step the freshly
//! computed value there is multiplied by `1 - strength * profile(d)`.

/// Shape of the attenuation curve across the margin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DampingProfile {
    /// `profile(d) = d`.
    Linear,
    /// `profile(d) = 3d² - 2d³`. Eases in from the visible edge, which
    /// reflects less than a linear ramp.
    #[default]
    Smoothstep,
}

impl DampingProfile {
    /// Weight in `[0, 1]` for a normalised depth `d` in `[0, 1]`.
    #[inline]
    pub fn weight(self, d: f32) -> f32 {
        let d = d.clamp(0.0, 1.0);
        match self {
            Self::Linear => d,
            Self::Smoothstep => d * d * (3.0 - 2.0 * d),
        }
    }
}

/// Boundary damping configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DampingConfig {
    /// Attenuation curve across the margin.
    pub profile: DampingProfile,
    /// Fraction removed per step at the outer ring, in `[0, 1]`.
    pub strength: f32,
}

impl Default for DampingConfig {
    fn default() -> Self {
        Self {
            profile: DampingProfile::Smoothstep,
            strength: 0.5,
        }
    }
}

impl DampingConfig {
    /// Check that `strength` is finite and within `[0, 1]`.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(format!(
                "damping strength must be within [0, 1], got {}",
                self.strength
            ));
        }
        Ok(())
    }

    /// Multiplier for every cell of a padded lattice, row-major.
    ///
    /// `width x height` is the visible lattice; the padded lattice adds
    /// `damp_x` columns and `damp_y` rows on each side. Visible cells get
    /// exactly `1.0`.
    pub(crate) fn margin_factors(
        &self,
        width: u32,
        height: u32,
        damp_x: u32,
        damp_y: u32,
    ) -> Vec<f32> {
        let pw = width + 2 * damp_x;
        let ph = height + 2 * damp_y;
        let mut out = Vec::with_capacity(pw as usize * ph as usize);
        for j in 0..ph {
            let dy = depth(j, height, damp_y);
            for i in 0..pw {
                let dx = depth(i, width, damp_x);
                let d = dx.max(dy);
                out.push(1.0 - self.strength * self.profile.weight(d));
            }
        }
        out
    }
}

/// Normalised depth of padded index `p` into a margin of `margin` cells
/// on either side of a visible span of `len` cells.
fn depth(p: u32, len: u32, margin: u32) -> f32 {
    if p < margin {
        (margin - p) as f32 / margin as f32
    } else if p >= margin + len {
        (p - (margin + len - 1)) as f32 / margin as f32
    } else {
        0.0
    }
}
