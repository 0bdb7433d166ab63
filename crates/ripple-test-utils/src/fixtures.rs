//! Lattice fixtures.
//!
//! - [`constant`]: every cell holds the same value.
//! - [`disk`]: a filled disk on a zero background.
//! - [`random_lattice`]: seeded uniform noise, reproducible across runs.

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ripple_lattice::Lattice2D;

/// A `width x height` lattice filled with `value`.
///
/// # Panics
///
/// On invalid dimensions.
pub fn constant(width: u32, height: u32, value: f32) -> Lattice2D {
    Lattice2D::new(width, height, value).expect("fixture dimensions must be valid")
}

/// A zero lattice with `value` on every cell within Euclidean distance
/// `radius` of `(cx, cy)`.
pub fn disk(width: u32, height: u32, cx: i32, cy: i32, radius: f32, value: f32) -> Lattice2D {
    let mut l = constant(width, height, 0.0);
    let r2 = radius * radius;
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let (dx, dy) = ((x - cx) as f32, (y - cy) as f32);
            if dx * dx + dy * dy <= r2 {
                l.set_value(x, y, value);
            }
        }
    }
    l
}

/// Uniform values in `[-amplitude, amplitude)` from a ChaCha8 stream
/// seeded with `seed`.
pub fn random_lattice(width: u32, height: u32, amplitude: f32, seed: u64) -> Lattice2D {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut l = constant(width, height, 0.0);
    for v in l.as_mut_slice() {
        // 24 random bits give every representable f32 step in [0, 1).
        let unit = (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32;
        *v = (2.0 * unit - 1.0) * amplitude;
    }
    l
}
