//! Test utilities and mock types for Ripple development.
//!
//! Provides lattice [`fixtures`], a [`RecordingWriter`] mock of
//! [`SourceWriter`], and helpers for driving and measuring a field.
//!
//! Depends only on `ripple-core` and `ripple-lattice` so that every
//! other crate can take it as a dev-dependency.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{constant, disk, random_lattice};

use std::f32::consts::TAU;

use ripple_core::SourceWriter;

/// Mock [`SourceWriter`] over a `width x height` lattice.
///
/// Records every in-bounds write in call order; out-of-bounds writes are
/// dropped like the real propagator does.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub width: i32,
    pub height: i32,
    pub writes: Vec<(i32, i32, f32)>,
}

impl RecordingWriter {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            writes: Vec::new(),
        }
    }

    /// Distinct cells written so far, sorted.
    pub fn cells(&self) -> Vec<(i32, i32)> {
        let mut cells: Vec<_> = self.writes.iter().map(|&(x, y, _)| (x, y)).collect();
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// The most recent value written to `(x, y)`.
    pub fn last_value(&self, x: i32, y: i32) -> Option<f32> {
        self.writes
            .iter()
            .rev()
            .find(|&&(wx, wy, _)| (wx, wy) == (x, y))
            .map(|&(_, _, v)| v)
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl SourceWriter for RecordingWriter {
    fn dimensions(&self) -> (u32, u32) {
        (self.width.max(0) as u32, self.height.max(0) as u32)
    }

    fn is_valid_point(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn set_source_value(&mut self, x: i32, y: i32, value: f32) {
        if self.is_valid_point(x, y) {
            self.writes.push((x, y, value));
        }
    }
}

/// Drive `(x, y)` with `cos(2π·freq·t)` for `ticks` steps, calling
/// `step` after each write.
pub fn drive_point<W: SourceWriter>(
    writer: &mut W,
    x: i32,
    y: i32,
    freq: f32,
    ticks: u32,
    mut step: impl FnMut(&mut W),
) {
    for t in 0..ticks {
        writer.set_source_value(x, y, (TAU * freq * t as f32).cos());
        step(writer);
    }
}

/// Maximum of each consecutive `window`-sized chunk of `values`.
///
/// The last chunk may be shorter.
pub fn window_max(values: &[f64], window: usize) -> Vec<f64> {
    values
        .chunks(window.max(1))
        .map(|c| c.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        .collect()
}
