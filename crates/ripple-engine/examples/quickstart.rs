//! Ripple Quickstart: a double-slit experiment from scratch.
//!
//! Demonstrates:
//!   1. Building a SimulationConfig with a double-slit barrier
//!   2. Adding a continuous oscillator and stepping the simulation
//!   3. Reading the lattice and per-tick metrics
//!   4. Firing a one-shot pulse after a reset
//!
//! Run with:
//!   cargo run --example quickstart

use ripple_engine::{BarrierConfig, SimulationConfig, WaveSimulation};
use ripple_propagator::BarrierStyle;
use ripple_source::Oscillator;

// ─── Lattice parameters ─────────────────────────────────────────

const WIDTH: u32 = 96;
const HEIGHT: u32 = 64;
const BARRIER_X: f32 = 40.0;

/// Render one row of the lattice as a strip of characters.
fn row_strip(sim: &WaveSimulation, y: i32) -> String {
    const RAMP: &[u8] = b" .:-=+*#%@";
    (0..WIDTH as i32)
        .map(|x| {
            let v = sim.lattice().value(x, y).abs().min(1.0);
            RAMP[(v * (RAMP.len() - 1) as f32).round() as usize] as char
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Ripple Quickstart ===\n");

    let config = SimulationConfig {
        width: WIDTH,
        height: HEIGHT,
        dark_wave: true,
        barrier: BarrierConfig {
            style: BarrierStyle::DoubleSlit,
            x: BARRIER_X,
            thickness: 2.0,
            slit_width: 4.0,
            slit_separation: 16.0,
            unit_scale: 1.0,
        },
        ..SimulationConfig::default()
    };
    let mut sim = WaveSimulation::new(config)?;
    for (i, p) in sim.barrier().potentials().iter().enumerate() {
        println!(
            "barrier region {i}: y={} height={} enabled={}",
            p.y(),
            p.height(),
            p.is_enabled()
        );
    }

    let mut source = Oscillator::new(12.0, HEIGHT as f32 / 2.0, 1.0, 0.08, 1.0);
    source.set_enabled(true);
    sim.add_oscillator("source", source)?;

    println!("\nRunning {} ticks...", 150);
    for _ in 0..150 {
        let m = sim.step().clone();
        if sim.tick().0 % 30 == 0 {
            println!(
                "  tick {:>4}: max |v| = {:.4}, Σ|v| = {:>8.2}, front = {:>4} cells, {} us",
                sim.tick(),
                m.max_abs,
                m.sum_abs,
                m.wavefront_cells,
                m.total_us
            );
        }
    }

    println!("\nRow y={} after {} ticks:", HEIGHT / 2, sim.tick());
    println!("|{}|", row_strip(&sim, HEIGHT as i32 / 2));

    println!("\nReset and fire a pulse...");
    sim.reset();
    if let Some(duration) = sim.fire_pulse("source")? {
        println!("  pulse lasts {duration:.2} s");
    }
    let m = sim.run(60);
    println!("  after 60 ticks: max |v| = {:.4}", m.max_abs);
    println!(
        "  source enabled: {}",
        sim.oscillator("source").map(|o| o.enabled()).unwrap_or(false)
    );

    Ok(())
}
