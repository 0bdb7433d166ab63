//! Dark-wave tracking: the real lattice is cleared along the front.

use ripple_engine::{BarrierConfig, SimulationConfig, WaveSimulation};
use ripple_propagator::BarrierStyle;
use ripple_source::Oscillator;

const SENTINEL: f32 = -1.0;

fn dark_sim(dark_wave: bool) -> WaveSimulation {
    let mut sim = WaveSimulation::new(SimulationConfig {
        width: 41,
        height: 41,
        damp_x: 4,
        damp_y: 4,
        dark_wave,
        untouched_value: SENTINEL,
        ..SimulationConfig::default()
    })
    .unwrap();
    let mut source = Oscillator::new(20.0, 20.0, 0.0, 0.1, 1.0);
    source.set_enabled(true);
    sim.add_oscillator("source", source).unwrap();
    sim
}

#[test]
fn front_cells_carry_the_sentinel() {
    let mut sim = dark_sim(true);
    sim.run(10);
    let l = sim.lattice();
    // After 10 ticks the reached region is the Manhattan diamond of radius 10.
    assert_eq!(l.value(30, 20), SENTINEL);
    assert_eq!(l.value(31, 20), SENTINEL);
    // Beyond the front: untouched and never cleared.
    assert_eq!(l.value(32, 20), 0.0);
    // Behind the front: the computed field.
    assert!((l.value(20, 20) - 0.809_017).abs() < 1e-5);
    assert!(sim.last_metrics().wavefront_cells > 0);
}

#[test]
fn dark_wave_only_changes_front_cells() {
    let mut plain = dark_sim(false);
    let mut dark = dark_sim(true);
    plain.run(10);
    dark.run(10);
    for y in 0..41 {
        for x in 0..41 {
            let d = dark.lattice().value(x, y);
            if d != SENTINEL {
                assert_eq!(d, plain.lattice().value(x, y), "({x},{y})");
            }
        }
    }
}

#[test]
fn front_cells_grow_as_the_wave_spreads() {
    let mut sim = dark_sim(true);
    sim.step();
    let early = sim.last_metrics().wavefront_cells;
    sim.run(9);
    assert!(sim.last_metrics().wavefront_cells > early);
    assert_eq!(
        sim.dark().unwrap().num_steps(),
        sim.propagator().num_steps()
    );
}

fn slit_sim(dark_wave: bool) -> WaveSimulation {
    let mut sim = WaveSimulation::new(SimulationConfig {
        width: 60,
        height: 60,
        damp_x: 8,
        damp_y: 8,
        dark_wave,
        untouched_value: SENTINEL,
        barrier: BarrierConfig {
            style: BarrierStyle::SingleSlit,
            x: 30.0,
            thickness: 2.0,
            slit_width: 6.0,
            ..BarrierConfig::default()
        },
        ..SimulationConfig::default()
    })
    .unwrap();
    let mut source = Oscillator::new(10.0, 30.0, 0.0, 0.1, 1.0);
    source.set_enabled(true);
    sim.add_oscillator("source", source).unwrap();
    sim
}

#[test]
fn barrier_cells_never_carry_the_sentinel() {
    let mut sim = slit_sim(true);
    for _ in 0..120 {
        sim.step();
        for y in (0..27).chain(33..60) {
            for x in 30..32 {
                assert_eq!(sim.lattice().value(x, y), 0.0, "wall ({x},{y})");
            }
        }
    }
}

#[test]
fn reached_cells_beside_a_barrier_are_not_cleared() {
    let mut plain = slit_sim(false);
    let mut dark = slit_sim(true);
    plain.run(300);
    dark.run(300);

    // Long after the front has swept the lattice nothing is cleared,
    // including the column flush against the wall.
    for y in 0..60 {
        for x in 0..60 {
            assert_ne!(dark.lattice().value(x, y), SENTINEL, "({x},{y})");
        }
        assert_eq!(dark.lattice().value(29, y), plain.lattice().value(29, y));
    }
    assert_eq!(dark.last_metrics().wavefront_cells, 0);
}
