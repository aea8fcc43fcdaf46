use std::time::Instant;

use crate::simulation::cloth::ClothSimulator;
use crate::simulation::states::NVec3;
use crate::simulation::params::Parameters;

/// Helper to build parameters for a square `size` x `size` fabric
fn make_params(size: usize) -> Parameters {
    Parameters {
        rows: size,
        cols: size,
        dx: 0.25,
        dt: 0.001,
        short_spring: 400.0,
        long_spring: 150.0,
        short_damp: 2.0,
        long_damp: 1.0,
        mass: 0.5,
        gravity: -9.81,
        wind_influence: 0.8,
    }
}

/// Time a full physics step across a range of grid sizes
pub fn bench_step() {
    // Different grid sizes to test
    let sizes = [16, 32, 64, 128, 256];
    let steps = 50;

    for size in sizes {
        let params = make_params(size);
        let dt = params.dt;
        let wind = NVec3::new(4.0, 0.0, 1.5);

        let mut sim = ClothSimulator::new(params).expect("bench parameters are valid");

        // Warm up: feeding exactly dt forces one step per call
        sim.update(dt, wind);

        let t0 = Instant::now();
        for _ in 0..steps {
            sim.update(dt, wind);
        }
        let per_step = t0.elapsed().as_secs_f64() / steps as f64;

        println!(
            "grid = {size:4} x {size:4}, vertices = {:7}, step = {:8.6} s",
            sim.vertex_count(),
            per_step
        );
    }
}

/// Benchmark the step time over a smooth range of sizes
/// Paste output directly into a spreadsheet to graph
pub fn bench_step_curve() {
    println!("n,vertices,step_ms");

    for size in (16..=256).step_by(16) {
        // Small grids: average over more steps to smooth noise
        let steps = if size <= 64 { 200 } else { 20 };

        let params = make_params(size);
        let dt = params.dt;
        let wind = NVec3::new(4.0, 0.0, 1.5);

        let mut sim = ClothSimulator::new(params).expect("bench parameters are valid");

        // Warm-up one step
        sim.update(dt, wind);

        let t0 = Instant::now();
        for _ in 0..steps {
            sim.update(dt, wind);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{},{:.6}", size, sim.vertex_count(), ms);
    }
}
