use fabsim::{Scenario, ScenarioConfig};
use fabsim::{bench_step, bench_step_curve};

use clap::Parser;
use anyhow::Result;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "flag.yaml")]
    file_name: String,

    /// Run the step benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,

    /// Emit the benchmark curve as CSV (implies --bench)
    #[arg(long)]
    bench_curve: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

/// Drive the simulator headlessly: feed it the configured frame time until
/// `t_end`, printing a probe line once per simulated second
fn run_headless(scenario: &mut Scenario) {
    let sim = &mut scenario.simulator;

    // Probe the centre vertex so something visible tracks the motion
    let probe = (sim.row_count() / 2) * sim.column_count() + sim.column_count() / 2;
    let frames_per_probe = (1.0 / scenario.frame_dt).max(1.0) as u64;

    println!(
        "fabric: {} x {} vertices, {} triangles, {:.2} x {:.2} extent",
        sim.row_count(),
        sim.column_count(),
        sim.triangle_count(),
        sim.width(),
        sim.depth()
    );

    let mut t = 0.0;
    let mut frames: u64 = 0;
    while t < scenario.t_end {
        sim.update(scenario.frame_dt, scenario.wind);
        t += scenario.frame_dt;
        frames += 1;

        if frames % frames_per_probe == 0 {
            let p = sim.position(probe);
            let n = sim.normal(probe);
            println!(
                "t = {t:6.2} s, centre = ({:8.4}, {:8.4}, {:8.4}), normal.y = {:6.3}",
                p.x, p.y, p.z, n.y
            );
        }
    }

    println!("done: {frames} frames driven");
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench_curve {
        bench_step_curve();
        return Ok(());
    }
    if args.bench {
        bench_step();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;
    run_headless(&mut scenario);

    Ok(())
}
