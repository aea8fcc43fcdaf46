//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - a validated, constructed [`ClothSimulator`]
//! - the wind vector fed into every update
//! - driver settings (caller frame time, total driven time)
//!
//! The headless runner in `main` consumes this bundle; a renderer would
//! read positions/normals back from the simulator the same way.

use anyhow::{ensure, Context, Result};

use crate::configuration::config::ScenarioConfig;
use crate::simulation::cloth::ClothSimulator;
use crate::simulation::params::Parameters;
use crate::simulation::states::NVec3;

/// Fully-initialized runtime scenario
pub struct Scenario {
    pub simulator: ClothSimulator,
    pub wind: NVec3, // wind vector passed to every update call
    pub frame_dt: f64, // caller frame time per update call
    pub t_end: f64, // total driven time
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        // Parameters (runtime) from GridConfig + ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            rows: cfg.grid.rows,
            cols: cfg.grid.cols,
            dx: p_cfg.dx,
            dt: p_cfg.dt,
            short_spring: p_cfg.short_spring,
            long_spring: p_cfg.long_spring,
            short_damp: p_cfg.short_damp,
            long_damp: p_cfg.long_damp,
            mass: p_cfg.mass,
            gravity: p_cfg.gravity,
            wind_influence: p_cfg.wind_influence,
        };

        // Simulator: validates parameters and builds the initial sheet
        let simulator =
            ClothSimulator::new(parameters).context("invalid scenario parameters")?;

        // Driver settings
        let r_cfg = cfg.run;
        ensure!(
            r_cfg.wind.len() == 3,
            "run.wind must have exactly 3 components, got {}",
            r_cfg.wind.len()
        );
        ensure!(
            r_cfg.frame_dt > 0.0 && r_cfg.frame_dt.is_finite(),
            "run.frame_dt must be finite and positive, got {}",
            r_cfg.frame_dt
        );
        ensure!(
            r_cfg.t_end >= 0.0 && r_cfg.t_end.is_finite(),
            "run.t_end must be finite and non-negative, got {}",
            r_cfg.t_end
        );

        Ok(Self {
            simulator,
            wind: NVec3::new(r_cfg.wind[0], r_cfg.wind[1], r_cfg.wind[2]),
            frame_dt: r_cfg.frame_dt,
            t_end: r_cfg.t_end,
        })
    }
}
