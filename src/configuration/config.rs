//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! fabric scenario. A scenario consists of:
//!
//! - [`GridConfig`]       – grid dimensions
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`RunConfig`]        – headless driver settings (frame time, wind)
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! grid:
//!   rows: 64
//!   cols: 64
//!
//! parameters:
//!   dx: 0.25              # grid spacing
//!   dt: 0.001             # fixed physics step
//!   short_spring: 400.0   # structural + shear stiffness
//!   long_spring: 150.0    # bend stiffness
//!   short_damp: 2.0
//!   long_damp: 1.0
//!   mass: 0.5
//!   gravity: -9.81
//!   wind_influence: 0.8
//!
//! run:
//!   frame_dt: 0.016       # caller frame time fed into update()
//!   t_end: 10.0           # total driven time
//!   wind: [4.0, 0.0, 1.5]
//! ```
//!
//! The engine then maps this configuration into its internal runtime scenario
//! representation; construction fails fast on invalid values.

use serde::Deserialize;

/// Grid dimensions for the discretized sheet
#[derive(Deserialize, Debug, Clone)]
pub struct GridConfig {
    pub rows: usize, // vertex rows (z direction)
    pub cols: usize, // vertex columns (x direction)
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub dx: f64,             // spatial step
    pub dt: f64,             // fixed physics time step
    pub short_spring: f64,   // structural + shear stiffness
    pub long_spring: f64,    // bend stiffness
    pub short_damp: f64,     // structural + shear damping
    pub long_damp: f64,      // bend damping
    pub mass: f64,           // uniform particle mass
    pub gravity: f64,        // signed vertical acceleration
    pub wind_influence: f64, // wind drag scale
}

/// Settings for the headless driver loop
#[derive(Deserialize, Debug, Clone)]
pub struct RunConfig {
    pub frame_dt: f64, // caller frame time per update() call
    pub t_end: f64,    // total driven time
    pub wind: Vec<f64>, // wind vector [x, y, z]
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub grid: GridConfig, // grid dimensions
    pub parameters: ParametersConfig, // numerical and physical parameters
    pub run: RunConfig, // driver settings
}
