//! Numerical and physical parameters for the fabric simulation
//!
//! `Parameters` holds runtime settings:
//! - grid dimensions and spacing (`rows`, `cols`, `dx`),
//! - the fixed physics step `dt` and uniform particle mass,
//! - spring/damper pairs for the short (structural + shear) and long (bend)
//!   edge classes,
//! - gravity and the wind-influence coefficient

use anyhow::{ensure, Result};

#[derive(Debug, Clone)]
pub struct Parameters {
    pub rows: usize, // grid rows
    pub cols: usize, // grid columns
    pub dx: f64, // spatial step (grid spacing)
    pub dt: f64, // fixed physics time step
    pub short_spring: f64, // structural + shear stiffness
    pub long_spring: f64, // bend stiffness
    pub short_damp: f64, // structural + shear damping
    pub long_damp: f64, // bend damping
    pub mass: f64, // uniform particle mass
    pub gravity: f64, // signed vertical acceleration (negative = down)
    pub wind_influence: f64, // scale applied to the wind drag term
}

impl Parameters {
    /// Fail fast on configurations that would build degenerate geometry
    /// or a non-advancing simulation.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.rows >= 2, "rows must be at least 2, got {}", self.rows);
        ensure!(self.cols >= 2, "cols must be at least 2, got {}", self.cols);
        ensure!(
            self.dx > 0.0 && self.dx.is_finite(),
            "dx must be finite and positive, got {}",
            self.dx
        );
        ensure!(
            self.dt > 0.0 && self.dt.is_finite(),
            "dt must be finite and positive, got {}",
            self.dt
        );
        ensure!(
            self.mass > 0.0 && self.mass.is_finite(),
            "mass must be finite and positive, got {}",
            self.mass
        );
        for (name, v) in [
            ("short_spring", self.short_spring),
            ("long_spring", self.long_spring),
            ("short_damp", self.short_damp),
            ("long_damp", self.long_damp),
            ("wind_influence", self.wind_influence),
        ] {
            ensure!(
                v >= 0.0 && v.is_finite(),
                "{} must be finite and non-negative, got {}",
                name,
                v
            );
        }
        ensure!(
            self.gravity.is_finite(),
            "gravity must be finite, got {}",
            self.gravity
        );
        Ok(())
    }
}
