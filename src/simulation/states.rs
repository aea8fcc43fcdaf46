//! Core state types for the fabric simulation.
//!
//! `ClothState` holds the full per-vertex state of the discretized sheet:
//! seven co-indexed arrays of length `rows * cols`, with vertex `(j, i)`
//! (row j, col i) at linear index `j * cols + i`.
//!
//! Positions are double-buffered: `curr_pos` is the read buffer during a
//! step, `prev_pos` is the write buffer; the integrator swaps them once per
//! step so the force pass never reads a half-written solution.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone)]
pub struct ClothState {
    pub rows: usize, // grid rows (z direction)
    pub cols: usize, // grid columns (x direction)
    pub prev_pos: Vec<NVec3>, // write buffer during a step, last solution otherwise
    pub curr_pos: Vec<NVec3>, // read buffer, current solution
    pub velocity: Vec<NVec3>, // derived from the position delta each step
    pub force: Vec<NVec3>, // accumulator, meaningful only within one step
    pub normals: Vec<NVec3>, // unit surface normal per vertex
    pub tangents: Vec<NVec3>, // unit tangent toward the next row
    pub bitangents: Vec<NVec3>, // unit tangent toward the next column
}

impl ClothState {
    /// Build the initial sheet: a flat grid centered on the origin with a
    /// mild sine perturbation in height, zero velocity, and an up-facing
    /// surface frame.
    pub fn flat_grid(rows: usize, cols: usize, dx: f64) -> Self {
        let count = rows * cols;

        let half_width = (cols - 1) as f64 * dx * 0.5;
        let half_depth = (rows - 1) as f64 * dx * 0.5;

        let mut curr_pos = vec![NVec3::zeros(); count];
        for j in 0..rows {
            // Rows run from +z (front) to -z (back)
            let z = half_depth - j as f64 * dx;
            for i in 0..cols {
                let x = -half_width + i as f64 * dx;
                curr_pos[j * cols + i] = NVec3::new(x, 0.1 * (x * z).sin(), z);
            }
        }

        Self {
            prev_pos: curr_pos.clone(),
            curr_pos,
            velocity: vec![NVec3::zeros(); count],
            force: vec![NVec3::zeros(); count],
            normals: vec![NVec3::new(0.0, 1.0, 0.0); count],
            // cross(bitangent, tangent) = (0, 1, 0) for these, so the
            // initial frame is consistent before the first step runs
            tangents: vec![NVec3::new(0.0, 0.0, -1.0); count],
            bitangents: vec![NVec3::new(1.0, 0.0, 0.0); count],
            rows,
            cols,
        }
    }

    /// Linear index of vertex `(j, i)`
    #[inline]
    pub fn idx(&self, j: usize, i: usize) -> usize {
        j * self.cols + i
    }

    pub fn vertex_count(&self) -> usize {
        self.rows * self.cols
    }
}
