//! Force contributors for the fabric mass-spring network
//!
//! Defines the [`Force`] trait and the concrete terms:
//! - `WindGravity`: external forcing from a wind drag term plus gravity
//! - `StructuralShearSprings`: short springs between orthogonal neighbours
//!   (rest length `dx`) and diagonal neighbours (rest length `dx * sqrt(2)`)
//! - `BendSprings`: long springs skipping one vertex (rest length `2 * dx`)
//!
//! Contributions are summed by [`ForceSet`] into one force vector per vertex

use std::f64::consts::SQRT_2;

use rayon::prelude::*;

use crate::simulation::states::{ClothState, NVec3};

/// Edges shorter than this are skipped for the step (spring and damper).
/// Below this length the unit direction in the stiffness formula is
/// undefined; skipping keeps the step deterministic instead of letting a
/// division by zero flood the grid with NaN.
pub const MIN_EDGE_LEN: f64 = 1e-9;

/// Collection of force terms (wind, gravity, spring classes)
/// Each term implements [`Force`] and their contributions are summed
/// into a single force vector per vertex
pub struct ForceSet {
    terms: Vec<Box<dyn Force + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a force term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Force + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute the net force on every vertex of `state` for wind `wind`
    /// - `out[i]` is zeroed, then set to the sum of contributions from all terms
    pub fn accumulate_forces(&self, wind: &NVec3, state: &ClothState, out: &mut [NVec3]) {
        // Zero buffer
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }
        // Iterate over all force contributors
        for term in &self.terms {
            term.accumulate(wind, state, out);
        }
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for force sources operating on [`ClothState`]
/// Implementations add their contribution into `out[i]` for each vertex.
/// Terms read `curr_pos`, `velocity` and `normals` only; the force array in
/// `state` is not meaningful while a set is accumulating.
pub trait Force {
    fn accumulate(&self, wind: &NVec3, state: &ClothState, out: &mut [NVec3]);
}

/// Spring + damper force that edge `a -> b` exerts on vertex `a`
/// (vertex `b` receives the negation)
///
/// With displacement `d = pb - pa` and relative velocity `v = vb - va`:
///
/// ```text
/// k = stiffness * (|d| - rest) / |d|     direction folded into d
/// F = k * d + damping * v
/// ```
///
/// Returns zero when `|d| < MIN_EDGE_LEN` (coincident vertices).
#[inline]
pub fn spring_damper(
    pa: &NVec3,
    pb: &NVec3,
    va: &NVec3,
    vb: &NVec3,
    rest: f64,
    stiffness: f64,
    damping: f64,
) -> NVec3 {
    let d = pb - pa;
    let len = d.norm();
    if len < MIN_EDGE_LEN {
        return NVec3::zeros();
    }
    // Scalar stiffness: positive when stretched past rest, negative when
    // compressed, with the 1/|d| turning d into a unit direction
    let k = stiffness * (len - rest) / len;
    k * d + damping * (vb - va)
}

/// Rows per parallel task in the spring scatter. Fixed so the partition (and
/// with it the floating-point summation order) does not depend on how many
/// worker threads happen to run.
const ROWS_PER_TASK: usize = 16;

/// Scatter per-row edge contributions through task-local force buffers,
/// merged after the pass.
///
/// Rows share vertices with their neighbours (short edges span j..j+1, bend
/// edges j..j+2), so a row-parallel split writing straight into the shared
/// accumulator would race on the crossing edges. Each band of rows scatters
/// into its own buffer instead, and the buffers are merged in band order
/// behind the phase barrier, keeping replays bit-reproducible.
fn scatter_rows<F>(row_range: std::ops::Range<usize>, count: usize, out: &mut [NVec3], per_row: F)
where
    F: Fn(usize, &mut [NVec3]) + Send + Sync,
{
    let rows: Vec<usize> = row_range.collect();

    let partials: Vec<Vec<NVec3>> = rows
        .par_chunks(ROWS_PER_TASK)
        .map(|band| {
            let mut local = vec![NVec3::zeros(); count];
            for &j in band {
                per_row(j, &mut local);
            }
            local
        })
        .collect();

    for partial in partials {
        for (f, p) in out.iter_mut().zip(partial) {
            *f += p;
        }
    }
}

/// External forcing: a wind drag term derived from the surface normal,
/// plus constant gravity along the vertical axis
///
/// The drag is the component-wise product `normal * (wind - velocity)`:
/// a vertex facing the wind feels the full push, a vertex edge-on feels
/// none, and a vertex already moving with the wind feels less. An
/// approximation, not an aerodynamic model.
pub struct WindGravity {
    pub gravity: f64, // signed vertical acceleration
    pub mass: f64, // uniform particle mass
    pub wind_influence: f64, // drag scale
}

impl Force for WindGravity {
    fn accumulate(&self, wind: &NVec3, state: &ClothState, out: &mut [NVec3]) {
        let weight = self.mass * self.gravity;
        let wind_influence = self.wind_influence;

        // Purely per-vertex, no write hazard: plain parallel fan-out
        out.par_iter_mut()
            .zip(state.normals.par_iter())
            .zip(state.velocity.par_iter())
            .for_each(|((f, normal), vel)| {
                let rel = wind - vel;
                *f += wind_influence * normal.component_mul(&rel);
                f.y += weight;
            });
    }
}

/// Short springs: structural edges to the next row / next column
/// (rest length `dx`) and the two shear diagonals of every grid quad
/// (rest length `dx * sqrt(2)`). One stiffness/damping pair for both.
pub struct StructuralShearSprings {
    pub stiffness: f64,
    pub damping: f64,
    pub dx: f64,
}

impl Force for StructuralShearSprings {
    fn accumulate(&self, _wind: &NVec3, state: &ClothState, out: &mut [NVec3]) {
        let m = state.rows;
        let n = state.cols;
        let count = state.vertex_count();

        let rest = self.dx;
        let rest_diag = SQRT_2 * self.dx;
        let stiffness = self.stiffness;
        let damping = self.damping;

        let pos = &state.curr_pos;
        let vel = &state.velocity;

        // Main traversal: each quad (j, i) of the (m-1) x (n-1) interior owns
        // four edges, so every edge is visited exactly once and the inner
        // loop stays branch-free. Boundary edges that belong to no quad are
        // handled by the dedicated passes below.
        scatter_rows(0..m - 1, count, out, |j, local| {
            for i in 0..n - 1 {
                let a = j * n + i; // top-left of the quad
                let right = j * n + i + 1;
                let below = (j + 1) * n + i;
                let diag = (j + 1) * n + i + 1;

                // "left to right" shear diagonal: note the sqrt(2) rest length
                let f = spring_damper(
                    &pos[a], &pos[diag], &vel[a], &vel[diag], rest_diag, stiffness, damping,
                );
                local[a] += f;
                local[diag] -= f;

                // "right to left" shear diagonal
                let f = spring_damper(
                    &pos[right], &pos[below], &vel[right], &vel[below], rest_diag, stiffness,
                    damping,
                );
                local[right] += f;
                local[below] -= f;

                // structural edge down the column
                let f = spring_damper(
                    &pos[a], &pos[below], &vel[a], &vel[below], rest, stiffness, damping,
                );
                local[a] += f;
                local[below] -= f;

                // structural edge along the row
                let f = spring_damper(
                    &pos[a], &pos[right], &vel[a], &vel[right], rest, stiffness, damping,
                );
                local[a] += f;
                local[right] -= f;
            }
        });

        // Last row: its horizontal edges belong to no quad above
        let base = (m - 1) * n;
        for i in 0..n - 1 {
            let a = base + i;
            let b = base + i + 1;
            let f = spring_damper(&pos[a], &pos[b], &vel[a], &vel[b], rest, stiffness, damping);
            out[a] += f;
            out[b] -= f;
        }

        // Last column: its vertical edges belong to no quad to the left
        for j in 0..m - 1 {
            let a = j * n + n - 1;
            let b = (j + 1) * n + n - 1;
            let f = spring_damper(&pos[a], &pos[b], &vel[a], &vel[b], rest, stiffness, damping);
            out[a] += f;
            out[b] -= f;
        }
    }
}

/// Long (bend) springs: edges skipping one vertex along a row or column,
/// rest length `2 * dx`. These resist out-of-plane folding that leaves the
/// structural lengths unchanged.
pub struct BendSprings {
    pub stiffness: f64,
    pub damping: f64,
    pub dx: f64,
}

impl Force for BendSprings {
    fn accumulate(&self, _wind: &NVec3, state: &ClothState, out: &mut [NVec3]) {
        let m = state.rows;
        let n = state.cols;
        let count = state.vertex_count();

        let rest = 2.0 * self.dx;
        let stiffness = self.stiffness;
        let damping = self.damping;

        let pos = &state.curr_pos;
        let vel = &state.velocity;

        if m < 3 && n < 3 {
            // No vertex two cells away in either direction
            return;
        }

        // Main traversal over the (m-2) x (n-2) interior: each vertex owns
        // its "down two" and "right two" edges
        if m >= 3 && n >= 3 {
            scatter_rows(0..m - 2, count, out, |j, local| {
                for i in 0..n - 2 {
                    let a = j * n + i;
                    let down2 = (j + 2) * n + i;
                    let right2 = j * n + i + 2;

                    let f = spring_damper(
                        &pos[a], &pos[down2], &vel[a], &vel[down2], rest, stiffness, damping,
                    );
                    local[a] += f;
                    local[down2] -= f;

                    let f = spring_damper(
                        &pos[a], &pos[right2], &vel[a], &vel[right2], rest, stiffness, damping,
                    );
                    local[a] += f;
                    local[right2] -= f;
                }
            });
        }

        // Last two rows: row-wise edges the main traversal never reaches
        if n >= 3 {
            for j in m.saturating_sub(2)..m {
                for i in 0..n - 2 {
                    let a = j * n + i;
                    let b = j * n + i + 2;
                    let f =
                        spring_damper(&pos[a], &pos[b], &vel[a], &vel[b], rest, stiffness, damping);
                    out[a] += f;
                    out[b] -= f;
                }
            }
        }

        // Last two columns: column-wise edges the main traversal never reaches
        if m >= 3 {
            for i in n.saturating_sub(2)..n {
                for j in 0..m - 2 {
                    let a = j * n + i;
                    let b = (j + 2) * n + i;
                    let f =
                        spring_damper(&pos[a], &pos[b], &vel[a], &vel[b], rest, stiffness, damping);
                    out[a] += f;
                    out[b] -= f;
                }
            }
        }
    }
}
