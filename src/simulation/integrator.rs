//! Fixed-step integration of vertex motion
//!
//! A Verlet-style scheme: positions advance explicitly from the accumulated
//! force, and velocity is always derived from the position delta, never
//! integrated on its own. Positions are double-buffered and swapped once per
//! step, so the force pass that produced `force` never aliases the write.

use rayon::prelude::*;

use crate::simulation::params::Parameters;
use crate::simulation::states::ClothState;

/// Advance every vertex by one step of `params.dt`:
///
/// ```text
/// next     = curr + velocity * dt + (force / mass) * dt^2 / 2
/// velocity = (next - curr) / dt
/// ```
///
/// `next` is written into the write buffer (`prev_pos`), then the two
/// position buffers swap roles for the following step.
pub fn verlet_step(state: &mut ClothState, params: &Parameters) {
    let dt = params.dt;
    let inv_dt = 1.0 / dt;
    // Uniform mass, so fold 0.5 / mass * dt^2 into one coefficient
    let accel_coef = 0.5 / params.mass * dt * dt;

    // One write per vertex into disjoint cells: plain parallel fan-out
    state
        .prev_pos
        .par_iter_mut()
        .zip(state.velocity.par_iter_mut())
        .zip(state.curr_pos.par_iter())
        .zip(state.force.par_iter())
        .for_each(|(((next, vel), curr), force)| {
            let advanced = curr + *vel * dt + force * accel_coef;
            *vel = (advanced - curr) * inv_dt;
            *next = advanced;
        });

    // The write buffer now holds the new solution; make it current
    std::mem::swap(&mut state.prev_pos, &mut state.curr_pos);
}
