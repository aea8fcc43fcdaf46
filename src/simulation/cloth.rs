//! Top-level fabric simulator
//!
//! `ClothSimulator` owns the vertex state, the parameters and the force set,
//! and exposes one mutating operation (`update`) plus read-only accessors.
//! After the simulation has been updated, the client copies the current
//! solution (positions and surface frames) into vertex buffers for
//! rendering; this type only does the calculations, no drawing.

use anyhow::Result;

use crate::simulation::forces::{BendSprings, ForceSet, StructuralShearSprings, WindGravity};
use crate::simulation::geometry::update_surface_frames;
use crate::simulation::integrator::verlet_step;
use crate::simulation::params::Parameters;
use crate::simulation::states::{ClothState, NVec3};

pub struct ClothSimulator {
    params: Parameters,
    state: ClothState,
    forces: ForceSet,
    clock: f64, // accumulated caller time; one clock per simulator instance
}

impl ClothSimulator {
    /// Validate the parameters and build the initial sine-perturbed sheet
    /// with the three force terms registered.
    pub fn new(params: Parameters) -> Result<Self> {
        params.validate()?;

        let state = ClothState::flat_grid(params.rows, params.cols, params.dx);

        let forces = ForceSet::new()
            .with(WindGravity {
                gravity: params.gravity,
                mass: params.mass,
                wind_influence: params.wind_influence,
            })
            .with(StructuralShearSprings {
                stiffness: params.short_spring,
                damping: params.short_damp,
                dx: params.dx,
            })
            .with(BendSprings {
                stiffness: params.long_spring,
                damping: params.long_damp,
                dx: params.dx,
            });

        Ok(Self {
            state,
            forces,
            clock: 0.0,
            params,
        })
    }

    pub fn row_count(&self) -> usize {
        self.params.rows
    }

    pub fn column_count(&self) -> usize {
        self.params.cols
    }

    pub fn vertex_count(&self) -> usize {
        self.params.rows * self.params.cols
    }

    /// Two triangles per grid quad
    pub fn triangle_count(&self) -> usize {
        (self.params.rows - 1) * (self.params.cols - 1) * 2
    }

    /// Physical extent spanned along x: `(cols - 1) * dx`
    pub fn width(&self) -> f64 {
        (self.params.cols - 1) as f64 * self.params.dx
    }

    /// Physical extent spanned along z: `(rows - 1) * dx`
    pub fn depth(&self) -> f64 {
        (self.params.rows - 1) as f64 * self.params.dx
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Solution at grid point `i`. Panics if `i >= vertex_count()`.
    pub fn position(&self, i: usize) -> &NVec3 {
        &self.state.curr_pos[i]
    }

    /// Unit surface normal at grid point `i`. Panics if `i >= vertex_count()`.
    pub fn normal(&self, i: usize) -> &NVec3 {
        &self.state.normals[i]
    }

    /// Unit tangent at grid point `i`. Panics if `i >= vertex_count()`.
    pub fn tangent(&self, i: usize) -> &NVec3 {
        &self.state.tangents[i]
    }

    /// Unit bitangent at grid point `i`. Panics if `i >= vertex_count()`.
    pub fn bitangent(&self, i: usize) -> &NVec3 {
        &self.state.bitangents[i]
    }

    /// Bulk views for vertex-buffer upload
    pub fn positions(&self) -> &[NVec3] {
        &self.state.curr_pos
    }

    pub fn normals(&self) -> &[NVec3] {
        &self.state.normals
    }

    pub fn tangents(&self) -> &[NVec3] {
        &self.state.tangents
    }

    pub fn bitangents(&self) -> &[NVec3] {
        &self.state.bitangents
    }

    pub fn state(&self) -> &ClothState {
        &self.state
    }

    /// Mutable state access for callers that layer extra constraints
    /// (pinned vertices, external impulses) on top of the core between steps.
    pub fn state_mut(&mut self) -> &mut ClothState {
        &mut self.state
    }

    /// Accumulate `elapsed` caller time; once the accumulated clock reaches
    /// the fixed `dt`, run exactly one physics step and reset the clock.
    /// Leftover time beyond `dt` is discarded, not carried over, so a slow
    /// frame never triggers a burst of catch-up steps. Calls that never
    /// reach `dt` leave every vertex array untouched.
    pub fn update(&mut self, elapsed: f64, wind: NVec3) {
        self.clock += elapsed;
        if self.clock < self.params.dt {
            return;
        }
        self.step(wind);
        self.clock = 0.0;
    }

    /// One full step: force accumulation, integration, surface frames.
    /// Each phase completes before the next reads its output.
    fn step(&mut self, wind: NVec3) {
        // Phases 1 + 2: zero the accumulator, add wind/gravity, scatter the
        // spring network. The buffer is taken out of the state so the terms
        // can read positions and velocities while it is written.
        let mut force = std::mem::take(&mut self.state.force);
        self.forces.accumulate_forces(&wind, &self.state, &mut force);
        self.state.force = force;

        // Phase 3: advance positions, derive velocities, swap buffers
        verlet_step(&mut self.state, &self.params);

        // Phase 4: recompute tangent/bitangent/normal from the new positions
        update_surface_frames(&mut self.state);
    }
}
