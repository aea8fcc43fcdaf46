pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{ClothState, NVec3};
pub use simulation::params::Parameters;
pub use simulation::forces::{
    spring_damper, BendSprings, Force, ForceSet, StructuralShearSprings, WindGravity, MIN_EDGE_LEN,
};
pub use simulation::integrator::verlet_step;
pub use simulation::geometry::update_surface_frames;
pub use simulation::cloth::ClothSimulator;
pub use simulation::scenario::Scenario;

pub use configuration::config::{GridConfig, ParametersConfig, RunConfig, ScenarioConfig};

pub use benchmark::benchmark::{bench_step, bench_step_curve};
