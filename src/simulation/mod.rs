pub mod states;
pub mod params;
pub mod forces;
pub mod integrator;
pub mod geometry;
pub mod cloth;
pub mod scenario;
