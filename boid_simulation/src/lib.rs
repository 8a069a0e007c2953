//! Grid-accelerated boids with an optional predator/prey extension.
//!
//! Each tick rebuilds a uniform [`SpatialGrid`], computes every live boid's
//! next state from the untouched pre-tick flock, then commits all of them at
//! once. Rendering, input and population seeding sit outside the core; the
//! [`spawn`] helpers exist for the binaries and tests.

pub mod boid;
pub mod config;
pub mod regulator;
pub mod rules;
pub mod simulation;
pub mod spatial;
pub mod spawn;

pub use boid::{Boid, Role};
pub use config::{ConfigError, EdgeTurn, Nudge, Pursuit, SimulationConfig};
pub use simulation::{FlockCensus, FrameStepper, Simulation, SimulationError, step};
pub use spatial::SpatialGrid;
