use rand::SeedableRng;
use rand::rngs::SmallRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::boid::{Boid, BoidState, Role};
use crate::config::{ConfigError, SimulationConfig};
use crate::regulator::{advance, regulate_speed};
use crate::rules::{self, Steering};
use crate::spatial::SpatialGrid;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("boid in slot {slot} carries index {index}")]
    IndexMismatch { slot: usize, index: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlockCensus {
    pub prey: usize,
    pub predators: usize,
    pub captured: usize,
}

/// Two-phase tick driver.
///
/// Phase one fills one proposal slot per boid from the untouched pre-tick
/// list; phase two writes every proposal back by index. No boid ever sees
/// another boid's post-tick state within the same tick.
#[derive(Debug, Default)]
pub struct FrameStepper {
    seed: u64,
    tick: u64,
    proposals: Vec<Option<BoidState>>,
}

impl FrameStepper {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tick: 0,
            proposals: Vec::new(),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance `boids` by one tick. Returns how many prey were captured.
    ///
    /// # Panics
    ///
    /// If `config` fails validation or a boid's index differs from its slot
    /// in `boids`.
    pub fn step(&mut self, boids: &mut [Boid], config: &SimulationConfig) -> usize {
        if let Err(err) = config.validate() {
            panic!("invalid simulation config: {err}");
        }
        for (slot, boid) in boids.iter().enumerate() {
            assert_eq!(boid.index(), slot, "boid index must match its slot");
        }

        let grid = SpatialGrid::build(boids, config.cell_size());
        let tick_seed = mix(self.seed, self.tick);

        self.proposals.clear();
        self.proposals.resize(boids.len(), None);
        compute(&mut self.proposals, boids, &grid, config, tick_seed);

        let mut captured = 0;
        for (boid, slot) in boids.iter_mut().zip(self.proposals.iter_mut()) {
            if let Some(state) = slot.take() {
                if state == BoidState::Captured {
                    captured += 1;
                }
                boid.apply(state);
            }
        }

        if captured > 0 {
            debug!(tick = self.tick, captured, "prey captured");
        }
        trace!(
            tick = self.tick,
            cells = grid.occupied_cells(),
            boids = boids.len(),
            "tick committed"
        );
        self.tick += 1;
        captured
    }
}

#[cfg(feature = "parallel")]
fn compute(
    proposals: &mut [Option<BoidState>],
    boids: &[Boid],
    grid: &SpatialGrid,
    config: &SimulationConfig,
    tick_seed: u64,
) {
    proposals
        .par_iter_mut()
        .zip(boids.par_iter())
        .for_each(|(slot, boid)| *slot = propose(boid, boids, grid, config, tick_seed));
}

#[cfg(not(feature = "parallel"))]
fn compute(
    proposals: &mut [Option<BoidState>],
    boids: &[Boid],
    grid: &SpatialGrid,
    config: &SimulationConfig,
    tick_seed: u64,
) {
    for (slot, boid) in proposals.iter_mut().zip(boids) {
        *slot = propose(boid, boids, grid, config, tick_seed);
    }
}

/// Next state for one boid, or `None` for boids already dead.
fn propose(
    boid: &Boid,
    boids: &[Boid],
    grid: &SpatialGrid,
    config: &SimulationConfig,
    tick_seed: u64,
) -> Option<BoidState> {
    if !boid.is_alive() {
        return None;
    }
    let mut rng = SmallRng::seed_from_u64(mix(tick_seed, boid.index() as u64));
    let state = match rules::steer(boid, boids, grid, config, &mut rng) {
        Steering::Captured => BoidState::Captured,
        Steering::Velocity(velocity) => {
            let (velocity, speed) = regulate_speed(velocity, config, &mut rng);
            BoidState::Moved {
                position: advance(boid.position(), velocity, config),
                velocity,
                speed,
            }
        }
    };
    Some(state)
}

// splitmix64 finaliser over a combined key
fn mix(a: u64, b: u64) -> u64 {
    let mut z = a ^ b.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Advance `boids` by exactly one tick with a throwaway stepper.
///
/// Random fallbacks draw from seed 0 on every call; hold a [`FrameStepper`]
/// or a [`Simulation`] for a fresh stream each tick.
///
/// # Panics
///
/// If `config` fails validation or an index differs from its slot.
pub fn step(boids: &mut [Boid], config: &SimulationConfig) {
    FrameStepper::new(0).step(boids, config);
}

/// Owns a flock, its config and the stepper that advances it.
pub struct Simulation {
    boids: Vec<Boid>,
    config: SimulationConfig,
    stepper: FrameStepper,
}

impl Simulation {
    pub fn new(
        boids: Vec<Boid>,
        config: SimulationConfig,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        if let Some((slot, boid)) = boids.iter().enumerate().find(|(s, b)| b.index() != *s) {
            return Err(SimulationError::IndexMismatch {
                slot,
                index: boid.index(),
            });
        }
        let sim = Self {
            boids,
            config,
            stepper: FrameStepper::new(seed),
        };
        let census = sim.census();
        info!(
            prey = census.prey,
            predators = census.predators,
            cell_size = config.cell_size(),
            "simulation ready"
        );
        Ok(sim)
    }

    pub fn step(&mut self) -> usize {
        self.stepper.step(&mut self.boids, &self.config)
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn tick(&self) -> u64 {
        self.stepper.tick()
    }

    pub fn census(&self) -> FlockCensus {
        let mut census = FlockCensus::default();
        for boid in &self.boids {
            match (boid.role(), boid.is_alive()) {
                (Role::Predator, _) => census.predators += 1,
                (Role::Prey, true) => census.prey += 1,
                (Role::Prey, false) => census.captured += 1,
            }
        }
        census
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn;
    use glam::Vec2;

    fn dense_config() -> SimulationConfig {
        SimulationConfig {
            width: 200,
            height: 200,
            visible_range: 30.0,
            capture_radius: 2.0,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn compute_order_does_not_change_results() {
        let config = dense_config();
        let mut rng = SmallRng::seed_from_u64(11);
        let boids = spawn::populate(120, 6, &config, &mut rng);
        let grid = SpatialGrid::build(&boids, config.cell_size());

        let forward: Vec<_> = boids
            .iter()
            .map(|b| propose(b, &boids, &grid, &config, 5))
            .collect();
        let mut backward: Vec<_> = boids
            .iter()
            .rev()
            .map(|b| (b.index(), propose(b, &boids, &grid, &config, 5)))
            .collect();
        backward.sort_by_key(|(index, _)| *index);
        let backward: Vec<_> = backward.into_iter().map(|(_, state)| state).collect();

        assert_eq!(forward, backward);
    }

    #[test]
    fn new_rejects_misnumbered_flock() {
        let boids = vec![
            Boid::prey(0, Vec2::new(1.0, 1.0), Vec2::X),
            Boid::prey(2, Vec2::new(2.0, 2.0), Vec2::X),
        ];
        let err = Simulation::new(boids, SimulationConfig::default(), 0).err();
        assert!(matches!(
            err,
            Some(SimulationError::IndexMismatch { slot: 1, index: 2 })
        ));
    }

    #[test]
    fn new_rejects_bad_config() {
        let config = SimulationConfig {
            min_speed: 5.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Simulation::new(Vec::new(), config, 0),
            Err(SimulationError::Config(ConfigError::SpeedBand { .. }))
        ));
    }

    #[test]
    #[should_panic(expected = "boid index must match its slot")]
    fn step_panics_on_misnumbered_flock() {
        let mut boids = [Boid::prey(1, Vec2::new(1.0, 1.0), Vec2::X)];
        step(&mut boids, &SimulationConfig::default());
    }

    #[test]
    #[should_panic(expected = "invalid simulation config")]
    fn stepper_refuses_invalid_config() {
        let config = SimulationConfig {
            visible_range: f32::NAN,
            ..SimulationConfig::default()
        };
        let mut boids = [Boid::prey(0, Vec2::new(1.0, 1.0), Vec2::X)];
        FrameStepper::new(0).step(&mut boids, &config);
    }

    #[test]
    fn new_rejects_capture_beyond_neighbor_reach() {
        let config = SimulationConfig {
            visible_range: 40.0,
            capture_radius: 100.0,
            ..SimulationConfig::default()
        };
        let boids = vec![
            Boid::prey(0, Vec2::new(100.0, 100.0), Vec2::X),
            Boid::predator(1, Vec2::new(190.0, 100.0), Vec2::X),
        ];
        assert!(matches!(
            Simulation::new(boids, config, 0),
            Err(SimulationError::Config(ConfigError::CaptureReach { .. }))
        ));
    }

    #[test]
    fn census_counts_captures() {
        let config = SimulationConfig {
            capture_radius: 1.0,
            ..dense_config()
        };
        let boids = vec![
            Boid::prey(0, Vec2::new(50.0, 50.0), Vec2::X),
            Boid::predator(1, Vec2::new(50.5, 50.0), Vec2::X),
            Boid::prey(2, Vec2::new(150.0, 150.0), Vec2::X),
        ];
        let mut sim = Simulation::new(boids, config, 3).unwrap();
        assert_eq!(sim.step(), 1);
        assert_eq!(sim.tick(), 1);
        assert_eq!(
            sim.census(),
            FlockCensus {
                prey: 1,
                predators: 1,
                captured: 1,
            }
        );
    }

    #[test]
    fn seeded_runs_repeat_even_with_random_paths() {
        let config = SimulationConfig {
            nudge: crate::config::Nudge::Random,
            ..dense_config()
        };
        let run = || {
            let mut rng = SmallRng::seed_from_u64(99);
            let boids = spawn::populate(80, 4, &config, &mut rng);
            let mut sim = Simulation::new(boids, config, 1234).unwrap();
            for _ in 0..50 {
                sim.step();
            }
            sim.boids().to_vec()
        };
        assert_eq!(run(), run());
    }
}
