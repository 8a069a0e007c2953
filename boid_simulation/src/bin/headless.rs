use std::path::PathBuf;

use anyhow::{Context, Result};
use boid_simulation::{Simulation, SimulationConfig, spawn};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

const REPORT_EVERY: u64 = 60;

/// Run a flock without a window and log how it evolves.
#[derive(Parser, Debug)]
#[command(name = "headless", version)]
struct Args {
    /// Number of prey boids.
    #[arg(long, default_value_t = 1200)]
    boids: usize,
    /// Number of predators, appended after the prey.
    #[arg(long, default_value_t = 0)]
    predators: usize,
    /// Ticks to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// Seed for placement and for random fallbacks inside the tick.
    #[arg(long, default_value_t = 1337)]
    seed: u64,
    /// JSON file overriding the default tuning.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let boids = spawn::populate(args.boids, args.predators, &config, &mut rng);
    let mut sim = Simulation::new(boids, config, args.seed)?;

    let mut captured = 0;
    for _ in 0..args.frames {
        captured += sim.step();
        if sim.tick() % REPORT_EVERY == 0 {
            report(&sim);
        }
    }

    let census = sim.census();
    info!(
        ticks = sim.tick(),
        prey = census.prey,
        predators = census.predators,
        captured,
        "run finished"
    );
    Ok(())
}

fn report(sim: &Simulation) {
    let census = sim.census();
    let live: Vec<_> = sim.boids().iter().filter(|b| b.is_alive()).collect();
    let mean_speed = if live.is_empty() {
        0.0
    } else {
        live.iter().map(|b| b.speed()).sum::<f32>() / live.len() as f32
    };
    info!(
        tick = sim.tick(),
        prey = census.prey,
        captured = census.captured,
        mean_speed,
        "flock census"
    );
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
