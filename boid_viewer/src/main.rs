use ::rand::SeedableRng;
use ::rand::rngs::SmallRng;
use boid_simulation::{Boid, Simulation, SimulationConfig, spawn};
use clap::Parser;
use macroquad::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod palette;
mod ui;

use crate::ui::{ColourMode, PanelState, render_parameter_panel};

const SEED: u64 = 0;

#[derive(Parser, Debug)]
#[command(name = "boid_viewer", version)]
struct Args {
    /// Close the window after this many frames.
    #[arg(long)]
    frames: Option<u64>,
}

/// A running flock plus the colour each boid was given where it spawned.
struct Flock {
    sim: Simulation,
    spawn_colours: Vec<Color>,
}

fn viewer_config() -> SimulationConfig {
    SimulationConfig {
        capture_radius: 2.0,
        ..SimulationConfig::default()
    }
}

fn window_conf() -> Conf {
    let config = viewer_config();
    Conf {
        window_title: "Boids - Enter restarts, P toggles panel, Esc quits".to_owned(),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn spawn_flock(panel: &PanelState, run: u64) -> Option<Flock> {
    let mut rng = SmallRng::seed_from_u64(SEED.wrapping_add(run));
    let boids = spawn::populate(panel.prey, panel.predators, &panel.config, &mut rng);
    let spawn_colours = boids
        .iter()
        .map(|b| palette::spawn_x_colour(b.position().x, panel.config.width))
        .collect();
    match Simulation::new(boids, panel.config, run) {
        Ok(sim) => Some(Flock { sim, spawn_colours }),
        Err(err) => {
            warn!(%err, "could not start simulation");
            None
        }
    }
}

fn draw_boid(boid: &Boid, prey_colour: Color) {
    let heading = boid.velocity().normalize_or_zero();
    let heading = if heading.length() > 0.0 {
        vec2(heading.x, heading.y)
    } else {
        vec2(1.0, 0.0)
    };
    let side = vec2(-heading.y, heading.x);
    let position = vec2(boid.position().x, boid.position().y);

    let (size, colour): (f32, Color) = if boid.is_predator() {
        (9.0, palette::PREDATOR)
    } else {
        (5.0, prey_colour)
    };
    let tip = position + heading * size;
    let left = position - heading * (size * 0.4) + side * (size * 0.5);
    let right = position - heading * (size * 0.4) - side * (size * 0.5);
    draw_triangle(tip, left, right, colour);
}

#[macroquad::main(window_conf)]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let args = Args::parse();
    let mut panel = PanelState {
        config: viewer_config(),
        colour_mode: ColourMode::Speed,
        prey: 1500,
        predators: 8,
        collapsed: false,
    };
    let mut run = 0;
    let Some(mut flock) = spawn_flock(&panel, run) else {
        return;
    };
    let mut frames = 0u64;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if args.frames.is_some_and(|limit| frames >= limit) {
            info!(frames, "frame limit reached");
            break;
        }
        if is_key_pressed(KeyCode::P) {
            panel.collapsed = !panel.collapsed;
        }

        let mut restart = is_key_pressed(KeyCode::Enter);
        let mut config_changed = false;
        egui_macroquad::ui(|egui_ctx| {
            let controls = render_parameter_panel(egui_ctx, &mut panel);
            restart |= controls.restart;
            config_changed = controls.config_changed;
        });

        if config_changed {
            if let Err(err) = flock.sim.set_config(panel.config) {
                warn!(%err, "rejected parameter change");
                panel.config = *flock.sim.config();
            }
        }
        if restart {
            run += 1;
            if let Some(fresh) = spawn_flock(&panel, run) {
                info!(run, prey = panel.prey, predators = panel.predators, "restarted flock");
                flock = fresh;
            }
        }

        let sim = &mut flock.sim;
        sim.step();
        frames += 1;

        clear_background(palette::BACKGROUND);
        let config = sim.config();
        for boid in sim.boids().iter().filter(|b| b.is_alive()) {
            let colour = match panel.colour_mode {
                ColourMode::Speed => {
                    palette::speed_colour(boid.speed(), config.min_speed, config.max_speed)
                }
                ColourMode::SpawnX => flock.spawn_colours[boid.index()],
            };
            draw_boid(boid, colour);
        }

        let census = sim.census();
        let status = format!(
            "tick {} | prey {} | predators {} | captured {}",
            sim.tick(),
            census.prey,
            census.predators,
            census.captured
        );
        draw_text(&status, 20.0, screen_height() - 20.0, 24.0, WHITE);

        egui_macroquad::draw();
        next_frame().await;
    }
}
