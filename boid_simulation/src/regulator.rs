use std::f32::consts::FRAC_PI_4;

use glam::Vec2;
use rand::Rng;

use crate::config::{Nudge, SimulationConfig};

/// Pull `velocity` into `[min_speed, max_speed]` and return it with its speed.
///
/// A zero velocity is nudged to `min_speed` (see [`Nudge`]) unless
/// `min_speed` is itself zero, in which case the boid stays at rest.
pub fn regulate_speed<R: Rng + ?Sized>(
    velocity: Vec2,
    config: &SimulationConfig,
    rng: &mut R,
) -> (Vec2, f32) {
    let speed = velocity.length();
    if speed == 0.0 {
        if config.min_speed > 0.0 {
            return (nudge(config, rng), config.min_speed);
        }
        return (Vec2::ZERO, 0.0);
    }
    if speed < config.min_speed {
        (velocity * (config.min_speed / speed), config.min_speed)
    } else if speed > config.max_speed {
        (velocity * (config.max_speed / speed), config.max_speed)
    } else {
        (velocity, speed)
    }
}

fn nudge<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Vec2 {
    let min = config.min_speed;
    let fixed = Vec2::new(FRAC_PI_4.cos(), FRAC_PI_4.sin()) * min;
    match config.nudge {
        Nudge::FixedAngle => fixed,
        Nudge::Random => {
            let draw = Vec2::new(rng.random_range(-min..=min), rng.random_range(-min..=min));
            match draw.try_normalize() {
                Some(direction) => direction * min,
                None => fixed,
            }
        }
    }
}

/// Move by one tick and hard-clamp into `[0, width-1] x [0, height-1]`.
/// Velocity is left as is, so a boid pinned on a wall keeps pushing into it
/// until the margin turn wins.
pub fn advance(position: Vec2, velocity: Vec2, config: &SimulationConfig) -> Vec2 {
    let upper = Vec2::new(config.width as f32 - 1.0, config.height as f32 - 1.0);
    (position + velocity).clamp(Vec2::ZERO, upper)
}
