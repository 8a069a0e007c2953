//! Steering rules: classic flocking for prey, pursuit for predators, and the
//! margin turn that keeps everyone inside the world.
//!
//! Everything here reads the pre-tick snapshot only. The returned velocity is
//! unregulated; speed clamping happens afterwards in [`crate::regulator`].

use glam::Vec2;
use rand::Rng;

use crate::boid::{Boid, Role};
use crate::config::{EdgeTurn, Pursuit, SimulationConfig};
use crate::spatial::SpatialGrid;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Steering {
    /// Prey sharing space with a live predator. No motion this tick.
    Captured,
    Velocity(Vec2),
}

pub fn steer<R: Rng + ?Sized>(
    boid: &Boid,
    boids: &[Boid],
    grid: &SpatialGrid,
    config: &SimulationConfig,
    rng: &mut R,
) -> Steering {
    let velocity = match boid.role() {
        Role::Prey => match prey_velocity(boid, boids, grid, config) {
            Some(velocity) => velocity,
            None => return Steering::Captured,
        },
        Role::Predator => predator_velocity(boid, boids, grid, config, rng),
    };
    Steering::Velocity(contain(boid.position(), velocity, config))
}

/// Returns `None` when a predator is close enough to catch this boid.
fn prey_velocity(
    boid: &Boid,
    boids: &[Boid],
    grid: &SpatialGrid,
    config: &SimulationConfig,
) -> Option<Vec2> {
    let position = boid.position();
    let velocity = boid.velocity();
    let visible_sq = config.visible_range * config.visible_range;
    let protected_sq = config.protected_range * config.protected_range;
    let capture_sq = config.capture_radius * config.capture_radius;
    let safe_sq = config.safe_distance * config.safe_distance;

    let mut close = Vec2::ZERO;
    let mut position_sum = Vec2::ZERO;
    let mut velocity_sum = Vec2::ZERO;
    let mut neighbors = 0u32;
    let mut repulsion = Vec2::ZERO;
    let mut threatened = false;

    for other in grid.neighbors_of(boid, boids) {
        let diff = position - other.position();
        let dist_sq = diff.length_squared();

        if other.is_predator() {
            if other.is_alive() && dist_sq <= capture_sq {
                return None;
            }
            if dist_sq < visible_sq {
                threatened = true;
                // dist_sq > 0 here unless safe_distance is 0, and a zero
                // distance was already caught above.
                repulsion += diff / dist_sq.max(safe_sq);
            }
            continue;
        }

        if dist_sq < protected_sq {
            close += diff;
        } else if dist_sq < visible_sq {
            position_sum += other.position();
            velocity_sum += other.velocity();
            neighbors += 1;
        }
    }

    if threatened {
        let flee = repulsion.normalize_or_zero();
        if flee == Vec2::ZERO {
            return Some(velocity);
        }
        return Some(flee * config.max_speed);
    }

    let mut next = velocity;
    if neighbors > 0 {
        let count = neighbors as f32;
        let cohesion = (position_sum / count - position) * config.centering_factor;
        let alignment = (velocity_sum / count - velocity) * config.matching_factor;
        next += cohesion + alignment;
    }
    next += close * config.avoid_factor;
    Some(next)
}

fn predator_velocity<R: Rng + ?Sized>(
    boid: &Boid,
    boids: &[Boid],
    grid: &SpatialGrid,
    config: &SimulationConfig,
    rng: &mut R,
) -> Vec2 {
    let position = boid.position();
    let velocity = boid.velocity();
    let quarry = grid
        .neighbors_of(boid, boids)
        .filter(|other| other.is_alive() && !other.is_predator());

    match config.pursuit {
        Pursuit::Nearest => {
            let target = quarry.min_by(|a, b| {
                a.position()
                    .distance_squared(position)
                    .total_cmp(&b.position().distance_squared(position))
            });
            match target {
                Some(prey) => {
                    velocity + (prey.position() - position) + (prey.velocity() - velocity)
                }
                None => velocity,
            }
        }
        Pursuit::Centroid => {
            let visible_sq = config.visible_range * config.visible_range;
            let (sum, count) = quarry
                .filter(|prey| prey.position().distance_squared(position) < visible_sq)
                .fold((Vec2::ZERO, 0u32), |(sum, count), prey| {
                    (sum + prey.position(), count + 1)
                });
            if count == 0 {
                return velocity + wander(config.wander_strength, rng);
            }
            // Sitting exactly on the centroid leaves no direction to steer in.
            match (sum / count as f32 - position).try_normalize() {
                Some(heading) => heading * (config.max_speed * 0.5),
                None => velocity,
            }
        }
    }
}

fn wander<R: Rng + ?Sized>(strength: f32, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.random_range(-strength..=strength),
        rng.random_range(-strength..=strength),
    )
}

/// Margin turn. Skipped entirely when `turn_factor` is not positive.
pub fn contain(position: Vec2, velocity: Vec2, config: &SimulationConfig) -> Vec2 {
    if config.turn_factor <= 0.0 {
        return velocity;
    }
    let margin = config.margin as f32;
    Vec2::new(
        turn_axis(position.x, velocity.x, margin, config.width as f32, config),
        turn_axis(position.y, velocity.y, margin, config.height as f32, config),
    )
}

fn turn_axis(
    coord: f32,
    component: f32,
    margin: f32,
    extent: f32,
    config: &SimulationConfig,
) -> f32 {
    let turn = config.turn_factor;
    let near_low = coord < margin;
    let near_high = coord > extent - margin;
    match config.edge_turn {
        EdgeTurn::Exclusive => {
            if near_low {
                component + turn
            } else if near_high {
                component - turn
            } else {
                component
            }
        }
        EdgeTurn::Independent => {
            let mut component = component;
            if near_low {
                component += turn;
            }
            if near_high {
                component -= turn;
            }
            component
        }
    }
}
