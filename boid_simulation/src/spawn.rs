use glam::Vec2;
use rand::Rng;

use crate::boid::{Boid, Role};
use crate::config::SimulationConfig;

/// Scatter `prey` then `predators` inside the margins with random headings.
///
/// Indices run `0..prey + predators`, prey first. Velocity components are
/// drawn from `[-max_speed / 2, max_speed / 2]`.
pub fn populate<R: Rng + ?Sized>(
    prey: usize,
    predators: usize,
    config: &SimulationConfig,
    rng: &mut R,
) -> Vec<Boid> {
    let (x_lo, x_hi) = span(config.margin, config.width);
    let (y_lo, y_hi) = span(config.margin, config.height);
    let half = config.max_speed / 2.0;

    (0..prey + predators)
        .map(|index| {
            let role = if index < prey {
                Role::Prey
            } else {
                Role::Predator
            };
            let position = Vec2::new(
                rng.random_range(x_lo..=x_hi),
                rng.random_range(y_lo..=y_hi),
            );
            let velocity = Vec2::new(
                rng.random_range(-half..=half),
                rng.random_range(-half..=half),
            );
            Boid::new(index, position, velocity, role)
        })
        .collect()
}

// Falls back to the whole axis when the margins overlap.
fn span(margin: u32, extent: u32) -> (f32, f32) {
    let lo = margin as f32;
    let hi = extent as f32 - margin as f32;
    if hi < lo {
        (0.0, extent.saturating_sub(1) as f32)
    } else {
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn indices_are_contiguous_and_predators_last() {
        let config = SimulationConfig::default();
        let boids = populate(10, 3, &config, &mut SmallRng::seed_from_u64(0));
        assert_eq!(boids.len(), 13);
        for (slot, boid) in boids.iter().enumerate() {
            assert_eq!(boid.index(), slot);
            assert_eq!(boid.is_predator(), slot >= 10);
        }
    }

    #[test]
    fn boids_start_inside_margins() {
        let config = SimulationConfig::default();
        let margin = config.margin as f32;
        let half = config.max_speed / 2.0;
        for boid in populate(500, 0, &config, &mut SmallRng::seed_from_u64(4)) {
            let p = boid.position();
            assert!(p.x >= margin && p.x <= config.width as f32 - margin);
            assert!(p.y >= margin && p.y <= config.height as f32 - margin);
            assert!(boid.velocity().x.abs() <= half && boid.velocity().y.abs() <= half);
        }
    }

    #[test]
    fn tiny_world_ignores_margins() {
        let config = SimulationConfig {
            width: 5,
            height: 5,
            margin: 10,
            ..SimulationConfig::default()
        };
        for boid in populate(50, 0, &config, &mut SmallRng::seed_from_u64(2)) {
            let p = boid.position();
            assert!((0.0..=4.0).contains(&p.x) && (0.0..=4.0).contains(&p.y));
        }
    }
}
