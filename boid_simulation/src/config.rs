use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grid cells are this much wider than the visible range so that any pair
/// within range always shares a cell or sits in adjacent ones.
pub const CELL_SLACK: f32 = 1.1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("world must be at least 1x1, got {width}x{height}")]
    EmptyWorld { width: u32, height: u32 },
    #[error("{0} must be finite")]
    NonFinite(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("min_speed {min} exceeds max_speed {max}")]
    SpeedBand { min: f32, max: f32 },
    #[error("protected_range {protected} must be below visible_range {visible}")]
    RangeOrder { protected: f32, visible: f32 },
    #[error("capture_radius {capture} must be below visible_range {visible}")]
    CaptureReach { capture: f32, visible: f32 },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What to do with a boid whose velocity comes out exactly zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nudge {
    /// Push it at `min_speed` along 45 degrees. Reproducible.
    #[default]
    FixedAngle,
    /// Draw each axis from `[-min_speed, min_speed]`, then rescale to `min_speed`.
    Random,
}

/// How the two edges of one axis combine when a boid is inside both margins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeTurn {
    /// Low edge first, high edge only if the low one did not fire.
    #[default]
    Exclusive,
    /// Every edge checked on its own; opposing corrections may cancel.
    Independent,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pursuit {
    /// Chase the single closest prey found in the 3x3 cell scan.
    Nearest,
    /// Head for the centre of all visible prey at half max speed, wander otherwise.
    #[default]
    Centroid,
}

/// Tuning for one flock. Every tick reads it, nothing in the core mutates it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub visible_range: f32,
    pub protected_range: f32,
    pub avoid_factor: f32,
    pub matching_factor: f32,
    pub centering_factor: f32,
    pub turn_factor: f32,
    /// Predator-to-prey distance at which prey is caught. Zero means only an
    /// exact positional match counts.
    pub capture_radius: f32,
    /// Lower bound on the distance used when weighting flee vectors.
    pub safe_distance: f32,
    /// Per-axis bound of the random kick an idle predator receives.
    pub wander_strength: f32,
    pub nudge: Nudge,
    pub edge_turn: EdgeTurn,
    pub pursuit: Pursuit,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            margin: 10,
            min_speed: 0.5,
            max_speed: 3.0,
            visible_range: 40.0,
            protected_range: 2.0,
            avoid_factor: 0.05,
            matching_factor: 0.05,
            centering_factor: 0.0005,
            turn_factor: 0.2,
            capture_radius: 0.0,
            safe_distance: 1.0,
            wander_strength: 0.2,
            nudge: Nudge::FixedAngle,
            edge_turn: EdgeTurn::Exclusive,
            pursuit: Pursuit::Centroid,
        }
    }
}

impl SimulationConfig {
    /// Load a JSON config; missing fields fall back to [`Default`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyWorld {
                width: self.width,
                height: self.height,
            });
        }

        let scalars = [
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("visible_range", self.visible_range),
            ("protected_range", self.protected_range),
            ("avoid_factor", self.avoid_factor),
            ("matching_factor", self.matching_factor),
            ("centering_factor", self.centering_factor),
            ("turn_factor", self.turn_factor),
            ("capture_radius", self.capture_radius),
            ("safe_distance", self.safe_distance),
            ("wander_strength", self.wander_strength),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite(*name));
        }

        if self.min_speed < 0.0 {
            return Err(ConfigError::Negative("min_speed"));
        }
        if self.min_speed > self.max_speed {
            return Err(ConfigError::SpeedBand {
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        if self.protected_range < 0.0 {
            return Err(ConfigError::Negative("protected_range"));
        }
        if self.protected_range >= self.visible_range {
            return Err(ConfigError::RangeOrder {
                protected: self.protected_range,
                visible: self.visible_range,
            });
        }
        if self.capture_radius < 0.0 {
            return Err(ConfigError::Negative("capture_radius"));
        }
        // The neighbour scan only reaches one cell out, so captures beyond
        // the visible range would depend on where the grid lines fall.
        if self.capture_radius >= self.visible_range {
            return Err(ConfigError::CaptureReach {
                capture: self.capture_radius,
                visible: self.visible_range,
            });
        }
        if self.safe_distance < 0.0 {
            return Err(ConfigError::Negative("safe_distance"));
        }
        if self.wander_strength < 0.0 {
            return Err(ConfigError::Negative("wander_strength"));
        }
        Ok(())
    }

    pub fn cell_size(&self) -> f32 {
        self.visible_range * CELL_SLACK
    }
}
