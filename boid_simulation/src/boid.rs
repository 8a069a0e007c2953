use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Prey,
    Predator,
}

/// A single flock member.
///
/// `index` doubles as the boid's slot in the owning list, so the stepper can
/// commit results without searching. `speed` is the cached magnitude of
/// `velocity` as of the last committed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boid {
    index: usize,
    position: Vec2,
    velocity: Vec2,
    speed: f32,
    role: Role,
    alive: bool,
}

impl Boid {
    pub fn new(index: usize, position: Vec2, velocity: Vec2, role: Role) -> Self {
        Self {
            index,
            position,
            velocity,
            speed: velocity.length(),
            role,
            alive: true,
        }
    }

    pub fn prey(index: usize, position: Vec2, velocity: Vec2) -> Self {
        Self::new(index, position, velocity, Role::Prey)
    }

    pub fn predator(index: usize, position: Vec2, velocity: Vec2) -> Self {
        Self::new(index, position, velocity, Role::Predator)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_predator(&self) -> bool {
        self.role == Role::Predator
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn apply(&mut self, state: BoidState) {
        match state {
            BoidState::Moved {
                position,
                velocity,
                speed,
            } => {
                self.position = position;
                self.velocity = velocity;
                self.speed = speed;
            }
            BoidState::Captured => self.alive = false,
        }
    }
}

/// Outcome computed for one boid during the compute phase, applied at commit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoidState {
    Moved {
        position: Vec2,
        velocity: Vec2,
        speed: f32,
    },
    /// Caught by a predator; motion is left as it was before the tick.
    Captured,
}
