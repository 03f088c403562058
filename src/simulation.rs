use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::boid::{Boid, SpawnError};
use crate::config;
use crate::environment::Environment;
use crate::flocking::{self, ForceSet, PriorityOrder};
use crate::gains::GainConfig;
use crate::geometry;
use crate::obstacle::Obstacle;

/// One simulation instance: boid population, obstacle set, gains, and its own
/// seeded RNG. Each instance is fully isolated, so independent evaluations can
/// run in parallel without shared state.
pub struct SimState {
    pub boids: Vec<Boid>,
    pub obstacles: Vec<Obstacle>,
    pub gains: GainConfig,
    pub order: PriorityOrder,
    pub target: Option<Vec2>,
    pub rng: ChaCha8Rng,
    pub tick_count: u64,
}

impl SimState {
    pub fn new(
        environment: Environment,
        boid_count: usize,
        gains: GainConfig,
        seed: u64,
    ) -> Result<Self, SpawnError> {
        let obstacles = environment.build();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut boids = Vec::with_capacity(boid_count);
        for _ in 0..boid_count {
            boids.push(Boid::spawn(&obstacles, &mut rng)?);
        }
        Ok(Self {
            boids,
            obstacles,
            gains,
            order: PriorityOrder::CollisionFirst,
            target: None,
            rng,
            tick_count: 0,
        })
    }

    /// Replace the gain snapshot. Called by the UI collaborator between ticks.
    pub fn set_gains(&mut self, gains: GainConfig) {
        self.gains = gains;
    }

    /// Set or clear the seek target used by the lowest-priority force.
    pub fn set_target(&mut self, target: Option<Vec2>) {
        self.target = target;
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    /// Grow or shrink the population between ticks. New boids spawn at random
    /// obstacle-free positions; excess boids are dropped from the tail.
    pub fn set_population(&mut self, count: usize) -> Result<(), SpawnError> {
        while self.boids.len() < count {
            let boid = Boid::spawn(&self.obstacles, &mut self.rng)?;
            self.boids.push(boid);
        }
        self.boids.truncate(count);
        Ok(())
    }

    /// Advance every boid by one tick.
    ///
    /// Boids update sequentially in place: later boids in iteration order
    /// observe already-updated earlier boids within the same tick. This keeps
    /// a single population buffer at the cost of iteration-order sensitivity.
    pub fn tick(&mut self) {
        for i in 0..self.boids.len() {
            let neighbors = flocking::neighbor_indices(i, &self.boids, self.gains.fov_degrees);
            let (separation, alignment, cohesion) =
                flocking::flock_forces(i, &self.boids, &neighbors, &self.gains);
            let position = self.boids[i].position;
            let velocity = self.boids[i].velocity;
            let forces = ForceSet {
                separation,
                obstacle: flocking::obstacle_avoidance(position, &self.obstacles),
                wall: flocking::wall_avoidance(position, self.gains.k_wall),
                alignment,
                cohesion,
                seek: match self.target {
                    Some(target) => flocking::seek(position, velocity, target),
                    None => Vec2::ZERO,
                },
            };
            let acceleration = flocking::allocate_priority(
                &forces.in_priority_order(self.order),
                self.gains.max_accel,
            );

            let boid = &mut self.boids[i];
            boid.velocity =
                geometry::clamp_to_length(boid.velocity + acceleration, config::MAX_SPEED);
            boid.position += boid.velocity;
            boid.push_trail();
        }
        self.tick_count += 1;
    }
}
