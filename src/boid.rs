use std::collections::VecDeque;

use glam::{vec2, Vec2};
use rand::Rng;
use thiserror::Error;

use crate::config;
use crate::geometry;
use crate::obstacle::{self, Obstacle};

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("no obstacle-free spawn position found after {attempts} attempts")]
    NoFreeSpace { attempts: u32 },
}

/// One flocking agent. The trail exists only for rendering; core logic never
/// reads it.
#[derive(Clone, Debug)]
pub struct Boid {
    pub position: Vec2,
    pub velocity: Vec2,
    pub trail: VecDeque<Vec2>,
}

impl Boid {
    /// Place a boid at a random obstacle-free position with a random heading
    /// at full speed.
    ///
    /// Rejection sampling is bounded: a layout that leaves no free spawn area
    /// is a configuration error, not an infinite loop.
    pub fn spawn(obstacles: &[Obstacle], rng: &mut impl Rng) -> Result<Self, SpawnError> {
        for _ in 0..config::MAX_SPAWN_ATTEMPTS {
            let pos = vec2(
                rng.gen_range(config::SPAWN_MARGIN..config::WORLD_WIDTH - config::SPAWN_MARGIN),
                rng.gen_range(config::SPAWN_MARGIN..config::WORLD_HEIGHT - config::SPAWN_MARGIN),
            );
            if !obstacle::any_contains(obstacles, pos) {
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                return Ok(Self {
                    position: pos,
                    velocity: vec2(angle.cos(), angle.sin()) * config::MAX_SPEED,
                    trail: VecDeque::new(),
                });
            }
        }
        Err(SpawnError::NoFreeSpace {
            attempts: config::MAX_SPAWN_ATTEMPTS,
        })
    }

    /// Unit forward direction, zero when the boid is stationary.
    pub fn heading(&self) -> Vec2 {
        geometry::normalize_or_zero(self.velocity)
    }

    /// Append the current position to the trail, dropping the oldest entry
    /// beyond the configured length.
    pub fn push_trail(&mut self) {
        if config::TRAIL_LENGTH == 0 {
            return;
        }
        self.trail.push_back(self.position);
        while self.trail.len() > config::TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn spawn_avoids_obstacle_interiors() {
        // Cover most of the spawn area with one big circle; the free sliver
        // that remains must still be found
        let obstacles = vec![Obstacle::Circle {
            center: vec2(400.0, 300.0),
            radius: 300.0,
        }];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            let boid = Boid::spawn(&obstacles, &mut rng).unwrap();
            assert!(!obstacle::any_contains(&obstacles, boid.position));
        }
    }

    #[test]
    fn spawn_fails_when_layout_has_no_free_area() {
        let obstacles = vec![Obstacle::Rectangle {
            center: vec2(config::WORLD_WIDTH * 0.5, config::WORLD_HEIGHT * 0.5),
            width: config::WORLD_WIDTH * 2.0,
            height: config::WORLD_HEIGHT * 2.0,
        }];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            Boid::spawn(&obstacles, &mut rng),
            Err(SpawnError::NoFreeSpace { .. })
        ));
    }

    #[test]
    fn spawned_boids_move_at_max_speed() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let boid = Boid::spawn(&[], &mut rng).unwrap();
        assert!((boid.velocity.length() - config::MAX_SPEED).abs() < 1e-4);
    }

    #[test]
    fn trail_is_bounded_and_drops_oldest_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut boid = Boid::spawn(&[], &mut rng).unwrap();
        for i in 0..(config::TRAIL_LENGTH + 10) {
            boid.position = vec2(i as f32, 0.0);
            boid.push_trail();
        }
        assert_eq!(boid.trail.len(), config::TRAIL_LENGTH);
        assert_eq!(boid.trail.front().copied(), Some(vec2(10.0, 0.0)));
    }
}
