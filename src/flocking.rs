use glam::Vec2;

use crate::boid::Boid;
use crate::config;
use crate::gains::GainConfig;
use crate::geometry;
use crate::obstacle::Obstacle;

/// Indices of boids that `index` perceives: within the neighbor radius and
/// inside the field-of-view cone around the forward heading.
///
/// A stationary boid has no defined forward direction; it perceives the full
/// 360 degrees instead of hitting a domain error in the angle computation.
pub fn neighbor_indices(index: usize, boids: &[Boid], fov_degrees: f32) -> Vec<usize> {
    let me = &boids[index];
    let forward = me.heading();
    let full_view = forward == Vec2::ZERO;

    let mut neighbors = Vec::new();
    for (i, other) in boids.iter().enumerate() {
        if i == index {
            continue;
        }
        let offset = other.position - me.position;
        let distance = offset.length();
        if distance >= config::NEIGHBOR_RADIUS {
            continue;
        }
        if full_view || distance <= config::EPS {
            neighbors.push(i);
            continue;
        }
        let dir = offset / distance;
        if geometry::angle_between_degrees(forward, dir) < fov_degrees * 0.5 {
            neighbors.push(i);
        }
    }
    neighbors
}

/// The three classical flocking forces over a precomputed neighbor set.
///
/// Cohesion and alignment average over neighbors; separation is a raw vector
/// sum over the tighter avoid radius, so more close neighbors push
/// proportionally harder. Empty neighbor set yields all-zero forces.
pub fn flock_forces(
    index: usize,
    boids: &[Boid],
    neighbors: &[usize],
    gains: &GainConfig,
) -> (Vec2, Vec2, Vec2) {
    if neighbors.is_empty() {
        return (Vec2::ZERO, Vec2::ZERO, Vec2::ZERO);
    }

    let me = &boids[index];
    let mut center = Vec2::ZERO;
    let mut avg_velocity = Vec2::ZERO;
    let mut avoid = Vec2::ZERO;

    for &i in neighbors {
        let other = &boids[i];
        center += other.position;
        avg_velocity += other.velocity;
        if (me.position - other.position).length() < config::AVOID_RADIUS {
            avoid += me.position - other.position;
        }
    }

    let count = neighbors.len() as f32;
    center /= count;
    avg_velocity /= count;

    let cohesion = (center - me.position) * gains.k_cohesion;
    let alignment = (avg_velocity - me.velocity) * gains.k_alignment;
    let separation = avoid * gains.k_separation;
    (separation, alignment, cohesion)
}

/// Summed inverse-distance repulsion from every obstacle within its avoidance
/// margin.
pub fn obstacle_avoidance(position: Vec2, obstacles: &[Obstacle]) -> Vec2 {
    obstacles
        .iter()
        .filter_map(|obs| obs.repulsion(position))
        .sum()
}

/// Boundary-proximity repulsion computed directly from absolute position.
///
/// Large restoring force near the walls, near-zero at mid-field. Always
/// computed, never gated on a "near wall" test.
pub fn wall_avoidance(position: Vec2, k_wall: f32) -> Vec2 {
    let eps = config::EPS;
    Vec2::new(
        k_wall * (1.0 / (position.x + eps) - 1.0 / (config::WORLD_WIDTH - position.x + eps)),
        k_wall * (1.0 / (position.y + eps) - 1.0 / (config::WORLD_HEIGHT - position.y + eps)),
    )
}

/// Steering toward a target point at full speed. Used by the interactive
/// variant at lowest priority.
pub fn seek(position: Vec2, velocity: Vec2, target: Vec2) -> Vec2 {
    let desired = geometry::normalize_or_zero(target - position) * config::MAX_SPEED;
    desired - velocity
}

/// Which strict priority ordering the allocator consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorityOrder {
    /// separation, obstacle, wall, alignment, cohesion, seek
    CollisionFirst,
    /// obstacle, separation, wall, alignment, cohesion, seek
    ObstacleFirst,
}

/// All force contributions for one boid in one tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForceSet {
    pub separation: Vec2,
    pub obstacle: Vec2,
    pub wall: Vec2,
    pub alignment: Vec2,
    pub cohesion: Vec2,
    pub seek: Vec2,
}

impl ForceSet {
    pub fn in_priority_order(&self, order: PriorityOrder) -> [Vec2; 6] {
        match order {
            PriorityOrder::CollisionFirst => [
                self.separation,
                self.obstacle,
                self.wall,
                self.alignment,
                self.cohesion,
                self.seek,
            ],
            PriorityOrder::ObstacleFirst => [
                self.obstacle,
                self.separation,
                self.wall,
                self.alignment,
                self.cohesion,
                self.seek,
            ],
        }
    }
}

/// Strict lexicographic priority allocation under a total acceleration budget.
///
/// Each force in order gets its full requested magnitude while budget remains.
/// The first force that does not fit is scaled down to consume the rest of the
/// budget in its own direction, and every lower-priority force is dropped for
/// the tick. This is not a weighted blend: a crowded tick can make cohesion
/// and alignment vanish entirely, and that is the intended contract.
pub fn allocate_priority(forces: &[Vec2], max_accel: f32) -> Vec2 {
    let mut total = Vec2::ZERO;
    let mut remaining = max_accel;
    for &force in forces {
        if remaining <= 0.0 {
            break;
        }
        let magnitude = force.length();
        if magnitude <= remaining {
            total += force;
            remaining -= magnitude;
        } else {
            total += geometry::normalize_or_zero(force) * remaining;
            break;
        }
    }
    total
}
