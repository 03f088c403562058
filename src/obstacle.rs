use glam::Vec2;

use crate::config;
use crate::geometry;

/// Static obstacle. Created once per environment setup and immutable for the
/// duration of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Obstacle {
    Circle { center: Vec2, radius: f32 },
    Square { center: Vec2, half_width: f32 },
    Rectangle { center: Vec2, width: f32, height: f32 },
}

impl Obstacle {
    pub fn center(&self) -> Vec2 {
        match *self {
            Obstacle::Circle { center, .. }
            | Obstacle::Square { center, .. }
            | Obstacle::Rectangle { center, .. } => center,
        }
    }

    /// Radius of the circumscribing circle, used for avoidance-distance tests.
    pub fn effective_radius(&self) -> f32 {
        match *self {
            Obstacle::Circle { radius, .. } => radius,
            Obstacle::Square { half_width, .. } => half_width * std::f32::consts::SQRT_2,
            Obstacle::Rectangle { width, height, .. } => {
                ((width * 0.5).powi(2) + (height * 0.5).powi(2)).sqrt()
            }
        }
    }

    /// Exact point-containment test per shape.
    pub fn contains(&self, point: Vec2) -> bool {
        match *self {
            Obstacle::Circle { center, radius } => (point - center).length() < radius,
            Obstacle::Square { center, half_width } => {
                (point.x - center.x).abs() < half_width && (point.y - center.y).abs() < half_width
            }
            Obstacle::Rectangle {
                center,
                width,
                height,
            } => {
                (point.x - center.x).abs() < width * 0.5
                    && (point.y - center.y).abs() < height * 0.5
            }
        }
    }

    /// Inverse-distance repulsion along the outward normal, or `None` when the
    /// point is outside the avoidance margin or exactly at the center.
    ///
    /// The falloff is `1/d`, not `1/d^2`: sharper near-field push without a
    /// singularity thanks to the epsilon in the denominator.
    pub fn repulsion(&self, from: Vec2) -> Option<Vec2> {
        let offset = from - self.center();
        let distance = offset.length();
        let avoid_dist = self.effective_radius() + config::OBSTACLE_AVOID_MARGIN;
        if distance < avoid_dist && distance > 0.0 {
            let outward = geometry::normalize_or_zero(offset);
            Some(outward * (config::OBSTACLE_REPULSION / (distance + config::EPS)))
        } else {
            None
        }
    }
}

/// True when the point lies inside any obstacle in the set.
pub fn any_contains(obstacles: &[Obstacle], point: Vec2) -> bool {
    obstacles.iter().any(|obs| obs.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn circle_containment_is_radius_bounded() {
        let obs = Obstacle::Circle {
            center: vec2(100.0, 100.0),
            radius: 30.0,
        };
        assert!(obs.contains(vec2(110.0, 100.0)));
        assert!(!obs.contains(vec2(131.0, 100.0)));
    }

    #[test]
    fn square_containment_uses_half_width_per_axis() {
        let obs = Obstacle::Square {
            center: vec2(0.0, 0.0),
            half_width: 10.0,
        };
        assert!(obs.contains(vec2(9.0, -9.0)));
        assert!(!obs.contains(vec2(11.0, 0.0)));
        // Corner is outside the inscribed circle but inside the square
        assert!(obs.contains(vec2(9.5, 9.5)));
    }

    #[test]
    fn rectangle_containment_uses_separate_extents() {
        let obs = Obstacle::Rectangle {
            center: vec2(0.0, 0.0),
            width: 100.0,
            height: 20.0,
        };
        assert!(obs.contains(vec2(45.0, 5.0)));
        assert!(!obs.contains(vec2(45.0, 15.0)));
    }

    #[test]
    fn effective_radius_circumscribes_rectangle_corners() {
        let obs = Obstacle::Rectangle {
            center: vec2(0.0, 0.0),
            width: 6.0,
            height: 8.0,
        };
        // Corner at (3, 4) is distance 5 from center
        assert!((obs.effective_radius() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn repulsion_is_none_beyond_avoid_margin() {
        let obs = Obstacle::Circle {
            center: vec2(0.0, 0.0),
            radius: 30.0,
        };
        let far = vec2(30.0 + config::OBSTACLE_AVOID_MARGIN + 1.0, 0.0);
        assert!(obs.repulsion(far).is_none());
    }

    #[test]
    fn repulsion_points_outward_and_grows_when_closer() {
        let obs = Obstacle::Circle {
            center: vec2(0.0, 0.0),
            radius: 30.0,
        };
        let near = obs.repulsion(vec2(10.0, 0.0)).unwrap();
        let farther = obs.repulsion(vec2(40.0, 0.0)).unwrap();
        assert!(near.x > 0.0 && farther.x > 0.0);
        assert!(near.length() > farther.length());
    }

    #[test]
    fn repulsion_at_exact_center_is_none_not_nan() {
        let obs = Obstacle::Circle {
            center: vec2(5.0, 5.0),
            radius: 30.0,
        };
        assert!(obs.repulsion(vec2(5.0, 5.0)).is_none());
    }

    #[test]
    fn any_contains_checks_all_obstacles() {
        let obstacles = vec![
            Obstacle::Circle {
                center: vec2(0.0, 0.0),
                radius: 10.0,
            },
            Obstacle::Square {
                center: vec2(100.0, 100.0),
                half_width: 5.0,
            },
        ];
        assert!(any_contains(&obstacles, vec2(101.0, 99.0)));
        assert!(!any_contains(&obstacles, vec2(50.0, 50.0)));
    }
}
