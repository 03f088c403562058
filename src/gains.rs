use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config;

/// Behavior gain configuration. The UI collaborator or the search harness
/// produces a fresh snapshot; the core never reads gains from ambient state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GainConfig {
    pub k_cohesion: f32,
    pub k_alignment: f32,
    pub k_separation: f32,
    pub k_wall: f32,
    pub max_accel: f32,
    pub fov_degrees: f32,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            k_cohesion: 0.1,
            k_alignment: 0.05,
            k_separation: 0.01,
            k_wall: config::DEFAULT_WALL_GAIN,
            max_accel: config::DEFAULT_MAX_ACCEL,
            fov_degrees: config::FOV_ANGLE_DEGREES,
        }
    }
}

impl GainConfig {
    /// Sample a random candidate for the search harness. Only the three
    /// flocking gains vary; wall gain and acceleration budget stay fixed.
    pub fn sample_search(rng: &mut impl Rng) -> Self {
        Self {
            k_cohesion: rng.gen_range(0.0..config::MAX_K_COH),
            k_alignment: rng.gen_range(0.0..config::MAX_K_ALI),
            k_separation: rng.gen_range(0.0..config::MAX_K_COL),
            ..Self::default()
        }
    }
}
