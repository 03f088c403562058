// All tunable simulation constants in one place.

// World
pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 600.0;
pub const SPAWN_MARGIN: f32 = 50.0;

// Boids
pub const DEFAULT_BOID_COUNT: usize = 100;
pub const NEIGHBOR_RADIUS: f32 = 50.0;
pub const AVOID_RADIUS: f32 = 20.0;
pub const MAX_SPEED: f32 = 5.0;
pub const TRAIL_LENGTH: usize = 25;
pub const FOV_ANGLE_DEGREES: f32 = 150.0;

// Epsilon guard for normalize / inverse-distance denominators
pub const EPS: f32 = 1e-10;

// Simulation
pub const TICK_RATE: u64 = 60;
pub const SIM_DURATION_SECS: u64 = 60;
pub const SIM_DURATION_TICKS: u64 = TICK_RATE * SIM_DURATION_SECS;

// Obstacle avoidance
pub const OBSTACLE_AVOID_MARGIN: f32 = 40.0;
pub const OBSTACLE_REPULSION: f32 = 500.0;

// Defaults for gains held fixed during search
pub const DEFAULT_WALL_GAIN: f32 = 10.0;
pub const DEFAULT_MAX_ACCEL: f32 = 0.5;

// Coverage footprint radius per boid, in grid cells
pub const COVERAGE_RADIUS: i32 = 2;

// Spawn placement rejection sampling
pub const MAX_SPAWN_ATTEMPTS: u32 = 10_000;

// Parameter search
pub const SEARCH_SEEDS: [u64; 3] = [27, 729, 4913];
pub const DEFAULT_SEARCH_CANDIDATES: usize = 2000;
pub const MAX_K_COH: f32 = 0.5;
pub const MAX_K_ALI: f32 = 0.1;
pub const MAX_K_COL: f32 = 0.5;

// Layout seed for the randomized dense cafeteria placement
pub const DENSE_LAYOUT_SEED: u64 = 100;
