use serde::Serialize;

use crate::boid::SpawnError;
use crate::config;
use crate::coverage::{CoverageGrid, Normalization, UniformityStats};
use crate::environment::Environment;
use crate::gains::GainConfig;
use crate::simulation::SimState;

/// Parameters of one fixed-duration coverage evaluation.
#[derive(Clone, Copy, Debug)]
pub struct EvalOptions {
    pub environment: Environment,
    pub boid_count: usize,
    pub duration_ticks: u64,
    pub normalization: Normalization,
}

impl EvalOptions {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            boid_count: config::DEFAULT_BOID_COUNT,
            duration_ticks: config::SIM_DURATION_TICKS,
            normalization: Normalization::WholeArea,
        }
    }
}

/// Result of one evaluation run.
#[derive(Clone, Debug, Serialize)]
pub struct EvalOutcome {
    pub seed: u64,
    /// Cumulative percent coverage sampled once per simulated second.
    pub coverage_series: Vec<f32>,
    pub final_coverage: f32,
    pub uniformity: Option<UniformityStats>,
}

/// Run one isolated simulation for the configured tick count, stamping every
/// boid footprint onto a fresh coverage grid each tick.
///
/// Duration is tick-driven, never wall-clock, so identical inputs produce
/// bit-identical outputs.
pub fn evaluate(
    options: &EvalOptions,
    gains: GainConfig,
    seed: u64,
) -> Result<EvalOutcome, SpawnError> {
    let mut sim = SimState::new(options.environment, options.boid_count, gains, seed)?;
    let mut grid = CoverageGrid::new(
        config::WORLD_WIDTH as usize,
        config::WORLD_HEIGHT as usize,
        &sim.obstacles,
    );

    let mut coverage_series = Vec::with_capacity((options.duration_ticks / config::TICK_RATE) as usize);
    for tick in 0..options.duration_ticks {
        sim.tick();
        for boid in &sim.boids {
            grid.stamp(boid.position);
        }
        if (tick + 1) % config::TICK_RATE == 0 {
            coverage_series.push(grid.coverage_percent(options.normalization));
        }
    }

    Ok(EvalOutcome {
        seed,
        final_coverage: grid.coverage_percent(options.normalization),
        coverage_series,
        uniformity: grid.uniformity(),
    })
}
