use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flockcover::config;
use flockcover::coverage::Normalization;
use flockcover::environment::Environment;
use flockcover::evaluator::{self, EvalOptions};
use flockcover::gains::GainConfig;
use flockcover::report;
use flockcover::search::{self, SearchOptions};

#[derive(Parser)]
#[command(name = "flockcover", about = "Flocking coverage simulation and gain search")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Random-search the flocking gains for maximum coverage.
    Search {
        /// Obstacle layout: no-obstacles, cafeteria, narrow-corridor, dense-cafeteria
        #[arg(long, default_value = "no-obstacles", value_parser = parse_environment)]
        environment: Environment,
        #[arg(long, default_value_t = config::DEFAULT_SEARCH_CANDIDATES)]
        candidates: usize,
        #[arg(long, default_value_t = config::DEFAULT_BOID_COUNT)]
        boids: usize,
        /// Seed for the candidate sampler (not the per-run simulation seeds)
        #[arg(long, default_value_t = 0)]
        sampler_seed: u64,
        /// Output CSV path; defaults to random_search_results_<environment>.csv
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the best candidate as JSON next to the CSV
        #[arg(long)]
        summary: Option<PathBuf>,
        /// Normalize coverage by free area instead of the whole grid
        #[arg(long)]
        free_area: bool,
    },
    /// Evaluate one gain vector across the reference seeds and log uniformity.
    Coverage {
        #[arg(long, default_value = "no-obstacles", value_parser = parse_environment)]
        environment: Environment,
        #[arg(long, default_value_t = 50)]
        boids: usize,
        /// Take the gain vector from the best row of a results CSV
        #[arg(long, conflicts_with_all = ["k_coh", "k_ali", "k_col"])]
        from_results: Option<PathBuf>,
        #[arg(long)]
        k_coh: Option<f32>,
        #[arg(long)]
        k_ali: Option<f32>,
        #[arg(long)]
        k_col: Option<f32>,
        #[arg(long, default_value = "uniformity_log.csv")]
        uniformity_log: PathBuf,
        #[arg(long)]
        free_area: bool,
    },
    /// Print the best row of a previously written results CSV.
    Best {
        file: PathBuf,
    },
}

fn parse_environment(value: &str) -> std::result::Result<Environment, String> {
    Environment::parse_cli(value)
        .ok_or_else(|| format!("unknown environment `{value}` (try no-obstacles, cafeteria, narrow-corridor, dense-cafeteria)"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Search {
            environment,
            candidates,
            boids,
            sampler_seed,
            output,
            summary,
            free_area,
        } => {
            let options = SearchOptions {
                candidates,
                seeds: config::SEARCH_SEEDS.to_vec(),
                eval: EvalOptions {
                    environment,
                    boid_count: boids,
                    duration_ticks: config::SIM_DURATION_TICKS,
                    normalization: normalization(free_area),
                },
            };
            let mut rng = ChaCha8Rng::seed_from_u64(sampler_seed);
            let outcome = search::run_random_search(&options, &mut rng);

            let output = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "random_search_results_{}.csv",
                    environment.label().replace(' ', "_").to_ascii_lowercase()
                ))
            });
            report::write_search_results(&output, &options.seeds, &outcome.results)
                .with_context(|| format!("writing {}", output.display()))?;
            info!(path = %output.display(), rows = outcome.results.len(), "results written");

            let Some(best) = outcome.best() else {
                bail!("no candidate completed a single evaluation");
            };
            println!(
                "Best gain vector: k_coh={}, k_ali={}, k_col={} with {:.2}% average coverage",
                best.gains.k_cohesion,
                best.gains.k_alignment,
                best.gains.k_separation,
                best.average
            );
            if let Some(summary_path) = summary {
                let json = serde_json::to_string_pretty(best)?;
                std::fs::write(&summary_path, json)
                    .with_context(|| format!("writing {}", summary_path.display()))?;
            }
        }
        Command::Coverage {
            environment,
            boids,
            from_results,
            k_coh,
            k_ali,
            k_col,
            uniformity_log,
            free_area,
        } => {
            let gains = match from_results {
                Some(path) => {
                    let best = report::find_best_row(&path)
                        .with_context(|| format!("loading {}", path.display()))?;
                    info!(
                        k_coh = best.k_coh,
                        k_ali = best.k_ali,
                        k_col = best.k_col,
                        average = best.average,
                        "using best row from results file"
                    );
                    GainConfig {
                        k_cohesion: best.k_coh,
                        k_alignment: best.k_ali,
                        k_separation: best.k_col,
                        ..GainConfig::default()
                    }
                }
                None => {
                    let defaults = GainConfig::default();
                    GainConfig {
                        k_cohesion: k_coh.unwrap_or(defaults.k_cohesion),
                        k_alignment: k_ali.unwrap_or(defaults.k_alignment),
                        k_separation: k_col.unwrap_or(defaults.k_separation),
                        ..defaults
                    }
                }
            };

            let options = EvalOptions {
                environment,
                boid_count: boids,
                duration_ticks: config::SIM_DURATION_TICKS,
                normalization: normalization(free_area),
            };
            let mut outcomes = Vec::new();
            for seed in config::SEARCH_SEEDS {
                info!(seed, environment = environment.label(), "running coverage evaluation");
                let outcome = evaluator::evaluate(&options, gains, seed)
                    .context("coverage evaluation failed")?;
                println!(
                    "Seed {}: final coverage {:.2}%",
                    seed, outcome.final_coverage
                );
                if let Some(stats) = outcome.uniformity {
                    println!(
                        "  uniformity: var {:.2}, mean {:.2}, std {:.2}, cv {:.2}",
                        stats.variance, stats.mean, stats.std_dev, stats.coefficient_of_variation
                    );
                }
                outcomes.push(outcome);
            }
            report::append_uniformity_log(&uniformity_log, environment.label(), boids, &outcomes)
                .with_context(|| format!("appending {}", uniformity_log.display()))?;
        }
        Command::Best { file } => {
            let best =
                report::find_best_row(&file).with_context(|| format!("loading {}", file.display()))?;
            println!("Maximum average: {:.2}%", best.average);
            println!(
                "Gain vector: k_coh={}, k_ali={}, k_col={}",
                best.k_coh, best.k_ali, best.k_col
            );
        }
    }
    Ok(())
}

fn normalization(free_area: bool) -> Normalization {
    if free_area {
        Normalization::FreeArea
    } else {
        Normalization::WholeArea
    }
}
