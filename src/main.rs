// src/main.rs
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use territory_map::debug::write_territory_svg;
use territory_map::territory::{
    JsonFileSink, JsonFileSource, PipelineConfig, Schedule, TerritoryPipeline, report::leaderboard,
};

/// Territory map - Voronoi-Gebiete je Besitzer, in Quadratmeilen
#[derive(Parser, Debug)]
#[command(name = "territory_map", version, about)]
struct Cli {
    /// JSON array of { owner_id, latitude, longitude }
    #[arg(long, value_name = "FILE", env = "TERRITORY_INPUT")]
    input: PathBuf,

    /// Where per-owner totals are written (replaced atomically each cycle)
    #[arg(long, value_name = "FILE", env = "TERRITORY_OUTPUT")]
    output: PathBuf,

    /// Optional pipeline config (JSON); CLI flags override it
    #[arg(long, value_name = "FILE", env = "TERRITORY_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds between cycle starts
    #[arg(long, env = "TERRITORY_INTERVAL_SECS")]
    interval: Option<u64>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Stop after this many cycles
    #[arg(long)]
    max_cycles: Option<usize>,

    /// Minimum ray length for unbounded cells; 0 derives it from the point spread
    #[arg(long)]
    radius: Option<f64>,

    /// Also write an SVG map after each published cycle
    #[arg(long, value_name = "FILE")]
    svg: Option<PathBuf>,

    /// Print the ranked totals after each published cycle
    #[arg(long)]
    leaderboard: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match PipelineConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => PipelineConfig::default(),
    };
    if let Some(secs) = cli.interval {
        config = config.with_interval_secs(secs);
    }
    if let Some(radius) = cli.radius {
        config.geometry = if radius == 0.0 {
            config.geometry.with_auto_radius()
        } else {
            config.geometry.with_radius(radius)
        };
    }
    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let bounds = config.geometry.bounds;
    let period = config.interval();
    let svg_path = cli.svg.clone();
    let print_leaderboard = cli.leaderboard;

    let pipeline = TerritoryPipeline::new(
        config,
        JsonFileSource::new(cli.input.clone()),
        JsonFileSink::new(cli.output.clone()),
    );
    let mut pipeline = match pipeline {
        Ok(pipeline) => pipeline.on_published(move |report| {
            if let Some(path) = &svg_path {
                if let Err(e) = write_territory_svg(path, &bounds, report, 1024.0) {
                    warn!("SVG export to '{}' failed: {e}", path.display());
                }
            }
            if print_leaderboard {
                println!("{}", leaderboard(&report.totals));
            }
        }),
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let schedule = if cli.once {
        Schedule::Once
    } else {
        Schedule::Interval {
            period,
            max_cycles: cli.max_cycles,
        }
    };
    info!(
        "Starting territory pipeline: {} -> {} ({:?})",
        cli.input.display(),
        cli.output.display(),
        schedule
    );

    let summary = pipeline.run(schedule);
    info!(
        "Done: {} cycles, {} published, {} without data, {} failed",
        summary.cycles, summary.published, summary.no_data, summary.failed
    );

    if cli.once && summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
