//! Strategic deconfliction from the command line.
//!
//! Usage:
//!   deconflict analyze --scenario scenario.json --pretty
//!   deconflict analyze --scenario traffic.json --primary-waypoints route.csv --start 0 --end 600
//!   deconflict trajectory --waypoints route.csv --start 0 --end 600 --time-step 2 --smooth 0.1
//!
//! Parameters resolve environment first (`DECONFLICT_*`), then the
//! scenario's `parameters` block, then flags. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use deconflict_cli::{
    load_scenario, load_waypoints, AnalysisOutput, Config, ParameterOverrides, TrajectoryOutput,
};
use deconflict_core::{DeconflictionEngine, Mission, TrajectoryCalculator};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit status when the primary mission is not cleared
const EXIT_CONFLICTS: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "UAV strategic deconfliction in shared airspace")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a primary mission against other traffic
    Analyze(AnalyzeArgs),
    /// Sample a single mission into a trajectory
    Trajectory(TrajectoryArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Scenario JSON with `primary`, `others` and optional `parameters`
    #[arg(long)]
    scenario: PathBuf,

    /// Replace the scenario's primary with an `x,y,z,t` waypoint file
    #[arg(long, requires_all = ["start", "end"])]
    primary_waypoints: Option<PathBuf>,

    /// Mission id for --primary-waypoints
    #[arg(long, default_value = "PRIMARY")]
    id: String,

    /// Mission window start for --primary-waypoints, seconds
    #[arg(long)]
    start: Option<f64>,

    /// Mission window end for --primary-waypoints, seconds
    #[arg(long)]
    end: Option<f64>,

    #[command(flatten)]
    parameters: ParameterArgs,

    /// Hazard zone radius as a multiple of the safety buffer
    #[arg(long, default_value_t = 1.5)]
    zone_expansion: f64,

    /// Include sampled trajectories in the output
    #[arg(long)]
    include_trajectories: bool,

    /// Exit with status 2 when conflicts are found
    #[arg(long)]
    fail_on_conflict: bool,
}

#[derive(Args, Debug)]
struct ParameterArgs {
    /// Safety buffer, meters
    #[arg(long)]
    safety_buffer: Option<f64>,

    /// Sampling interval, seconds
    #[arg(long)]
    time_step: Option<f64>,

    /// Temporal reuse window in multiples of the time step
    #[arg(long)]
    temporal_window_steps: Option<f64>,

    /// Only report simultaneous (spatial) conflicts
    #[arg(long)]
    no_temporal: bool,
}

impl ParameterArgs {
    fn overrides(&self) -> ParameterOverrides {
        ParameterOverrides {
            safety_buffer: self.safety_buffer,
            time_step: self.time_step,
            temporal_window_steps: self.temporal_window_steps,
            detect_temporal: self.no_temporal.then_some(false),
        }
    }
}

#[derive(Args, Debug)]
struct TrajectoryArgs {
    /// `x,y,z,t` waypoint file
    #[arg(long)]
    waypoints: PathBuf,

    #[arg(long, default_value = "PRIMARY")]
    id: String,

    /// Mission window start, seconds
    #[arg(long)]
    start: f64,

    /// Mission window end, seconds
    #[arg(long)]
    end: f64,

    /// Sampling interval, seconds (defaults to DECONFLICT_TIME_STEP or 5)
    #[arg(long)]
    time_step: Option<f64>,

    /// Ease sharp turns by this factor in [0, 1]
    #[arg(long)]
    smooth: Option<f64>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Analyze(args) => analyze(args, cli.pretty),
        Command::Trajectory(args) => trajectory(args, cli.pretty),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn analyze(args: AnalyzeArgs, pretty: bool) -> Result<ExitCode> {
    let scenario = load_scenario(&args.scenario)?;

    let primary = match &args.primary_waypoints {
        Some(path) => {
            let waypoints = load_waypoints(path)?;
            let (start, end) = args
                .start
                .zip(args.end)
                .context("--primary-waypoints needs --start and --end")?;
            Mission::new(args.id.clone(), waypoints, start, end)
                .with_context(|| format!("invalid primary mission from {}", path.display()))?
        }
        None => scenario.primary,
    };

    let config = Config::from_env()
        .apply(&scenario.parameters)
        .apply(&args.parameters.overrides());
    let engine_config = config.engine_config();
    tracing::info!(
        primary_id = primary.mission_id(),
        others = scenario.others.len(),
        safety_buffer_m = engine_config.safety_buffer_m,
        time_step_s = engine_config.time_step_s,
        "analysing mission"
    );

    let engine = DeconflictionEngine::new(engine_config.clone());
    let analysis = engine
        .analyze_missions(&primary, &scenario.others)
        .context("analysis failed")?;
    let is_safe = analysis.report.is_safe();
    tracing::info!(
        is_safe,
        conflicts = analysis.report.conflicts().len(),
        "analysis complete"
    );

    let output = AnalysisOutput::new(
        engine_config,
        analysis,
        args.zone_expansion,
        args.include_trajectories,
    );
    print_json(&output, pretty)?;

    if args.fail_on_conflict && !is_safe {
        return Ok(ExitCode::from(EXIT_CONFLICTS));
    }
    Ok(ExitCode::SUCCESS)
}

fn trajectory(args: TrajectoryArgs, pretty: bool) -> Result<ExitCode> {
    let waypoints = load_waypoints(&args.waypoints)?;
    let mission = Mission::new(args.id, waypoints, args.start, args.end)
        .context("invalid mission")?;
    let time_step = args
        .time_step
        .unwrap_or_else(|| Config::from_env().time_step_s);

    let calculator = TrajectoryCalculator::new();
    let mut trajectory = calculator
        .compute_primary(&mission, time_step)
        .context("trajectory computation failed")?;
    if let Some(factor) = args.smooth {
        trajectory = calculator
            .smooth(&trajectory, factor)
            .context("smoothing failed")?;
    }
    print_json(&TrajectoryOutput::new(trajectory), pretty)?;
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}
