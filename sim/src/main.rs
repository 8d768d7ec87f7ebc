//! DFGEO SIM: a command line driver for direction-finding geometry.
//!
//! The program loads a scenario (TOML/JSON/YAML) describing a sensing platform and a set of
//! candidate targets, then either
//!
//! - reports the line of sight, the azimuth/elevation/angle-of-arrival and the measurement
//!   Jacobian for every target (`angles`),
//! - simulates noisy angle measurements and writes them to CSV (`measure`), or
//! - writes a template scenario to start from (`template`).

mod common;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use common::{init_logger, prepare_output_file};
use dfgeo::linearize::geometry_measurement_matrix;
use dfgeo::measurements::{AngleMeasurement, DirectionFindingGeometry};
use dfgeo::scenario::ScenarioConfig;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

const LONG_ABOUT: &str = "DFGEO SIM: a command line driver for direction-finding geometry.

A scenario file describes the sensing platform (ECEF and geodetic position, body attitude and
antenna mounting) and a list of candidate targets. Use the `template` command to generate one.

- angles: report the line of sight, azimuth, elevation, angle-of-arrival and the 3x3 measurement
  matrix (rows azimuth, elevation, aoa; columns longitude, latitude, altitude) for each target.

- measure: simulate Gaussian-perturbed angle measurements for each target and write them to CSV.";

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about = "A command line driver for direction-finding geometry.", long_about = LONG_ABOUT)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Log file path (if not specified, logs to stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

/// Top-level commands
#[derive(Subcommand, Clone)]
enum Command {
    #[command(
        name = "angles",
        about = "Report angles and measurement matrices for a scenario"
    )]
    Angles(AnglesArgs),
    #[command(
        name = "measure",
        about = "Simulate noisy angle measurements to CSV",
        long_about = "Simulate direction-finding angle measurements. For every target and sample the true azimuth, elevation and angle-of-arrival are written next to copies perturbed with zero-mean Gaussian noise."
    )]
    Measure(MeasureArgs),
    #[command(name = "template", about = "Generate a template scenario file")]
    Template(TemplateArgs),
}

#[derive(Args, Clone, Debug)]
struct AnglesArgs {
    /// Scenario file (TOML/JSON/YAML)
    #[arg(short, long, value_parser)]
    config: PathBuf,
}

#[derive(Args, Clone, Debug)]
struct MeasureArgs {
    /// Scenario file (TOML/JSON/YAML)
    #[arg(short, long, value_parser)]
    config: PathBuf,

    /// Output CSV file path
    #[arg(short, long, value_parser)]
    output: PathBuf,

    /// Angle noise standard deviation (radians)
    #[arg(long, default_value_t = 1e-3)]
    noise_std: f64,

    /// Number of samples per target
    #[arg(long, default_value_t = 10)]
    samples: usize,

    /// Time between samples (seconds)
    #[arg(long, default_value_t = 1.0)]
    interval_s: f64,

    /// RNG seed for the measurement noise
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Timestamp of the first sample (RFC 3339, defaults to now)
    #[arg(long)]
    start_time: Option<DateTime<Utc>>,
}

#[derive(Args, Clone, Debug)]
struct TemplateArgs {
    /// Output file path for the scenario.
    /// File extension determines format: .json, .yaml/.yml, or .toml
    #[arg(short, long, value_parser)]
    output: PathBuf,
}

/// One simulated measurement of one target
#[derive(Clone, Debug, Serialize)]
struct AngleSample {
    timestamp: DateTime<Utc>,
    target: usize,
    sample: usize,
    target_longitude: f64,
    target_latitude: f64,
    target_altitude: f64,
    range: f64,
    azimuth: f64,
    elevation: f64,
    aoa: f64,
    azimuth_measured: f64,
    elevation_measured: f64,
    aoa_measured: f64,
}

fn load_geometries(path: &Path) -> Result<Vec<DirectionFindingGeometry>> {
    info!("Loading scenario from {}", path.display());
    let scenario = ScenarioConfig::from_file(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let geometries = scenario
        .geometries()
        .with_context(|| format!("building geometry for {}", path.display()))?;
    info!("Scenario has {} target(s)", geometries.len());
    Ok(geometries)
}

/// Print angles and the measurement matrix for every target
fn run_angles(args: &AnglesArgs) -> Result<()> {
    let geometries = load_geometries(&args.config)?;
    for (index, geometry) in geometries.iter().enumerate() {
        println!("Target {}: {}", index, geometry.target);
        println!("  range: {:.3} m", geometry.range);
        println!("  {}", geometry.los);
        let angles = geometry.angles();
        for measurement in AngleMeasurement::ALL {
            let value = angles.get(measurement);
            println!(
                "  {:>9}: {:>12.6} rad {:>12.6} deg",
                measurement.label(),
                value,
                value.to_degrees()
            );
        }
        if geometry.los.alpha <= 0.0 {
            error!(
                "Target {} is not in front of the antenna array, angles are undefined",
                index
            );
        }
        println!("  measurement matrix:{}", geometry_measurement_matrix(geometry));
    }
    Ok(())
}

/// Sample true and noisy angles for every geometry
fn simulate_samples(
    geometries: &[DirectionFindingGeometry],
    noise_std: f64,
    samples: usize,
    interval_s: f64,
    seed: u64,
    start_time: DateTime<Utc>,
) -> Result<Vec<AngleSample>> {
    anyhow::ensure!(
        noise_std.is_finite() && noise_std >= 0.0,
        "noise standard deviation must be non-negative, got {}",
        noise_std
    );
    let noise = Normal::new(0.0, noise_std)
        .with_context(|| format!("invalid noise standard deviation {}", noise_std))?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut results = Vec::with_capacity(geometries.len() * samples);
    for sample in 0..samples {
        let timestamp = start_time
            + chrono::Duration::milliseconds((sample as f64 * interval_s * 1000.0).round() as i64);
        for (target, geometry) in geometries.iter().enumerate() {
            let angles = geometry.angles();
            results.push(AngleSample {
                timestamp,
                target,
                sample,
                target_longitude: geometry.target.longitude,
                target_latitude: geometry.target.latitude,
                target_altitude: geometry.target.altitude,
                range: geometry.range,
                azimuth: angles.azimuth,
                elevation: angles.elevation,
                aoa: angles.aoa,
                azimuth_measured: angles.azimuth + noise.sample(&mut rng),
                elevation_measured: angles.elevation + noise.sample(&mut rng),
                aoa_measured: angles.aoa + noise.sample(&mut rng),
            });
        }
    }
    Ok(results)
}

fn write_samples(samples: &[AngleSample], output: &Path) -> Result<()> {
    prepare_output_file(output)?;
    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("creating {}", output.display()))?;
    for sample in samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    Ok(())
}

fn run_measure(args: &MeasureArgs) -> Result<()> {
    let geometries = load_geometries(&args.config)?;
    info!(
        "Simulating {} sample(s) per target with noise std {} rad (seed {})",
        args.samples, args.noise_std, args.seed
    );
    let samples = simulate_samples(
        &geometries,
        args.noise_std,
        args.samples,
        args.interval_s,
        args.seed,
        args.start_time.unwrap_or_else(Utc::now),
    )?;
    write_samples(&samples, &args.output)?;
    info!(
        "Wrote {} measurement(s) to {}",
        samples.len(),
        args.output.display()
    );
    Ok(())
}

fn run_template(args: &TemplateArgs) -> Result<()> {
    prepare_output_file(&args.output)?;
    ScenarioConfig::example()
        .to_file(&args.output)
        .with_context(|| format!("writing template {}", args.output.display()))?;
    info!("Template scenario written to {}", args.output.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli.log_level, cli.log_file.as_ref())?;

    let result = match &cli.command {
        Command::Angles(args) => run_angles(args),
        Command::Measure(args) => run_measure(args),
        Command::Template(args) => run_template(args),
    };
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
