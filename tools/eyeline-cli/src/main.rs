//! Eyeline CLI: replay recorded detections and inspect overlay alignment.
//!
//! Usage:
//!   eyeline replay <FILE>      Run the detection loop over a recording
//!   eyeline align [OPTIONS]    Compute one alignment from eye corners
//!   eyeline config             Print the effective configuration
//!   eyeline check              Validate the reference asset and settings

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyeline_common::config::{AppConfig, LoggingConfig};
use eyeline_overlay_model::Point;

mod commands;

#[derive(Parser)]
#[command(
    name = "eyeline",
    about = "Keep an overlay image aligned with a tracked face",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/eyeline/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the detection loop over a JSONL detection recording
    Replay {
        /// Path to the recording
        path: PathBuf,

        /// Simulated detector latency per frame (milliseconds)
        #[arg(long, default_value = "0")]
        latency_ms: u64,

        /// Do not emit overlay transforms
        #[arg(long)]
        no_overlay: bool,

        /// Do not emit debug eye markers
        #[arg(long)]
        no_landmarks: bool,
    },

    /// Compute a single unsmoothed alignment from four eye corners
    Align {
        /// Left eye outer corner as X,Y
        #[arg(long, value_parser = parse_point)]
        left_outer: Point,

        /// Left eye inner corner as X,Y
        #[arg(long, value_parser = parse_point)]
        left_inner: Point,

        /// Right eye outer corner as X,Y
        #[arg(long, value_parser = parse_point)]
        right_outer: Point,

        /// Right eye inner corner as X,Y
        #[arg(long, value_parser = parse_point)]
        right_inner: Point,
    },

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config path
        #[arg(long)]
        save: bool,
    },

    /// Validate the reference asset and tracking settings
    Check,
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("invalid X '{x}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("invalid Y '{y}': {e}"))?;
    Ok(Point::new(x, y))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display())),
        None => Ok(AppConfig::load()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    eyeline_common::logging::init_logging(&LoggingConfig {
        level,
        json: config.logging.json,
    });
    tracing::debug!(config_path = ?cli.config, "Configuration loaded");

    match cli.command {
        Commands::Replay {
            path,
            latency_ms,
            no_overlay,
            no_landmarks,
        } => commands::replay::run(config, path, latency_ms, !no_overlay, !no_landmarks).await,
        Commands::Align {
            left_outer,
            left_inner,
            right_outer,
            right_inner,
        } => commands::align::run(&config, left_outer, left_inner, right_outer, right_inner),
        Commands::Config { save } => commands::config::run(&config, cli.config, save),
        Commands::Check => commands::check::run(&config),
    }
}
