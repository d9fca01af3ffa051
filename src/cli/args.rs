//! Command line argument parsing for the gamerec CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::output::ArtifactFormat;

/// gamerec - collaborative-filtering game recommendations
#[derive(Parser, Debug, Clone)]
#[command(name = "gamerec")]
#[command(about = "A collaborative-filtering game recommendation engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct GamerecArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Report output format
    #[arg(long = "format", default_value = "human")]
    pub report_format: ReportFormat,

    /// Pretty-print JSON reports
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl GamerecArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model and write top-N recommendations for every user
    Recommend(RecommendArgs),

    /// Show statistics about a crawled inventory file
    Stats(StatsArgs),
}

/// Arguments for the recommend command
#[derive(Parser, Debug, Clone)]
pub struct RecommendArgs {
    /// Inventory file with one JSON record per user
    #[arg(value_name = "INVENTORY_FILE")]
    pub inventory_file: PathBuf,

    /// Directory the recommendation artifact is written to
    #[arg(short, long, default_value = "out")]
    pub output_path: PathBuf,

    /// Artifact format (only json is currently written)
    #[arg(short = 'f', long = "output-format", default_value = "json")]
    pub output_format: ArtifactFormat,

    /// Optional app catalog bounding recommendations to known games
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Number of latent factors of the model
    #[arg(long, default_value = "10")]
    pub factors: usize,

    /// Number of alternating training passes
    #[arg(long, default_value = "10")]
    pub iterations: usize,

    /// Ridge regularization applied to each per-entity solve
    #[arg(long, default_value = "0.1")]
    pub regularization: f32,

    /// Confidence scaling for implicit feedback (raw play time is the
    /// regression target when unset)
    #[arg(long)]
    pub alpha: Option<f32>,

    /// Seed for reproducible factor initialization
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of recommendations per user
    #[arg(short = 'n', long, default_value = "10")]
    pub top_n: usize,

    /// Worker threads for training (default: all logical CPUs)
    #[arg(short, long)]
    pub threads: Option<usize>,
}

/// Arguments for the stats command
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Inventory file with one JSON record per user
    #[arg(value_name = "INVENTORY_FILE")]
    pub inventory_file: PathBuf,
}

/// Report formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
