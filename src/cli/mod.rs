//! CLI interface using clap
//!
//! Provides the command-line interface for DocHarvest

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};

/// DocHarvest - dependency documentation harvester
#[derive(Parser, Debug)]
#[command(name = "docharvest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path inside the workspace (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    pub path: String,

    /// Use --path as the root instead of the enclosing git work tree
    #[arg(long, global = true)]
    pub no_discover: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile the documentation index with the dependencies in use
    Harvest(HarvestArgs),

    /// Verify every dependency in use has documentation
    Check(CheckArgs),

    /// Verify removed duplicate files have not reappeared
    Parity(ParityArgs),

    /// Run harvest, auto-fix and compliance, and write a QA report
    Qa(QaArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for harvest command
#[derive(Parser, Debug)]
pub struct HarvestArgs {
    /// Compute without writing; exit non-zero when the index is stale
    #[arg(long, conflicts_with = "dry_run")]
    pub check: bool,

    /// Compute and report without writing
    #[arg(long)]
    pub dry_run: bool,
}

impl HarvestArgs {
    pub fn mode(&self) -> crate::HarvestMode {
        if self.check {
            crate::HarvestMode::Check
        } else if self.dry_run {
            crate::HarvestMode::DryRun
        } else {
            crate::HarvestMode::Write
        }
    }
}

/// Arguments for check command
#[derive(Parser, Debug)]
pub struct CheckArgs {}

/// Arguments for parity command
#[derive(Parser, Debug)]
pub struct ParityArgs {
    /// Include a full unified diff for diverging duplicates
    #[arg(short, long)]
    pub unified: bool,
}

/// Arguments for qa command
#[derive(Parser, Debug)]
pub struct QaArgs {}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Write the default configuration file
    #[arg(long)]
    pub reset: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
