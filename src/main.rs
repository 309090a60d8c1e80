//! DocHarvest - dependency documentation harvester
//!
//! Keeps a per-library documentation index in step with the dependencies a
//! source tree actually uses, and guards against reappearing duplicates of
//! canonical configuration files.

use clap::Parser;
use docharvest::cli::{self, Cli, Commands};
use docharvest::Outcome;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit codes for a gate that finished without drift, found drift, or failed
struct ExitCodes {
    drift: u8,
    failure: u8,
}

const HARVEST_CODES: ExitCodes = ExitCodes { drift: 1, failure: 3 };
const CHECK_CODES: ExitCodes = ExitCodes { drift: 1, failure: 2 };
const PARITY_CODES: ExitCodes = ExitCodes { drift: 1, failure: 1 };
const QA_FAILURE: u8 = 3;
const CONFIG_FAILURE: u8 = 1;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let path = Path::new(&cli.path);
    let workspace = match cli::open_workspace(path, cli.no_discover) {
        Ok(workspace) => workspace,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(failure_code(&cli.command));
        }
    };

    // Execute command
    match cli.command {
        Commands::Harvest(args) => gate(
            cli::harvest(&workspace, args.mode(), cli.format),
            &HARVEST_CODES,
            "Harvester error",
        ),

        Commands::Check(_) => gate(
            cli::check(&workspace, cli.format),
            &CHECK_CODES,
            "Docs check error",
        ),

        Commands::Parity(args) => gate(
            cli::parity(&workspace, args.unified, cli.format),
            &PARITY_CODES,
            "Parity check error",
        ),

        Commands::Qa(_) => match cli::qa(&workspace) {
            Ok(outcome) => ExitCode::from(outcome.exit_code() as u8),
            Err(e) => {
                eprintln!("QA composite error: {:#}", e);
                ExitCode::from(QA_FAILURE)
            }
        },

        Commands::Config(args) => match cli::config(&workspace, args.show, args.reset) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                ExitCode::from(CONFIG_FAILURE)
            }
        },
    }
}

/// Map a gate result to its exit code
fn gate(result: anyhow::Result<Outcome>, codes: &ExitCodes, label: &str) -> ExitCode {
    match result {
        Ok(Outcome::Clean) => ExitCode::SUCCESS,
        Ok(Outcome::Drift) => ExitCode::from(codes.drift),
        Err(e) => {
            eprintln!("{}: {:#}", label, e);
            ExitCode::from(codes.failure)
        }
    }
}

fn failure_code(command: &Commands) -> u8 {
    match command {
        Commands::Harvest(_) => HARVEST_CODES.failure,
        Commands::Check(_) => CHECK_CODES.failure,
        Commands::Parity(_) => PARITY_CODES.failure,
        Commands::Qa(_) => QA_FAILURE,
        Commands::Config(_) => CONFIG_FAILURE,
    }
}
