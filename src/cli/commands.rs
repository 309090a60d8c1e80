//! Command implementations

use super::OutputFormat;
use crate::docs::run_compliance;
use crate::harvest::{run_harvest, HarvestMode, HarvestRun};
use crate::parity::{render_report, ParityVerifier};
use crate::qa::{run_qa, QaOutcome};
use crate::repo::{HarvestConfig, Workspace, CONFIG_DIR, CONFIG_FILE};
use crate::Outcome;
use anyhow::{Context, Result};
use std::path::Path;

/// Resolve the workspace for a command
pub fn open_workspace(path: &Path, no_discover: bool) -> Result<Workspace> {
    let workspace = if no_discover {
        Workspace::at(path)
    } else {
        Workspace::open(path)
    };
    workspace.with_context(|| format!("Failed to open workspace at {:?}", path))
}

/// Reconcile the documentation index
pub fn harvest(workspace: &Workspace, mode: HarvestMode, format: OutputFormat) -> Result<Outcome> {
    let run = run_harvest(workspace, mode).context("Harvester failed")?;

    match format {
        OutputFormat::Json => print_summary_json(&run)?,
        OutputFormat::Text => print_summary_text(&run),
    }

    Ok(run.outcome())
}

/// Verify every dependency in use is documented
pub fn check(workspace: &Workspace, format: OutputFormat) -> Result<Outcome> {
    let report = run_compliance(workspace);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text if report.passed() => println!("{}", report.render()),
        OutputFormat::Text => {
            eprintln!("{}", report.render());
        }
    }

    Ok(if report.passed() {
        Outcome::Clean
    } else {
        Outcome::Drift
    })
}

/// Verify parity pairs
pub fn parity(workspace: &Workspace, unified: bool, format: OutputFormat) -> Result<Outcome> {
    let report = ParityVerifier::new(workspace).with_unified(unified).verify();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => println!("{}", render_report(&report)),
    }

    Ok(if report.success {
        Outcome::Clean
    } else {
        Outcome::Drift
    })
}

/// Run the composite QA gate
pub fn qa(workspace: &Workspace) -> Result<QaOutcome> {
    println!("Running QA composite gate...");
    let (run, report_path) = run_qa(workspace).context("Failed to write QA report")?;
    let outcome = run.outcome();

    println!("Report written to: {}", report_path.display());
    println!("Exit code: {}", outcome.exit_code());

    Ok(outcome)
}

/// Show or reset configuration
pub fn config(workspace: &Workspace, show: bool, reset: bool) -> Result<()> {
    if reset {
        let defaults = HarvestConfig::default();
        defaults
            .save(workspace.root())
            .context("Failed to write default configuration")?;
        println!("✓ Configuration reset to defaults");
        if show {
            print_config(workspace.root(), &defaults);
        }
        return Ok(());
    }

    print_config(workspace.root(), workspace.config());
    Ok(())
}

/// Print the effective configuration
pub fn print_config(root: &Path, config: &HarvestConfig) {
    println!("DocHarvest Configuration");
    println!("========================\n");
    println!("Root: {}", root.display());
    println!("Config file: {}/{}", CONFIG_DIR, CONFIG_FILE);
    println!("Docs directory: {}", config.docs_dir);
    println!("Manifest: {}", config.manifest);
    println!("Reports directory: {}", config.reports_dir);
    println!("Allowed hidden directory: {}", config.allowed_hidden_dir);

    println!("\nScanned extensions: {}", config.scan_extensions.join(" "));

    println!("\nIgnored directories:");
    for dir in &config.ignore_dirs {
        println!("  - {}", dir);
    }

    println!("\nRequired files:");
    for file in &config.required_files {
        println!("  - {}", file);
    }

    println!("\nParity pairs:");
    for pair in &config.parity {
        println!("  - {}: {} <> {}", pair.name, pair.canonical, pair.duplicate);
    }
}

/// Print the harvest summary in JSON format
pub fn print_summary_json(run: &HarvestRun) -> Result<()> {
    let json = serde_json::to_string_pretty(&run.summary())?;
    println!("{}", json);
    Ok(())
}

/// Print the harvest summary in text format
pub fn print_summary_text(run: &HarvestRun) {
    let summary = run.summary();
    let reconciliation = &run.reconciliation;

    println!("Dependency Harvest ({})", mode_label(run.mode));
    println!("==================\n");
    println!("Source files scanned: {}", run.scan.files_scanned);
    println!("Total libraries: {}", summary.total_libraries);
    println!("New libraries: {}", summary.new_libraries);
    println!("Removed libraries: {}", summary.removed_libraries);

    for id in &reconciliation.added {
        println!("  + {}", id);
    }
    for id in &reconciliation.removed {
        println!("  - {}", id);
    }

    if !summary.changes_made {
        println!("\n✓ Index is up to date");
    } else if run.index_written {
        println!(
            "\n✓ Index updated, {} documentation file(s) scaffolded",
            run.scaffolded.len()
        );
    } else {
        println!("\n⚠ Index is out of date (not written)");
    }
}

fn mode_label(mode: HarvestMode) -> &'static str {
    match mode {
        HarvestMode::Write => "write",
        HarvestMode::Check => "check",
        HarvestMode::DryRun => "dry run",
    }
}
