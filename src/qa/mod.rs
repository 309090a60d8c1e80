//! Composite QA gate
//!
//! Runs the harvester in check mode, applies its fixes when it finds drift,
//! then runs the compliance check and writes a Markdown report. Failures in
//! any step are recorded in the report rather than cutting it short.

use crate::docs::{run_compliance, ComplianceReport};
use crate::error::{HarvestError, Result};
use crate::harvest::{run_harvest, timestamp, HarvestMode, Summary};
use crate::repo::Workspace;
use chrono::Utc;
use std::path::PathBuf;

/// File name of the QA report inside the reports directory
pub const REPORT_FILE: &str = "report-libs.md";

/// Overall result of the composite gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QaOutcome {
    Pass,
    /// The index was stale and could not be updated
    HarvesterGap,
    /// Indexed libraries lack documentation
    ComplianceFailure,
    /// The harvester itself failed
    RuntimeError,
}

impl QaOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            QaOutcome::Pass => 0,
            QaOutcome::HarvesterGap => 1,
            QaOutcome::ComplianceFailure => 2,
            QaOutcome::RuntimeError => 3,
        }
    }
}

/// Everything the composite gate observed
#[derive(Debug, Clone)]
pub struct QaRun {
    /// Harvester check-mode result, or the error message
    pub check: std::result::Result<Summary, String>,
    /// Write-mode result, when the check found drift
    pub auto_fix: Option<std::result::Result<Summary, String>>,
    pub compliance: ComplianceReport,
}

impl QaRun {
    fn needs_update(&self) -> bool {
        matches!(self.check, Ok(ref summary) if summary.changes_made)
    }

    fn auto_fixed(&self) -> bool {
        matches!(self.auto_fix, Some(Ok(_)))
    }

    pub fn outcome(&self) -> QaOutcome {
        if self.check.is_err() {
            QaOutcome::RuntimeError
        } else if self.needs_update() && !self.auto_fixed() {
            QaOutcome::HarvesterGap
        } else if !self.compliance.passed() {
            QaOutcome::ComplianceFailure
        } else {
            QaOutcome::Pass
        }
    }

    /// Render the Markdown report
    pub fn render(&self, generated: &str) -> String {
        let mut lines = Vec::new();

        lines.push("# Library Documentation QA Report".to_string());
        lines.push(String::new());
        lines.push(format!("**Generated:** {}", generated));
        lines.push(String::new());

        lines.push("## Dependency Harvester".to_string());
        lines.push(String::new());
        match &self.check {
            Ok(summary) if summary.changes_made => {
                lines.push("**Status:** ❌ Changes needed".to_string());
                lines.push(String::new());
                lines.push(format!("- Total libraries: {}", summary.total_libraries));
                lines.push(format!("- New libraries: {}", summary.new_libraries));
                lines.push(format!("- Removed libraries: {}", summary.removed_libraries));
                match &self.auto_fix {
                    Some(Ok(_)) => {
                        lines.push(String::new());
                        lines.push("**Auto-fix applied:** ✅ Index updated".to_string());
                    }
                    Some(Err(e)) => {
                        lines.push(String::new());
                        lines.push(format!("**Auto-fix failed:** {}", e));
                    }
                    None => {}
                }
            }
            Ok(summary) => {
                lines.push("**Status:** ✅ Up to date".to_string());
                lines.push(String::new());
                lines.push(format!("- Total libraries: {}", summary.total_libraries));
            }
            Err(e) => {
                lines.push("**Status:** ❌ Error".to_string());
                lines.push(String::new());
                lines.push(format!("**Error:** {}", e));
            }
        }
        lines.push(String::new());

        lines.push("## Documentation Compliance".to_string());
        lines.push(String::new());
        if self.compliance.passed() {
            lines.push("**Status:** ✅ All libraries documented".to_string());
        } else {
            lines.push("**Status:** ❌ Missing documentation".to_string());
        }
        lines.push(String::new());
        lines.push("```".to_string());
        lines.push(self.compliance.render());
        lines.push("```".to_string());
        lines.push(String::new());

        lines.push("## Summary".to_string());
        lines.push(String::new());
        if self.outcome() == QaOutcome::Pass {
            lines.push("**Overall Status:** ✅ PASS - All checks passed".to_string());
        } else {
            lines.push("**Overall Status:** ❌ FAIL - Issues detected".to_string());
            lines.push(String::new());
            lines.push("**Actions needed:**".to_string());
            if self.check.is_err() {
                lines.push("- Investigate the harvester error above".to_string());
            }
            if self.needs_update() && !self.auto_fixed() {
                lines.push("- Run `docharvest harvest` to update the index".to_string());
            }
            if !self.compliance.passed() {
                lines.push("- Add missing library documentation as indicated above".to_string());
            }
        }

        lines.join("\n") + "\n"
    }
}

/// Run the composite gate without writing a report
pub fn run_gate(workspace: &Workspace) -> QaRun {
    let check = run_harvest(workspace, HarvestMode::Check)
        .map(|run| run.summary())
        .map_err(|e| e.to_string());

    let auto_fix = match &check {
        Ok(summary) if summary.changes_made => {
            tracing::info!("Harvester detected changes, applying updates");
            Some(
                run_harvest(workspace, HarvestMode::Write)
                    .map(|run| run.summary())
                    .map_err(|e| e.to_string()),
            )
        }
        _ => None,
    };

    let compliance = run_compliance(workspace);

    QaRun {
        check,
        auto_fix,
        compliance,
    }
}

/// Run the composite gate and write its report; returns the run and report path
pub fn run_qa(workspace: &Workspace) -> Result<(QaRun, PathBuf)> {
    let run = run_gate(workspace);

    let reports_dir = workspace.reports_dir();
    std::fs::create_dir_all(&reports_dir).map_err(|e| HarvestError::io(&reports_dir, e))?;

    let report_path = reports_dir.join(REPORT_FILE);
    std::fs::write(&report_path, run.render(&timestamp(Utc::now())))
        .map_err(|e| HarvestError::io(&report_path, e))?;

    Ok((run, report_path))
}
