//! Dependency documentation harvester
//!
//! Scans the workspace, reconciles the result against the stored index,
//! scaffolds documentation for new libraries and writes the index back when
//! it changed. Check and dry-run modes compute everything but write nothing.

use crate::docs::ensure_library_docs;
use crate::error::Result;
use crate::index::{reconcile, DependencyIndex, Reconciliation};
use crate::repo::Workspace;
use crate::scan::{scan_workspace, ScanResult};
use crate::Outcome;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// What a harvest run is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HarvestMode {
    /// Scaffold new docs and write the index when it changed
    #[default]
    Write,
    /// Compute only; drift is a gate failure
    Check,
    /// Compute only and report; never fails the gate
    DryRun,
}

impl HarvestMode {
    pub fn writes(&self) -> bool {
        matches!(self, HarvestMode::Write)
    }
}

/// Machine-readable summary of a harvest run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_libraries: usize,
    pub new_libraries: usize,
    pub removed_libraries: usize,
    pub changes_made: bool,
    /// Every identity in the reconciled index, sorted
    pub libraries: Vec<String>,
}

impl From<&Reconciliation> for Summary {
    fn from(result: &Reconciliation) -> Self {
        Self {
            total_libraries: result.index.libraries.len(),
            new_libraries: result.added.len(),
            removed_libraries: result.removed.len(),
            changes_made: result.changes_made(),
            libraries: result.libraries(),
        }
    }
}

/// Everything a harvest run computed and did
#[derive(Debug, Clone)]
pub struct HarvestRun {
    pub mode: HarvestMode,
    pub scan: ScanResult,
    pub reconciliation: Reconciliation,
    /// Documentation files created by this run
    pub scaffolded: Vec<PathBuf>,
    /// Whether the index file was rewritten
    pub index_written: bool,
}

impl HarvestRun {
    pub fn summary(&self) -> Summary {
        Summary::from(&self.reconciliation)
    }

    /// Gate outcome: only a check run with pending changes is drift
    pub fn outcome(&self) -> Outcome {
        if self.mode == HarvestMode::Check && self.reconciliation.changes_made() {
            Outcome::Drift
        } else {
            Outcome::Clean
        }
    }
}

/// ISO-8601 timestamp with millisecond precision, as stored in the index
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Run the harvester against the workspace
pub fn run_harvest(workspace: &Workspace, mode: HarvestMode) -> Result<HarvestRun> {
    run_harvest_at(workspace, mode, Utc::now())
}

/// Run the harvester with an explicit clock
pub fn run_harvest_at(
    workspace: &Workspace,
    mode: HarvestMode,
    now: DateTime<Utc>,
) -> Result<HarvestRun> {
    let config = workspace.config();
    let scan = scan_workspace(workspace);

    let index_path = workspace.index_path();
    let previous = DependencyIndex::load(&index_path);

    let reconciliation = reconcile(
        &scan.identities(),
        &previous,
        &config.docs_dir,
        &config.required_files,
        &timestamp(now),
    );

    tracing::info!(
        "Reconciled {} libraries ({} new, {} removed)",
        reconciliation.index.libraries.len(),
        reconciliation.added.len(),
        reconciliation.removed.len()
    );

    let mut scaffolded = Vec::new();
    let mut index_written = false;

    if mode.writes() {
        let docs_root = workspace.docs_root();
        for id in &reconciliation.added {
            let entry = &reconciliation.index.libraries[id];
            scaffolded.extend(ensure_library_docs(
                &docs_root,
                id,
                &entry.slug,
                &config.required_files,
            )?);
        }

        if reconciliation.changes_made() {
            reconciliation.index.save(&index_path)?;
            index_written = true;
            tracing::info!("Wrote {:?}", index_path);
        } else {
            tracing::debug!("Index unchanged; leaving {:?} untouched", index_path);
        }
    }

    Ok(HarvestRun {
        mode,
        scan,
        reconciliation,
        scaffolded,
        index_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "cmd/main.go", "package main\n\nimport \"pkg/sub\"\n");
        create_file(dir.path(), "tools/gen.py", "from pkg2.mod import x\n");
        dir
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(timestamp(at(1)), "2025-03-01T12:00:00.000Z");
    }

    #[test]
    fn test_end_to_end_against_empty_index() {
        let dir = sample_tree();
        let ws = Workspace::at(dir.path()).unwrap();

        let run = run_harvest_at(&ws, HarvestMode::Write, at(1)).unwrap();
        let summary = run.summary();

        assert_eq!(summary.total_libraries, 2);
        assert_eq!(summary.new_libraries, 2);
        assert_eq!(summary.removed_libraries, 0);
        assert!(summary.changes_made);
        assert_eq!(summary.libraries, vec!["pkg", "pkg2"]);
        assert!(run.index_written);
        assert_eq!(run.outcome(), Outcome::Clean);

        for slug in ["pkg", "pkg2"] {
            let mut files: Vec<String> = fs::read_dir(ws.docs_root().join(slug))
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            files.sort();
            assert_eq!(files, vec!["LINKS.md", "OVERVIEW.md", "PITFALLS.md", "USAGE.md"]);
        }
    }

    #[test]
    fn test_second_run_leaves_index_byte_identical() {
        let dir = sample_tree();
        let ws = Workspace::at(dir.path()).unwrap();

        run_harvest_at(&ws, HarvestMode::Write, at(1)).unwrap();
        let before = fs::read(ws.index_path()).unwrap();

        let second = run_harvest_at(&ws, HarvestMode::Write, at(2)).unwrap();
        assert!(!second.summary().changes_made);
        assert!(!second.index_written);
        assert!(second.scaffolded.is_empty());
        assert_eq!(fs::read(ws.index_path()).unwrap(), before);
    }

    #[test]
    fn test_check_mode_reports_drift_without_writing() {
        let dir = sample_tree();
        let ws = Workspace::at(dir.path()).unwrap();

        let run = run_harvest_at(&ws, HarvestMode::Check, at(1)).unwrap();
        assert_eq!(run.outcome(), Outcome::Drift);
        assert!(!ws.index_path().exists());
        assert!(!ws.docs_root().exists());
    }

    #[test]
    fn test_dry_run_never_fails_the_gate() {
        let dir = sample_tree();
        let ws = Workspace::at(dir.path()).unwrap();

        let run = run_harvest_at(&ws, HarvestMode::DryRun, at(1)).unwrap();
        assert!(run.summary().changes_made);
        assert_eq!(run.outcome(), Outcome::Clean);
        assert!(!ws.index_path().exists());
    }

    #[test]
    fn test_removed_dependency_rewrites_index() {
        let dir = sample_tree();
        let ws = Workspace::at(dir.path()).unwrap();
        run_harvest_at(&ws, HarvestMode::Write, at(1)).unwrap();

        fs::remove_file(dir.path().join("tools/gen.py")).unwrap();
        let run = run_harvest_at(&ws, HarvestMode::Write, at(2)).unwrap();

        assert_eq!(run.summary().removed_libraries, 1);
        assert!(run.index_written);
        let index = DependencyIndex::load(&ws.index_path());
        assert_eq!(index.ids().collect::<Vec<_>>(), vec!["pkg"]);
        // Docs for removed libraries stay on disk
        assert!(ws.docs_root().join("pkg2").join("OVERVIEW.md").exists());
    }

    #[test]
    fn test_custom_metadata_survives_rerun() {
        let dir = sample_tree();
        let ws = Workspace::at(dir.path()).unwrap();
        run_harvest_at(&ws, HarvestMode::Write, at(1)).unwrap();

        let mut index = DependencyIndex::load(&ws.index_path());
        let entry = index.libraries.get_mut("pkg").unwrap();
        entry.version = "2.1.0".to_string();
        entry.links = vec!["https://pkg.example/docs".to_string()];
        index.save(&ws.index_path()).unwrap();

        // A new dependency forces a rewrite
        create_file(dir.path(), "web/app.js", "import chalk from 'chalk';\n");
        let run = run_harvest_at(&ws, HarvestMode::Write, at(2)).unwrap();
        assert!(run.index_written);

        let reloaded = DependencyIndex::load(&ws.index_path());
        assert_eq!(reloaded.libraries["pkg"].version, "2.1.0");
        assert_eq!(reloaded.libraries["pkg"].links, vec!["https://pkg.example/docs"]);
        assert_eq!(reloaded.libraries["chalk"].version, "unknown");
    }

    #[test]
    fn test_mistyped_version_keeps_curated_metadata() {
        let dir = sample_tree();
        let ws = Workspace::at(dir.path()).unwrap();
        create_file(
            dir.path(),
            ".0kid/docs/index.json",
            r#"{"libraries": {"pkg": {
                "version": 2,
                "links": ["https://pkg.example"],
                "lastUpdated": "2020-01-01T00:00:00.000Z"
            }}}"#,
        );
        create_file(dir.path(), "web/app.js", "import chalk from 'chalk';\n");

        let run = run_harvest_at(&ws, HarvestMode::Write, at(2)).unwrap();
        assert!(run.index_written);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(ws.index_path()).unwrap()).unwrap();
        let pkg = &written["libraries"]["pkg"];
        assert_eq!(pkg["links"][0], "https://pkg.example");
        assert_eq!(pkg["lastUpdated"], "2020-01-01T00:00:00.000Z");
        assert_eq!(pkg["version"], "2");
        assert_eq!(written["libraries"]["chalk"]["version"], "unknown");
    }
}
