//! Documentation compliance check
//!
//! Only existence and structure are judged: every scanned library must be
//! indexed, and every indexed library needs its directory, its required
//! files, and a Markdown heading in each file.

use crate::index::{DependencyIndex, StructuralFields};
use crate::repo::Workspace;
use crate::scan::scan_workspace;
use pulldown_cmark::{Event, Parser, Tag};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Structural problems with one library's documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompleteDocs {
    pub id: String,
    /// Documentation directory, relative to the workspace root
    pub docs_path: String,
    /// Required files that do not exist
    pub missing_files: Vec<String>,
    /// Files that exist but contain no Markdown heading
    pub without_heading: Vec<String>,
}

/// Result of the compliance check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    /// Scanned identities with no index entry, sorted
    pub missing: Vec<String>,
    /// Indexed identities whose documentation is structurally incomplete
    pub incomplete: Vec<IncompleteDocs>,
    /// Number of identities checked
    pub checked: usize,
}

impl ComplianceReport {
    pub fn passed(&self) -> bool {
        self.missing.is_empty() && self.incomplete.is_empty()
    }

    /// Human-readable summary lines
    pub fn render(&self) -> String {
        if self.passed() {
            return format!("Docs check passed ({} libraries).", self.checked);
        }

        let mut lines = Vec::new();
        if !self.missing.is_empty() {
            lines.push(format!("Missing library docs for: {}", self.missing.join(", ")));
            lines.push("Run the harvester to add index entries for these libraries.".to_string());
        }
        for docs in &self.incomplete {
            lines.push(format!("Incomplete docs for {} ({}):", docs.id, docs.docs_path));
            for file in &docs.missing_files {
                lines.push(format!("  missing file: {}", file));
            }
            for file in &docs.without_heading {
                lines.push(format!("  no heading:   {}", file));
            }
        }
        lines.join("\n")
    }
}

/// Whether a Markdown document has at least one heading
pub fn has_heading(markdown: &str) -> bool {
    Parser::new(markdown).any(|event| matches!(event, Event::Start(Tag::Heading { .. })))
}

/// Check `scanned` identities against the index and the files on disk
pub fn check_compliance(
    workspace: &Workspace,
    scanned: &BTreeSet<String>,
    index: &DependencyIndex,
) -> ComplianceReport {
    let config = workspace.config();

    let missing = scanned
        .iter()
        .filter(|id| !index.contains(id))
        .cloned()
        .collect();

    let incomplete = index
        .ids()
        .filter_map(|id| {
            let fields = StructuralFields::derive(id, &config.docs_dir, &config.required_files);
            inspect_library(&workspace.resolve(&fields.docs_path), &fields)
        })
        .collect();

    ComplianceReport {
        missing,
        incomplete,
        checked: scanned.len(),
    }
}

/// Scan the workspace and check it against the stored index
pub fn run_compliance(workspace: &Workspace) -> ComplianceReport {
    let scan = scan_workspace(workspace);
    let index = DependencyIndex::load(&workspace.index_path());
    check_compliance(workspace, &scan.identities(), &index)
}

fn inspect_library(dir: &Path, fields: &StructuralFields) -> Option<IncompleteDocs> {
    let mut missing_files = Vec::new();
    let mut without_heading = Vec::new();

    for file_name in &fields.required_files {
        match std::fs::read_to_string(dir.join(file_name)) {
            Ok(content) if has_heading(&content) => {}
            Ok(_) => without_heading.push(file_name.clone()),
            Err(_) => missing_files.push(file_name.clone()),
        }
    }

    if missing_files.is_empty() && without_heading.is_empty() {
        return None;
    }

    Some(IncompleteDocs {
        id: fields.id.clone(),
        docs_path: fields.docs_path.clone(),
        missing_files,
        without_heading,
    })
}
