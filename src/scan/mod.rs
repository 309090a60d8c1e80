//! Dependency reference scanning
//!
//! This module turns a source tree into a set of dependency identities:
//! - Walking candidate source files
//! - Extracting raw import specifiers with per-dialect pattern tables
//! - Normalizing specifiers to top-level identities
//! - Reading dependencies declared in the project manifest

pub mod dialect;
pub mod manifest;
pub mod normalize;
pub mod walker;

pub use dialect::{Dialect, DialectRegistry, ModuleSyntax, REGISTRY};
pub use manifest::read_manifest;
pub use normalize::{is_external, normalize, slug, top_level};
pub use walker::source_files;

use crate::repo::Workspace;
use std::collections::BTreeSet;
use std::path::Path;

/// Identities found in one workspace, by source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Identities referenced by source files
    pub imports: BTreeSet<String>,
    /// Identities declared in the manifest
    pub manifest: BTreeSet<String>,
    /// Number of source files read
    pub files_scanned: usize,
}

impl ScanResult {
    /// Union of both sources, sorted
    pub fn identities(&self) -> BTreeSet<String> {
        self.imports.union(&self.manifest).cloned().collect()
    }
}

/// Identities referenced by a single file's content.
///
/// Files without a registered dialect yield nothing.
pub fn file_identities(path: &Path, content: &str) -> BTreeSet<String> {
    let Some(dialect) = REGISTRY.get_for_file(path) else {
        return BTreeSet::new();
    };

    let syntax = dialect.syntax();
    dialect
        .extract(content)
        .iter()
        .filter_map(|raw| normalize(raw, syntax))
        .collect()
}

/// Scan every candidate source file under the workspace.
///
/// Files that cannot be read as UTF-8 text are skipped.
pub fn scan_imports(workspace: &Workspace) -> (BTreeSet<String>, usize) {
    let mut found = BTreeSet::new();
    let mut files_scanned = 0;

    for path in source_files(workspace) {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                files_scanned += 1;
                found.extend(file_identities(&path, &content));
            }
            Err(e) => {
                tracing::debug!("Skipping unreadable file {:?}: {}", path, e);
            }
        }
    }

    (found, files_scanned)
}

/// Scan source files and the manifest
pub fn scan_workspace(workspace: &Workspace) -> ScanResult {
    let (imports, files_scanned) = scan_imports(workspace);
    let manifest = read_manifest(&workspace.manifest_path());

    tracing::info!(
        "Scanned {} source files: {} imported, {} declared",
        files_scanned,
        imports.len(),
        manifest.len()
    );

    ScanResult {
        imports,
        manifest,
        files_scanned,
    }
}
