//! Source tree traversal

use crate::repo::Workspace;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Lazily enumerate candidate source files under the workspace root.
///
/// Directories named in `ignore_dirs` (by name or root-relative path) are
/// pruned, as are hidden directories other than `allowed_hidden_dir`.
/// Subtrees that cannot be read are skipped. Every call starts a fresh walk.
pub fn source_files(workspace: &Workspace) -> impl Iterator<Item = PathBuf> + '_ {
    WalkDir::new(workspace.root())
        .into_iter()
        .filter_entry(move |entry| keep_entry(workspace, entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(move |entry| !entry.file_type().is_dir() && is_candidate(workspace, entry))
        .map(DirEntry::into_path)
}

fn keep_entry(workspace: &Workspace, entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }

    let config = workspace.config();
    let name = entry.file_name().to_string_lossy();
    let relative = workspace.relative(entry.path()).unwrap_or_default();

    if config.is_ignored_dir(&name, &relative) {
        return false;
    }

    !name.starts_with('.') || name == config.allowed_hidden_dir.as_str()
}

fn is_candidate(workspace: &Workspace, entry: &DirEntry) -> bool {
    entry
        .path()
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| workspace.config().is_scanned_extension(ext))
        .unwrap_or(false)
}
