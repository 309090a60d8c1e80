//! Per-library documentation on disk
//!
//! Scaffolding creates placeholder files for newly indexed libraries and never
//! touches files that already exist. The compliance check verifies that each
//! indexed library has its documentation files in place.

mod compliance;

pub use compliance::{
    check_compliance, has_heading, run_compliance, ComplianceReport, IncompleteDocs,
};

use crate::error::{HarvestError, Result};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Placeholder content for a freshly scaffolded file
pub fn placeholder(library: &str, file_name: &str) -> String {
    let topic = file_name.strip_suffix(".md").unwrap_or(file_name);
    format!(
        "# {} - {}\n\nTODO: Add {} documentation for {}\n",
        library,
        topic,
        topic.to_lowercase(),
        library
    )
}

/// Ensure `<docs_root>/<slug>/` exists and holds every required file.
///
/// Returns the files that were created; existing files are left as they are.
pub fn ensure_library_docs(
    docs_root: &Path,
    library: &str,
    slug: &str,
    required_files: &[String],
) -> Result<Vec<PathBuf>> {
    let lib_dir = docs_root.join(slug);
    std::fs::create_dir_all(&lib_dir).map_err(|e| HarvestError::io(&lib_dir, e))?;

    let mut created = Vec::new();
    for file_name in required_files {
        let path = lib_dir.join(file_name);

        // create_new refuses to open a file that is already there
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(HarvestError::io(&path, e)),
        };

        file.write_all(placeholder(library, file_name).as_bytes())
            .map_err(|e| HarvestError::io(&path, e))?;
        tracing::debug!("Scaffolded {:?}", path);
        created.push(path);
    }

    Ok(created)
}
