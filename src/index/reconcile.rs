//! Index reconciliation
//!
//! Merges a freshly scanned identity set against the stored index. The new
//! index holds exactly the scanned identities; curated metadata on entries
//! that survive is carried forward, structural fields are regenerated.

use super::{DependencyIndex, IndexEntry, UNKNOWN_VERSION};
use crate::scan::slug;
use std::collections::BTreeSet;

/// Fields derived purely from an identity and the workspace layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralFields {
    pub id: String,
    pub slug: String,
    pub docs_path: String,
    pub required_files: Vec<String>,
}

impl StructuralFields {
    /// Derive the structural fields for `id` under `docs_dir`
    pub fn derive(id: &str, docs_dir: &str, required_files: &[String]) -> Self {
        let slug = slug(id);
        let docs_path = format!("{}/{}/", docs_dir.trim_end_matches('/'), slug);
        Self {
            id: id.to_string(),
            slug,
            docs_path,
            required_files: required_files.to_vec(),
        }
    }
}

/// Build the entry for one identity from its previous state and fresh structure.
///
/// `lastUpdated`, `version`, `links` and unmanaged fields come from `existing`
/// when present; blank curated values fall back to `now` and
/// [`UNKNOWN_VERSION`].
pub fn merge_entry(
    existing: Option<&IndexEntry>,
    fields: StructuralFields,
    now: &str,
) -> IndexEntry {
    let previous = existing.cloned().unwrap_or_default();

    let last_updated = if previous.last_updated.is_empty() {
        now.to_string()
    } else {
        previous.last_updated
    };
    let version = if previous.version.is_empty() {
        UNKNOWN_VERSION.to_string()
    } else {
        previous.version
    };

    IndexEntry {
        name: fields.id.clone(),
        id: fields.id,
        slug: fields.slug,
        docs_path: fields.docs_path,
        last_updated,
        version,
        required_files: fields.required_files,
        links: previous.links,
        extra: previous.extra,
    }
}

/// Outcome of reconciling a scan against the stored index
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// The index that should be persisted
    pub index: DependencyIndex,
    /// Identities absent from the previous index, sorted
    pub added: Vec<String>,
    /// Identities no longer found by the scan, sorted
    pub removed: Vec<String>,
}

impl Reconciliation {
    /// Whether the stored index is out of date
    pub fn changes_made(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// Sorted identities of the new index
    pub fn libraries(&self) -> Vec<String> {
        self.index.libraries.keys().cloned().collect()
    }
}

/// Reconcile `scanned` against `previous`.
///
/// Pure: all inputs are explicit, including the timestamp used for new
/// entries and for the index itself.
pub fn reconcile(
    scanned: &BTreeSet<String>,
    previous: &DependencyIndex,
    docs_dir: &str,
    required_files: &[String],
    now: &str,
) -> Reconciliation {
    let mut index = DependencyIndex {
        libraries: Default::default(),
        last_updated: now.to_string(),
    };
    let mut added = Vec::new();

    for id in scanned {
        let existing = previous.libraries.get(id);
        if existing.is_none() {
            added.push(id.clone());
        }

        let fields = StructuralFields::derive(id, docs_dir, required_files);
        index
            .libraries
            .insert(id.clone(), merge_entry(existing, fields, now));
    }

    let removed = previous
        .ids()
        .filter(|id| !scanned.contains(*id))
        .map(str::to_string)
        .collect();

    Reconciliation {
        index,
        added,
        removed,
    }
}
