//! Declared dependencies from the project manifest

use super::dialect::ModuleSyntax;
use super::normalize::normalize;
use crate::repo::read_json_lenient;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// Manifest sections that declare dependencies
pub const DEPENDENCY_SECTIONS: &[&str] = &[
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Read dependency identities declared in a `package.json`-style manifest.
///
/// A missing or malformed manifest contributes nothing.
pub fn read_manifest(path: &Path) -> BTreeSet<String> {
    match read_json_lenient(path) {
        Some(manifest) => manifest_dependencies(&manifest),
        None => BTreeSet::new(),
    }
}

/// Dependency identities from an already-parsed manifest
pub fn manifest_dependencies(manifest: &Value) -> BTreeSet<String> {
    DEPENDENCY_SECTIONS
        .iter()
        .filter_map(|section| manifest.get(*section).and_then(Value::as_object))
        .flat_map(|deps| deps.keys())
        .filter_map(|name| normalize(name, ModuleSyntax::Path))
        .collect()
}
