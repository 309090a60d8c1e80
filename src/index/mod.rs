//! Persisted dependency documentation index
//!
//! The index is a JSON document mapping each dependency identity to its
//! documentation record:
//!
//! ```json
//! { "libraries": { "<id>": { "id": "...", "paths": ".0kid/docs/<slug>/", ... } },
//!   "lastUpdated": "2024-01-01T00:00:00.000Z" }
//! ```

mod reconcile;

pub use reconcile::{merge_entry, reconcile, Reconciliation, StructuralFields};

use crate::error::{HarvestError, Result};
use crate::repo::read_json_lenient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// File name of the index inside the documentation root
pub const INDEX_FILE: &str = "index.json";

/// Version recorded for newly discovered libraries
pub const UNKNOWN_VERSION: &str = "unknown";

/// Documentation record for one dependency.
///
/// Every field defaults when absent, and a field of the wrong type only
/// loses that field, so hand-edited entries keep their curated values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: String,
    /// Documentation directory, relative to the workspace root
    #[serde(default, rename = "paths", deserialize_with = "lenient_string")]
    pub docs_path: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_updated: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    /// Required documentation files
    #[serde(default, rename = "files", deserialize_with = "lenient_strings")]
    pub required_files: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub links: Vec<String>,
    /// Fields this tool does not manage, carried forward untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Scalar as text: numbers and booleans are stringified, anything else is blank
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// A list of strings; a lone scalar becomes a one-item list
fn lenient_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    })
}

/// The full index document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyIndex {
    #[serde(default)]
    pub libraries: BTreeMap<String, IndexEntry>,
    #[serde(default)]
    pub last_updated: String,
}

impl DependencyIndex {
    /// Load the index, treating a missing or malformed file as empty.
    ///
    /// Individual entries that do not match the expected shape are kept as
    /// present-but-blank so they still count as indexed.
    pub fn load(path: &Path) -> Self {
        let Some(document) = read_json_lenient(path) else {
            return Self::default();
        };

        let libraries = document
            .get("libraries")
            .and_then(Value::as_object)
            .map(|libs| {
                libs.iter()
                    .map(|(id, raw)| {
                        let entry = serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
                            tracing::warn!("Index entry {} is malformed: {}", id, e);
                            IndexEntry::default()
                        });
                        (id.clone(), entry)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let last_updated = document
            .get("lastUpdated")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            libraries,
            last_updated,
        }
    }

    /// Serialized form written to disk
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)? + "\n")
    }

    /// Write the index, creating its parent directory
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HarvestError::io(parent, e))?;
        }
        std::fs::write(path, self.to_json()?).map_err(|e| HarvestError::io(path, e))
    }

    /// Whether an identity has an entry
    pub fn contains(&self, id: &str) -> bool {
        self.libraries.contains_key(id)
    }

    /// Sorted identities
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.libraries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_entry() -> IndexEntry {
        IndexEntry {
            id: "react".to_string(),
            name: "react".to_string(),
            slug: "react".to_string(),
            docs_path: ".0kid/docs/react/".to_string(),
            last_updated: "2024-05-01T10:00:00.000Z".to_string(),
            version: "18.2.0".to_string(),
            required_files: vec!["OVERVIEW.md".to_string()],
            links: vec!["https://react.dev".to_string()],
            extra: Map::new(),
        }
    }

    #[test]
    fn test_wire_format_field_names() {
        let mut index = DependencyIndex::default();
        index.libraries.insert("react".to_string(), sample_entry());
        index.last_updated = "2024-05-02T00:00:00.000Z".to_string();

        let json: Value = serde_json::from_str(&index.to_json().unwrap()).unwrap();
        let entry = &json["libraries"]["react"];
        assert_eq!(entry["paths"], ".0kid/docs/react/");
        assert_eq!(entry["lastUpdated"], "2024-05-01T10:00:00.000Z");
        assert_eq!(entry["files"][0], "OVERVIEW.md");
        assert_eq!(json["lastUpdated"], "2024-05-02T00:00:00.000Z");
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(INDEX_FILE);
        assert!(DependencyIndex::load(&path).libraries.is_empty());

        std::fs::write(&path, "{\"libraries\": ").unwrap();
        assert!(DependencyIndex::load(&path).libraries.is_empty());

        std::fs::write(&path, r#"{"libraries": []}"#).unwrap();
        assert!(DependencyIndex::load(&path).libraries.is_empty());
    }

    #[test]
    fn test_load_tolerates_partial_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(INDEX_FILE);
        std::fs::write(
            &path,
            r#"{"libraries": {"zod": {"version": "3.22"}, "odd": 42, "x": {"owner": "team-a"}}}"#,
        )
        .unwrap();

        let index = DependencyIndex::load(&path);
        assert_eq!(index.ids().collect::<Vec<_>>(), vec!["odd", "x", "zod"]);
        assert_eq!(index.libraries["zod"].version, "3.22");
        assert_eq!(index.libraries["odd"], IndexEntry::default());
        assert_eq!(index.libraries["x"].extra["owner"], "team-a");
    }

    #[test]
    fn test_mistyped_fields_only_lose_themselves() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(INDEX_FILE);
        std::fs::write(
            &path,
            r#"{"libraries": {"pkg": {
                "version": 2,
                "links": ["https://pkg.example", null],
                "lastUpdated": "2020-01-01T00:00:00.000Z",
                "files": null,
                "slug": {"nested": true}
            }}}"#,
        )
        .unwrap();

        let entry = &DependencyIndex::load(&path).libraries["pkg"];
        assert_eq!(entry.version, "2");
        assert_eq!(entry.links, vec!["https://pkg.example"]);
        assert_eq!(entry.last_updated, "2020-01-01T00:00:00.000Z");
        assert!(entry.required_files.is_empty());
        assert_eq!(entry.slug, "");
    }

    #[test]
    fn test_save_creates_parent_and_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".0kid").join("docs").join(INDEX_FILE);
        let mut index = DependencyIndex::default();
        index.libraries.insert("react".to_string(), sample_entry());

        index.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("}\n"));
        assert_eq!(DependencyIndex::load(&path), index);
    }
}
