//! Workspace configuration for DocHarvest

use crate::error::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration directory kept at the workspace root
pub const CONFIG_DIR: &str = ".0kid";

/// Name of the configuration file inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "harvest.toml";

/// Configuration for a workspace being harvested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Documentation root, relative to the workspace root
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Dependency manifest, relative to the workspace root
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// File extensions (with leading dot) considered for import scanning
    #[serde(default = "default_scan_extensions")]
    pub scan_extensions: Vec<String>,

    /// Directory names or root-relative paths pruned from the walk
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    /// The one hidden directory that is still walked
    #[serde(default = "default_allowed_hidden_dir")]
    pub allowed_hidden_dir: String,

    /// Files every library documentation directory must contain
    #[serde(default = "default_required_files")]
    pub required_files: Vec<String>,

    /// Where the composite QA report is written
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,

    /// Canonical/duplicate file pairs checked by the parity gate
    #[serde(default = "default_parity_pairs")]
    pub parity: Vec<ParityPairConfig>,
}

/// A canonical file and the duplicate that must not reappear
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParityPairConfig {
    /// Display name
    pub name: String,
    /// Source of truth, relative to the workspace root
    pub canonical: String,
    /// Duplicate copy, relative to the workspace root
    pub duplicate: String,
}

fn default_docs_dir() -> String {
    ".0kid/docs".to_string()
}

fn default_manifest() -> String {
    "package.json".to_string()
}

fn default_scan_extensions() -> Vec<String> {
    [
        ".js", ".ts", ".mjs", ".cjs", ".jsx", ".tsx", ".py", ".go", ".rs", ".rb", ".cs",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_ignore_dirs() -> Vec<String> {
    [
        "node_modules",
        ".git",
        ".github",
        ".idea",
        ".vscode",
        "dist",
        "build",
        "out",
        ".next",
        ".cache",
        ".venv",
        "venv",
        "__pycache__",
        "target",
        "bin",
        "obj",
        ".0kid/docs",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_allowed_hidden_dir() -> String {
    CONFIG_DIR.to_string()
}

fn default_required_files() -> Vec<String> {
    vec![
        "OVERVIEW.md".to_string(),
        "USAGE.md".to_string(),
        "PITFALLS.md".to_string(),
        "LINKS.md".to_string(),
    ]
}

fn default_reports_dir() -> String {
    ".0kid/qa_reports".to_string()
}

fn default_parity_pairs() -> Vec<ParityPairConfig> {
    vec![
        ParityPairConfig {
            name: "unified-agents.yaml".to_string(),
            canonical: ".0kid/unified-agents.yaml".to_string(),
            duplicate: ".0kid/fusion/unified-agents.yaml".to_string(),
        },
        ParityPairConfig {
            name: "methodology-bridge.json".to_string(),
            canonical: ".0kid/methodology-bridge.json".to_string(),
            duplicate: ".0kid/fusion/methodology-bridge.json".to_string(),
        },
    ]
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            manifest: default_manifest(),
            scan_extensions: default_scan_extensions(),
            ignore_dirs: default_ignore_dirs(),
            allowed_hidden_dir: default_allowed_hidden_dir(),
            required_files: default_required_files(),
            reports_dir: default_reports_dir(),
            parity: default_parity_pairs(),
        }
    }
}

impl HarvestConfig {
    /// Load configuration from the workspace or return defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| HarvestError::io(&config_path, e))?;
        toml::from_str(&content).map_err(|e| HarvestError::Config {
            path: config_path,
            message: e.to_string(),
        })
    }

    /// Save configuration to the workspace
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).map_err(|e| HarvestError::io(&config_dir, e))?;

        let config_path = config_dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self).map_err(|e| HarvestError::Config {
            path: config_path.clone(),
            message: e.to_string(),
        })?;

        std::fs::write(&config_path, content).map_err(|e| HarvestError::io(&config_path, e))
    }

    /// Check whether a file extension is scanned. Case-insensitive.
    pub fn is_scanned_extension(&self, ext: &str) -> bool {
        let dotted = format!(".{}", ext.to_lowercase());
        self.scan_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&dotted))
    }

    /// Check whether a directory is pruned, by bare name or by root-relative path
    pub fn is_ignored_dir(&self, name: &str, relative: &str) -> bool {
        self.ignore_dirs
            .iter()
            .any(|ignored| ignored == name || ignored == relative)
    }
}
