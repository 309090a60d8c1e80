//! Workspace resolution
//!
//! Every component receives its root explicitly through a [`Workspace`]
//! instead of reading the process working directory.

mod config;

pub use config::{HarvestConfig, ParityPairConfig, CONFIG_DIR, CONFIG_FILE};

use crate::error::{HarvestError, Result};
use git2::Repository as GitRepo;
use std::path::{Path, PathBuf};

/// The tree being harvested, with its configuration
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Path to the workspace root
    root: PathBuf,
    /// Workspace configuration
    config: HarvestConfig,
}

impl Workspace {
    /// Open the workspace containing `path`.
    ///
    /// The root is the enclosing git work tree when there is one, otherwise
    /// `path` itself.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let root = match GitRepo::discover(path) {
            Ok(repo) => match repo.workdir() {
                Some(workdir) => workdir.to_path_buf(),
                None => path.to_path_buf(),
            },
            Err(e) => {
                tracing::debug!("No git work tree above {:?}: {}", path, e.message());
                path.to_path_buf()
            }
        };

        Self::at(root)
    }

    /// Use `root` verbatim as the workspace root
    pub fn at<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(HarvestError::io(
                root,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "workspace root is not a directory",
                ),
            ));
        }

        let config = HarvestConfig::load_or_default(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: HarvestConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the workspace configuration
    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Absolute path of the documentation root
    pub fn docs_root(&self) -> PathBuf {
        self.resolve(&self.config.docs_dir)
    }

    /// Absolute path of the dependency index file
    pub fn index_path(&self) -> PathBuf {
        self.docs_root().join(crate::index::INDEX_FILE)
    }

    /// Absolute path of the dependency manifest
    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.config.manifest)
    }

    /// Absolute path of the QA reports directory
    pub fn reports_dir(&self) -> PathBuf {
        self.resolve(&self.config.reports_dir)
    }

    /// Resolve a root-relative, slash-separated path
    pub fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    /// Slash-separated path of `path` relative to the root
    pub fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

/// Read a JSON object from disk.
///
/// Missing files, unreadable files, malformed JSON and non-object documents
/// all yield `None`.
pub fn read_json_lenient(path: &Path) -> Option<serde_json::Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("Cannot read {:?}: {}", path, e);
            return None;
        }
    };

    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            tracing::warn!("Ignoring {:?}: top-level value is not an object", path);
            None
        }
        Err(e) => {
            tracing::warn!("Ignoring malformed JSON in {:?}: {}", path, e);
            None
        }
    }
}
