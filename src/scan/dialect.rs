//! Per-dialect import pattern tables
//!
//! Extraction is purely syntactic. Each dialect owns a small regex table and
//! returns the raw specifiers it finds; classification and normalization
//! happen later in [`super::normalize`], so adding a dialect never touches
//! them. Import-like text inside comments is matched like real code.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// How a dialect spells module paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleSyntax {
    /// Slash-separated package paths (`lodash/fp`, `@scope/name`)
    Path,
    /// Dot-separated module paths (`os.path`, `System.Text`)
    Dotted,
}

/// An import pattern table for one source dialect
pub trait Dialect: Send + Sync {
    /// Dialect name
    fn name(&self) -> &'static str;

    /// File extensions handled by this dialect, without the leading dot
    fn extensions(&self) -> &[&'static str];

    /// How specifiers of this dialect are split into segments
    fn syntax(&self) -> ModuleSyntax;

    /// Raw specifiers referenced by `content`, duplicates included
    fn extract(&self, content: &str) -> Vec<String>;
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("import pattern must compile")
}

/// First capture group of every match
fn captures<'a>(re: &'a Regex, content: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    re.captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
}

// ==================== JavaScript / TypeScript ====================

static JS_IMPORT: Lazy<Regex> =
    Lazy::new(|| compile(r#"\bimport\s+(?:[^'"]+?\s+from\s+)?["']([^"']+)["']"#));
static JS_DYNAMIC: Lazy<Regex> = Lazy::new(|| compile(r#"\bimport\(\s*["']([^"']+)["']\s*\)"#));
static JS_REQUIRE: Lazy<Regex> = Lazy::new(|| compile(r#"\brequire\(\s*["']([^"']+)["']\s*\)"#));

/// ESM imports, dynamic `import()` and CommonJS `require()`
pub struct JavaScript;

impl Dialect for JavaScript {
    fn name(&self) -> &'static str {
        "javascript"
    }

    fn extensions(&self) -> &[&'static str] {
        &["js", "ts", "mjs", "cjs", "jsx", "tsx"]
    }

    fn syntax(&self) -> ModuleSyntax {
        ModuleSyntax::Path
    }

    fn extract(&self, content: &str) -> Vec<String> {
        [&*JS_IMPORT, &*JS_DYNAMIC, &*JS_REQUIRE]
            .into_iter()
            .flat_map(|re| captures(re, content))
            .map(str::to_string)
            .collect()
    }
}

// ==================== Python ====================

static PY_IMPORT: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*import\s+([a-zA-Z0-9_\.]+)"));
static PY_FROM: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^\s*from\s+([a-zA-Z0-9_\.]+)\s+import\s+"));

/// `import pkg.mod` and `from pkg.mod import name`
pub struct Python;

impl Dialect for Python {
    fn name(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &[&'static str] {
        &["py"]
    }

    fn syntax(&self) -> ModuleSyntax {
        ModuleSyntax::Dotted
    }

    fn extract(&self, content: &str) -> Vec<String> {
        [&*PY_IMPORT, &*PY_FROM]
            .into_iter()
            .flat_map(|re| captures(re, content))
            .map(str::to_string)
            .collect()
    }
}

// ==================== Go ====================

static GO_IMPORT: Lazy<Regex> =
    Lazy::new(|| compile(r#"(?m)^\s*import\s+(?:[A-Za-z_.][A-Za-z0-9_]*\s+)?"([^"]+)""#));
static GO_IMPORT_BLOCK: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*import\s*\(\s*([\s\S]*?)\)"));
static GO_QUOTED: Lazy<Regex> = Lazy::new(|| compile(r#""([^"]+)""#));

/// Single-line imports and parenthesised import blocks
pub struct Go;

impl Dialect for Go {
    fn name(&self) -> &'static str {
        "go"
    }

    fn extensions(&self) -> &[&'static str] {
        &["go"]
    }

    fn syntax(&self) -> ModuleSyntax {
        ModuleSyntax::Path
    }

    fn extract(&self, content: &str) -> Vec<String> {
        let mut found: Vec<String> = captures(&GO_IMPORT, content).map(str::to_string).collect();

        // Block interiors need a second pass to pull out each quoted path
        for block in captures(&GO_IMPORT_BLOCK, content) {
            found.extend(captures(&GO_QUOTED, block).map(str::to_string));
        }

        found
    }
}

// ==================== Rust ====================

static RS_EXTERN: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*extern\s+crate\s+([a-zA-Z0-9_]+)"));
static RS_USE: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*use\s+([a-zA-Z0-9_]+)::"));

/// Path roots that always name the current crate
const RUST_LOCAL_ROOTS: &[&str] = &["crate", "self", "super"];

/// `extern crate name` and `use name::...`
pub struct Rust;

impl Dialect for Rust {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn extensions(&self) -> &[&'static str] {
        &["rs"]
    }

    fn syntax(&self) -> ModuleSyntax {
        ModuleSyntax::Path
    }

    fn extract(&self, content: &str) -> Vec<String> {
        [&*RS_EXTERN, &*RS_USE]
            .into_iter()
            .flat_map(|re| captures(re, content))
            .filter(|name| !RUST_LOCAL_ROOTS.contains(name))
            .map(str::to_string)
            .collect()
    }
}

// ==================== Ruby ====================

static RB_REQUIRE: Lazy<Regex> =
    Lazy::new(|| compile(r#"(?m)^\s*require(_relative)?\s+["']([^"']+)["']"#));

/// `require 'gem'`; `require_relative` targets are local files
pub struct Ruby;

impl Dialect for Ruby {
    fn name(&self) -> &'static str {
        "ruby"
    }

    fn extensions(&self) -> &[&'static str] {
        &["rb"]
    }

    fn syntax(&self) -> ModuleSyntax {
        ModuleSyntax::Path
    }

    fn extract(&self, content: &str) -> Vec<String> {
        RB_REQUIRE
            .captures_iter(content)
            .filter(|c| c.get(1).is_none())
            .filter_map(|c| c.get(2))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

// ==================== C# ====================

static CS_USING: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*using\s+([a-zA-Z0-9_.]+)\s*;"));

/// `using Namespace.Path;`
pub struct CSharp;

impl Dialect for CSharp {
    fn name(&self) -> &'static str {
        "csharp"
    }

    fn extensions(&self) -> &[&'static str] {
        &["cs"]
    }

    fn syntax(&self) -> ModuleSyntax {
        ModuleSyntax::Dotted
    }

    fn extract(&self, content: &str) -> Vec<String> {
        captures(&CS_USING, content).map(str::to_string).collect()
    }
}

// ==================== Registry ====================

/// Maps file extensions to the dialect that understands them
pub struct DialectRegistry {
    dialects: HashMap<&'static str, Arc<dyn Dialect>>,
    extension_map: HashMap<String, &'static str>,
}

impl DialectRegistry {
    /// Registry with every built-in dialect
    pub fn new() -> Self {
        let mut registry = Self {
            dialects: HashMap::new(),
            extension_map: HashMap::new(),
        };

        registry.register(Arc::new(JavaScript));
        registry.register(Arc::new(Python));
        registry.register(Arc::new(Go));
        registry.register(Arc::new(Rust));
        registry.register(Arc::new(Ruby));
        registry.register(Arc::new(CSharp));

        registry
    }

    pub fn register(&mut self, dialect: Arc<dyn Dialect>) {
        let name = dialect.name();
        for ext in dialect.extensions() {
            self.extension_map.insert(ext.to_string(), name);
        }
        self.dialects.insert(name, dialect);
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        self.dialects.get(name).cloned()
    }

    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn Dialect>> {
        self.extension_map
            .get(&ext.to_lowercase())
            .and_then(|name| self.dialects.get(name))
            .cloned()
    }

    pub fn get_for_file(&self, path: &Path) -> Option<Arc<dyn Dialect>> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.get_by_extension(ext))
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared registry of the built-in dialects
pub static REGISTRY: Lazy<DialectRegistry> = Lazy::new(DialectRegistry::new);
