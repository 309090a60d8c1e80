//! Specifier classification and identity normalization

use super::dialect::ModuleSyntax;
use once_cell::sync::Lazy;
use regex::Regex;

static DRIVE_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]:\\").expect("valid regex"));
static URL_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-z]+://").expect("valid regex"));

/// Whether a specifier names an external dependency.
///
/// Relative and absolute paths, Windows drive paths and URLs are local.
pub fn is_external(spec: &str) -> bool {
    if spec.is_empty() {
        return false;
    }
    if spec.starts_with('.') || spec.starts_with('/') || DRIVE_LETTER.is_match(spec) {
        return false;
    }
    !URL_SCHEME.is_match(spec)
}

/// Collapse an external specifier to its top-level identity.
///
/// Scoped names keep `@scope/name`; everything else keeps its first segment.
pub fn top_level(spec: &str) -> String {
    if spec.starts_with('@') {
        let mut parts = spec.split('/');
        return match (parts.next(), parts.next()) {
            (Some(scope), Some(name)) => format!("{}/{}", scope, name),
            _ => spec.to_string(),
        };
    }
    spec.split('/').next().unwrap_or(spec).to_string()
}

/// Normalize a raw specifier to a dependency identity, or `None` when it is local
pub fn normalize(raw: &str, syntax: ModuleSyntax) -> Option<String> {
    let spec = match syntax {
        ModuleSyntax::Dotted => raw.split('.').next().unwrap_or(raw),
        ModuleSyntax::Path => raw,
    };

    if is_external(spec) {
        Some(top_level(spec))
    } else {
        None
    }
}

/// Characters that cannot appear in a directory name on every platform
const UNSAFE_SLUG_CHARS: [char; 10] = ['@', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Filesystem-safe directory name for an identity
pub fn slug(identity: &str) -> String {
    identity.to_lowercase().replace(UNSAFE_SLUG_CHARS, "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_specifiers() {
        assert!(!is_external(""));
        assert!(!is_external("./util"));
        assert!(!is_external("../lib/x"));
        assert!(!is_external("/abs/path"));
        assert!(!is_external(r"C:\tools\lib"));
        assert!(!is_external("https://cdn.example.com/x.js"));
        assert!(!is_external("HTTP://cdn.example.com/x.js"));
        assert!(is_external("react"));
        assert!(is_external("node:fs"));
        assert!(is_external("@scope/name"));
    }

    #[test]
    fn test_subpaths_collapse_to_root() {
        assert_eq!(normalize("pkg/sub/path", ModuleSyntax::Path).as_deref(), Some("pkg"));
        assert_eq!(normalize("pkg", ModuleSyntax::Path).as_deref(), Some("pkg"));
        assert_eq!(normalize("pkg.sub", ModuleSyntax::Dotted).as_deref(), Some("pkg"));
    }

    #[test]
    fn test_scoped_identity_keeps_two_segments() {
        assert_eq!(top_level("@scope/name/sub"), "@scope/name");
        assert_eq!(top_level("@scope/name"), "@scope/name");
        assert_eq!(top_level("@scope"), "@scope");
    }

    #[test]
    fn test_relative_dotted_module_is_local() {
        assert_eq!(normalize(".sibling", ModuleSyntax::Dotted), None);
        assert_eq!(normalize(".", ModuleSyntax::Dotted), None);
        assert_eq!(normalize("./x", ModuleSyntax::Path), None);
    }

    #[test]
    fn test_slug_is_stable() {
        assert_eq!(slug("@Scope/Name"), "-scope-name");
        assert_eq!(slug("react"), "react");
        assert_eq!(slug(&slug("lodash")), slug("lodash"));
    }

    #[test]
    fn test_slug_replaces_platform_unsafe_chars() {
        assert_eq!(slug("node:fs"), "node-fs");
        assert_eq!(slug("odd\\name|x"), "odd-name-x");
        assert_eq!(slug(&slug("node:fs")), "node-fs");
    }
}
