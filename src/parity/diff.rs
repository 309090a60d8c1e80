//! Line-level comparison of canonical and duplicate files

use serde::Serialize;
use similar::TextDiff;

/// One line position where the two files disagree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDifference {
    /// 1-based line number
    pub line: usize,
    pub canonical: String,
    pub duplicate: String,
}

/// Positional diff: both files are split on `\n`, padded with empty lines to
/// the longer length, and compared line by line.
pub fn line_diff(canonical: &str, duplicate: &str) -> Vec<LineDifference> {
    let canonical_lines: Vec<&str> = canonical.split('\n').collect();
    let duplicate_lines: Vec<&str> = duplicate.split('\n').collect();
    let max_lines = canonical_lines.len().max(duplicate_lines.len());

    (0..max_lines)
        .filter_map(|i| {
            let left = canonical_lines.get(i).copied().unwrap_or("");
            let right = duplicate_lines.get(i).copied().unwrap_or("");
            (left != right).then(|| LineDifference {
                line: i + 1,
                canonical: left.to_string(),
                duplicate: right.to_string(),
            })
        })
        .collect()
}

/// Full unified diff between the two files, labelled with their paths
pub fn unified_diff(
    canonical: &str,
    duplicate: &str,
    canonical_label: &str,
    duplicate_label: &str,
) -> String {
    TextDiff::from_lines(canonical, duplicate)
        .unified_diff()
        .context_radius(3)
        .header(canonical_label, duplicate_label)
        .to_string()
}
