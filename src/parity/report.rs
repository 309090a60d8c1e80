//! Plain-text parity report

use super::{ParityReport, ParityStatus};

/// Render the report in a stable, line-oriented layout
pub fn render_report(report: &ParityReport) -> String {
    let mut lines = Vec::new();

    lines.push("Parity Check Report".to_string());
    lines.push("===================".to_string());
    lines.push(String::new());

    if report.success {
        lines.push("Status: ✅ PASS - All files in parity".to_string());
    } else {
        lines.push("Status: ❌ FAIL - Parity violations detected".to_string());
    }
    lines.push(String::new());

    for result in &report.results {
        lines.push(format!("{}:", result.name));
        lines.push(format!(
            "  Canonical: {} ({})",
            result.canonical,
            if result.canonical_exists { "exists" } else { "missing" }
        ));
        lines.push(format!(
            "  Duplicate: {} ({})",
            result.duplicate,
            if result.duplicate_exists { "exists" } else { "absent" }
        ));

        let status = match result.status {
            ParityStatus::Ok => "✅ OK",
            ParityStatus::Violation => "❌ VIOLATION",
            ParityStatus::Error => "❌ ERROR",
        };
        lines.push(format!("  Status:    {}", status));

        for issue in &result.issues {
            lines.push(format!("  Issue:     {}", issue));
        }

        if !result.differences.is_empty() {
            lines.push(format!(
                "  Diffs:     First {} of {} differences:",
                result.differences.len(),
                result.difference_count
            ));
            for diff in &result.differences {
                lines.push(format!("    Line {}:", diff.line));
                lines.push(format!("      Canonical: {}", diff.canonical));
                lines.push(format!("      Duplicate: {}", diff.duplicate));
            }
        }

        if let Some(ref unified) = result.unified {
            lines.push(String::new());
            lines.extend(unified.lines().map(|l| format!("    {}", l)));
        }

        lines.push(String::new());
    }

    if !report.success {
        lines.push("Required actions:".to_string());
        for result in &report.results {
            match result.status {
                ParityStatus::Violation => {
                    lines.push(format!("- Remove duplicate file: {}", result.duplicate))
                }
                ParityStatus::Error => {
                    lines.push(format!("- Fix missing canonical file: {}", result.canonical))
                }
                ParityStatus::Ok => {}
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parity::{LineDifference, ParityResult};

    fn result(status: ParityStatus) -> ParityResult {
        ParityResult {
            name: "bridge.json".to_string(),
            canonical: ".0kid/bridge.json".to_string(),
            duplicate: ".0kid/fusion/bridge.json".to_string(),
            canonical_exists: status != ParityStatus::Error,
            duplicate_exists: status == ParityStatus::Violation,
            status,
            issues: Vec::new(),
            difference_count: 0,
            differences: Vec::new(),
            unified: None,
        }
    }

    #[test]
    fn test_passing_report() {
        let report = ParityReport {
            success: true,
            results: vec![result(ParityStatus::Ok)],
        };
        let text = render_report(&report);
        assert!(text.contains("PASS"));
        assert!(text.contains("Canonical: .0kid/bridge.json (exists)"));
        assert!(text.contains("Duplicate: .0kid/fusion/bridge.json (absent)"));
        assert!(!text.contains("Required actions"));
    }

    #[test]
    fn test_violation_lists_diff_and_action() {
        let mut violation = result(ParityStatus::Violation);
        violation.issues = vec!["Content differs (7 lines)".to_string()];
        violation.difference_count = 7;
        violation.differences = vec![LineDifference {
            line: 3,
            canonical: "\"mode\": \"strict\"".to_string(),
            duplicate: "\"mode\": \"loose\"".to_string(),
        }];
        let report = ParityReport {
            success: false,
            results: vec![violation, result(ParityStatus::Error)],
        };

        let text = render_report(&report);
        assert!(text.contains("❌ VIOLATION"));
        assert!(text.contains("First 1 of 7 differences"));
        assert!(text.contains("    Line 3:"));
        assert!(text.contains("- Remove duplicate file: .0kid/fusion/bridge.json"));
        assert!(text.contains("- Fix missing canonical file: .0kid/bridge.json"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let report = ParityReport {
            success: false,
            results: vec![result(ParityStatus::Error)],
        };
        assert_eq!(render_report(&report), render_report(&report));
    }
}
