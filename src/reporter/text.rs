//! Plain-text rendering: a summary line, then each severity and kind group
//! with its warnings.

use super::{plural, WarningGroups};
use crate::rules::{Severity, Warning};
use std::fmt::Write;

pub const NO_ISSUES: &str = "No issues found.";

/// Render `warnings` as plain text.
pub fn render(warnings: &[Warning]) -> String {
    render_groups(&WarningGroups::new(warnings))
}

pub fn render_groups(groups: &WarningGroups) -> String {
    if groups.is_empty() {
        return format!("{}\n", NO_ISSUES);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", summary(groups));

    for severity in groups.severities() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", severity.to_string().to_uppercase());
        for (kind, warnings) in groups.kinds(severity) {
            let _ = writeln!(out, "  {} ({})", kind, warnings.len());
            for warning in warnings {
                let _ = writeln!(out, "    - {}", warning.message);
                let _ = writeln!(out, "      at: {}", warning.location);
                for step in &warning.remediation {
                    let _ = writeln!(out, "      fix: {}", step);
                }
                if !warning.standard_alternatives.is_empty() {
                    let _ = writeln!(
                        out,
                        "      alternatives: {}",
                        warning.standard_alternatives.join(", ")
                    );
                }
            }
        }
    }
    out
}

/// `"Found 4 issues: 1 error, 2 warnings, 1 info"`; zero counts are left out.
pub fn summary(groups: &WarningGroups) -> String {
    let parts: Vec<String> = [
        (Severity::Error, "error"),
        (Severity::Warning, "warning"),
        (Severity::Info, "info"),
    ]
    .iter()
    .map(|(severity, noun)| (groups.count(*severity), *noun))
    .filter(|(count, _)| *count > 0)
    .map(|(count, noun)| plural(count, noun))
    .collect();

    format!("Found {}: {}", plural(groups.len(), "issue"), parts.join(", "))
}
