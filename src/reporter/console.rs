use super::{plural, WarningGroups};
use crate::rules::{Severity, Warning};
use colored::{ColoredString, Colorize};

pub fn report(warnings: &[Warning]) {
    if warnings.is_empty() {
        println!("{}", "No issues found.".green());
        return;
    }

    let groups = WarningGroups::new(warnings);
    for severity in groups.severities() {
        for (kind, group) in groups.kinds(severity) {
            println!(
                "{} {}",
                severity_label(severity),
                format!("{} ({})", kind, group.len()).bold()
            );
            for warning in group {
                print_warning(warning);
            }
            println!();
        }
    }

    let (errors, warnings_count, infos) = count_by_severity(warnings);
    let mut parts = Vec::new();
    if errors > 0 {
        parts.push(plural(errors, "error").red().to_string());
    }
    if warnings_count > 0 {
        parts.push(plural(warnings_count, "warning").yellow().to_string());
    }
    if infos > 0 {
        parts.push(plural(infos, "info").blue().to_string());
    }
    println!("Found {}", parts.join(", "));
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error:".red().bold(),
        Severity::Warning => "warning:".yellow().bold(),
        Severity::Info => "info:".blue().bold(),
    }
}

fn print_warning(w: &Warning) {
    println!("  {}", w.message);
    println!("    {} {}", "-->".blue(), w.location);
    for step in &w.remediation {
        println!("    {} {}", "help:".cyan(), step);
    }
    if !w.standard_alternatives.is_empty() {
        println!(
            "    {} {}",
            "use:".cyan(),
            w.standard_alternatives.join(", ")
        );
    }
}

/// Format a warning as a plain text string (no colors) for testing.
#[cfg(test)]
fn format_warning_plain(w: &Warning) -> String {
    let mut result = format!("  {}\n    --> {}\n", w.message, w.location);
    for step in &w.remediation {
        result.push_str(&format!("    help: {}\n", step));
    }
    if !w.standard_alternatives.is_empty() {
        result.push_str(&format!("    use: {}\n", w.standard_alternatives.join(", ")));
    }
    result
}

/// Count warnings by severity.
pub fn count_by_severity(warnings: &[Warning]) -> (usize, usize, usize) {
    let count = |severity| warnings.iter().filter(|w| w.severity == severity).count();
    (
        count(Severity::Error),
        count(Severity::Warning),
        count(Severity::Info),
    )
}
