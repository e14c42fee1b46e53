//! Warning presentation: the severity-then-kind grouping every renderer
//! shares, and the console, plain-text and JSON renderers.

pub mod console;
pub mod json;
pub mod text;

use crate::rules::{Severity, Warning, WarningKind};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Warnings grouped by severity (Error, Warning, Info), then by kind in
/// declaration order. Warnings keep their input order inside a group.
#[derive(Debug, Default)]
pub struct WarningGroups<'a> {
    groups: BTreeMap<Reverse<Severity>, BTreeMap<WarningKind, Vec<&'a Warning>>>,
    total: usize,
}

impl<'a> WarningGroups<'a> {
    pub fn new(warnings: &'a [Warning]) -> Self {
        let mut groups: BTreeMap<Reverse<Severity>, BTreeMap<WarningKind, Vec<&'a Warning>>> =
            BTreeMap::new();
        for warning in warnings {
            groups
                .entry(Reverse(warning.severity))
                .or_default()
                .entry(warning.kind)
                .or_default()
                .push(warning);
        }
        Self {
            groups,
            total: warnings.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn len(&self) -> usize {
        self.total
    }

    /// Severities present, most severe first.
    pub fn severities(&self) -> impl Iterator<Item = Severity> + '_ {
        self.groups.keys().map(|Reverse(severity)| *severity)
    }

    /// Kinds reported at `severity`, with their warnings.
    pub fn kinds(&self, severity: Severity) -> impl Iterator<Item = (WarningKind, &[&'a Warning])> + '_ {
        self.groups
            .get(&Reverse(severity))
            .into_iter()
            .flat_map(|kinds| kinds.iter().map(|(kind, warnings)| (*kind, warnings.as_slice())))
    }

    /// Every warning in grouped order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Warning> + '_ {
        self.groups
            .values()
            .flat_map(|kinds| kinds.values())
            .flat_map(|warnings| warnings.iter().copied())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.groups
            .get(&Reverse(severity))
            .map(|kinds| kinds.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

impl std::fmt::Display for WarningGroups<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&text::render_groups(self))
    }
}

/// `"1 error"`, `"3 warnings"`.
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
pub(crate) fn sample_warning(kind: WarningKind, severity: Severity, message: &str) -> Warning {
    Warning {
        kind,
        severity,
        message: message.to_string(),
        location: "login.feature - Valid password".to_string(),
        remediation: vec!["Fix it".to_string()],
        standard_alternatives: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grouping_order() {
        let warnings = vec![
            sample_warning(WarningKind::AmbiguousPronoun, Severity::Info, "a"),
            sample_warning(WarningKind::TagTypo, Severity::Warning, "b"),
            sample_warning(WarningKind::IncorrectStepOrder, Severity::Error, "c"),
            sample_warning(WarningKind::MissingPriorityTag, Severity::Warning, "d"),
            sample_warning(WarningKind::TagTypo, Severity::Warning, "e"),
        ];
        let groups = WarningGroups::new(&warnings);

        assert_eq!(
            groups.severities().collect::<Vec<_>>(),
            vec![Severity::Error, Severity::Warning, Severity::Info]
        );
        let messages: Vec<&str> = groups.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, vec!["c", "d", "b", "e", "a"]);
        assert_eq!(groups.count(Severity::Warning), 3);
        assert_eq!(groups.len(), 5);
    }

    #[test]
    fn test_severity_override_moves_group() {
        let warnings = vec![
            sample_warning(WarningKind::TagTypo, Severity::Warning, "default"),
            sample_warning(WarningKind::OrphanedTag, Severity::Error, "raised"),
        ];
        let groups = WarningGroups::new(&warnings);
        let kinds: Vec<_> = groups.kinds(Severity::Error).map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![WarningKind::OrphanedTag]);
    }

    #[test]
    fn test_empty_groups() {
        let groups = WarningGroups::new(&[]);
        assert!(groups.is_empty());
        assert_eq!(groups.count(Severity::Error), 0);
        assert_eq!(groups.kinds(Severity::Info).count(), 0);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "error"), "1 error");
        assert_eq!(plural(0, "warning"), "0 warnings");
    }
}
