use super::text::{levenshtein, normalize_tag};
use super::{locations_of, Detector, Warning, WarningKind};
use crate::engine::AnalysisContext;
use std::collections::BTreeMap;

/// Maximum normalized edit distance for two distinct tags to be treated as a
/// misspelling pair.
const MAX_TYPO_DISTANCE: usize = 1;

/// Detects formatting variants of one tag and likely misspellings of
/// frequently used tags.
pub struct TagTypoDetector;

impl Detector for TagTypoDetector {
    fn id(&self) -> &'static str {
        "tag-typos"
    }

    fn name(&self) -> &'static str {
        "Tag Typos"
    }

    fn description(&self) -> &'static str {
        "Groups tags that differ only in case or separators and flags rare near-duplicates of common tags"
    }

    fn kinds(&self) -> &'static [WarningKind] {
        &[WarningKind::InconsistentTagging, WarningKind::TagTypo]
    }

    fn detect(&self, ctx: &AnalysisContext) -> Vec<Warning> {
        let tags: Vec<(&str, usize)> = ctx
            .concordance
            .iter()
            .filter(|(tag, _)| !normalize_tag(tag).is_empty())
            .collect();

        let mut warnings = Vec::new();
        if ctx.is_enabled(WarningKind::InconsistentTagging) {
            warnings.extend(format_variants(ctx, &tags));
        }
        if ctx.is_enabled(WarningKind::TagTypo) {
            warnings.extend(near_duplicates(ctx, &tags));
        }
        warnings
    }
}

/// One warning per group of tags sharing a normalized form.
fn format_variants(ctx: &AnalysisContext, tags: &[(&str, usize)]) -> Vec<Warning> {
    let mut groups: BTreeMap<String, Vec<(&str, usize)>> = BTreeMap::new();
    for &(tag, count) in tags {
        groups.entry(normalize_tag(tag)).or_default().push((tag, count));
    }

    groups
        .into_values()
        .filter(|members| members.len() >= 2)
        .map(|mut members| {
            // Most used first; it is the suggested canonical spelling
            members.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            let names: Vec<&str> = members.iter().map(|(tag, _)| *tag).collect();
            let (canonical, canonical_count) = members[0];

            let mut remediation = vec![format!(
                "Standardize on {} (used {} times)",
                canonical, canonical_count
            )];
            remediation.extend(
                members[1..]
                    .iter()
                    .map(|(tag, count)| format!("Rename {} ({} uses) to {}", tag, count, canonical)),
            );

            ctx.warning(
                WarningKind::InconsistentTagging,
                locations_of(ctx.features, &names),
                format!(
                    "Inconsistent tag format: [{}] are the same tag written differently",
                    names.join(", ")
                ),
                remediation,
            )
        })
        .collect()
}

/// Pairs of distinct tags one edit apart where one is clearly dominant.
///
/// A frequency tie is reported as nothing: neither spelling can be called
/// canonical.
fn near_duplicates(ctx: &AnalysisContext, tags: &[(&str, usize)]) -> Vec<Warning> {
    let ratio = ctx.config.thresholds.typo_frequency_ratio;
    let normalized: Vec<String> = tags.iter().map(|(tag, _)| normalize_tag(tag)).collect();
    let mut warnings = Vec::new();

    for i in 0..tags.len() {
        for j in (i + 1)..tags.len() {
            if normalized[i] == normalized[j] {
                continue;
            }
            if levenshtein(&normalized[i], &normalized[j]) > MAX_TYPO_DISTANCE {
                continue;
            }

            let (more, less) = if tags[i].1 >= tags[j].1 {
                (tags[i], tags[j])
            } else {
                (tags[j], tags[i])
            };
            if more.1 == less.1 || less.1 == 0 || more.1 < less.1.saturating_mul(ratio) {
                continue;
            }

            warnings.push(ctx.warning(
                WarningKind::TagTypo,
                locations_of(ctx.features, &[less.0]),
                format!(
                    "{} might be a typo of {} ({} vs {} uses)",
                    less.0, more.0, less.1, more.1
                ),
                vec![format!("Replace {} with {}", less.0, more.0)],
            ));
        }
    }

    warnings
}
