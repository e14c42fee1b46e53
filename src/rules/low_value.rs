use super::text::bare_tag;
use super::{locations_of, Detector, Warning, WarningKind, CORPUS_LOCATION};
use crate::engine::AnalysisContext;
use std::collections::HashSet;

/// Detects tags that do not help anyone select or understand scenarios.
pub struct LowValueTagDetector;

impl Detector for LowValueTagDetector {
    fn id(&self) -> &'static str {
        "low-value-tags"
    }

    fn name(&self) -> &'static str {
        "Low-Value Tags"
    }

    fn description(&self) -> &'static str {
        "Detects noise-word tags, tags present on nearly every feature, and tags too short to mean anything"
    }

    fn kinds(&self) -> &'static [WarningKind] {
        &[
            WarningKind::LowValueTag,
            WarningKind::TooGenericTag,
            WarningKind::AmbiguousTag,
        ]
    }

    fn detect(&self, ctx: &AnalysisContext) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if ctx.is_enabled(WarningKind::LowValueTag) {
            warnings.extend(noise_words(ctx));
        }
        if ctx.is_enabled(WarningKind::TooGenericTag) {
            warnings.extend(too_generic(ctx));
        }
        if ctx.is_enabled(WarningKind::AmbiguousTag) {
            warnings.extend(too_short(ctx));
        }
        warnings
    }
}

fn noise_words(ctx: &AnalysisContext) -> Vec<Warning> {
    ctx.concordance
        .iter()
        .filter(|(tag, _)| ctx.config.vocabulary.is_low_value(tag))
        .map(|(tag, count)| {
            ctx.warning(
                WarningKind::LowValueTag,
                locations_of(ctx.features, &[tag]),
                format!("Tag {} ({} uses) adds no filtering or descriptive value", tag, count),
                vec![
                    format!("Remove {} or replace it with a tag describing the business capability", tag),
                    "Prefer tags that answer 'which area?' or 'what kind of test?'".to_string(),
                ],
            )
        })
        .collect()
}

/// Percentages over a handful of features say nothing, hence the corpus
/// size floor. Case variants of one tag share a single warning.
fn too_generic(ctx: &AnalysisContext) -> Vec<Warning> {
    let thresholds = &ctx.config.thresholds;
    let total = ctx.features.len();
    if total <= thresholds.generic_tag_min_features {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    ctx.concordance
        .iter()
        .filter(|(tag, _)| seen.insert(bare_tag(tag)))
        .filter_map(|(tag, _)| {
            let present = ctx.features.iter().filter(|f| f.uses_tag(tag)).count();
            (present * 100 >= total * thresholds.generic_tag_percent).then(|| {
                ctx.warning(
                    WarningKind::TooGenericTag,
                    CORPUS_LOCATION,
                    format!(
                        "Tag {} is present on {} of {} features ({}%) and no longer distinguishes anything",
                        tag,
                        present,
                        total,
                        present * 100 / total
                    ),
                    vec![
                        format!("Drop {} or split it into more specific tags", tag),
                        "Use the default run configuration instead of a tag applied everywhere".to_string(),
                    ],
                )
            })
        })
        .collect()
}

fn too_short(ctx: &AnalysisContext) -> Vec<Warning> {
    let max_len = ctx.config.thresholds.ambiguous_tag_length;
    ctx.concordance
        .iter()
        .filter(|(tag, _)| {
            tag.chars().count() <= max_len && !ctx.config.vocabulary.is_priority(tag)
        })
        .map(|(tag, _)| {
            ctx.warning(
                WarningKind::AmbiguousTag,
                locations_of(ctx.features, &[tag]),
                format!(
                    "Tag {} is {} characters or shorter and its meaning is unclear",
                    tag, max_len
                ),
                vec![format!("Spell out what {} stands for", tag)],
            )
        })
        .collect()
}
