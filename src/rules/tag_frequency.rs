use super::text::{bare_tag, levenshtein, normalize_tag};
use super::{locations_of, Detector, Warning, WarningKind};
use crate::engine::AnalysisContext;
use crate::model::Feature;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::LazyLock;

/// A singleton tag this close to an established tag is read as a typo.
const ORPHAN_TYPO_DISTANCE: usize = 2;

/// Orphan checks need a few features before "used once" means anything.
const MIN_FEATURES_FOR_ORPHANS: usize = 2;

static NUMERIC_PRIORITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^p\d+$").unwrap());
static SPELLED_PRIORITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^priority[-_]?\d+$").unwrap());
static SEMANTIC_PRIORITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(critical|high|medium|low)$").unwrap());

/// Naming conventions for priority tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriorityStyle {
    Numeric,
    Spelled,
    Semantic,
}

impl PriorityStyle {
    pub fn classify(tag: &str) -> Option<Self> {
        let bare = bare_tag(tag);
        if NUMERIC_PRIORITY.is_match(&bare) {
            Some(PriorityStyle::Numeric)
        } else if SPELLED_PRIORITY.is_match(&bare) {
            Some(PriorityStyle::Spelled)
        } else if SEMANTIC_PRIORITY.is_match(&bare) {
            Some(PriorityStyle::Semantic)
        } else {
            None
        }
    }
}

impl std::fmt::Display for PriorityStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityStyle::Numeric => write!(f, "numeric (@p<N>)"),
            PriorityStyle::Spelled => write!(f, "spelled (@priority<N>)"),
            PriorityStyle::Semantic => write!(f, "semantic (@critical/@high/@medium/@low)"),
        }
    }
}

/// Detects tags used once, over-tagged scenarios, mixed priority styles and
/// repeated tags.
pub struct TagFrequencyDetector;

impl Detector for TagFrequencyDetector {
    fn id(&self) -> &'static str {
        "tag-frequency"
    }

    fn name(&self) -> &'static str {
        "Tag Frequency"
    }

    fn description(&self) -> &'static str {
        "Detects orphaned tags, excessive tagging, mixed priority styles and duplicate tags"
    }

    fn kinds(&self) -> &'static [WarningKind] {
        &[
            WarningKind::OrphanedTag,
            WarningKind::TagTypo,
            WarningKind::ExcessiveTags,
            WarningKind::InconsistentTagging,
            WarningKind::DuplicateTag,
        ]
    }

    fn detect(&self, ctx: &AnalysisContext) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if ctx.is_enabled(WarningKind::OrphanedTag) || ctx.is_enabled(WarningKind::TagTypo) {
            warnings.extend(orphaned(ctx));
        }
        if ctx.is_enabled(WarningKind::ExcessiveTags) {
            warnings.extend(excessive(ctx));
        }
        if ctx.is_enabled(WarningKind::InconsistentTagging) {
            warnings.extend(mixed_priority_styles(ctx));
        }
        if ctx.is_enabled(WarningKind::DuplicateTag) {
            warnings.extend(duplicates(ctx));
        }
        warnings
    }
}

fn orphaned(ctx: &AnalysisContext) -> Vec<Warning> {
    if ctx.features.len() <= MIN_FEATURES_FOR_ORPHANS {
        return Vec::new();
    }

    let established: Vec<(&str, usize, String)> = ctx
        .concordance
        .iter()
        .filter(|(_, count)| *count > 1)
        .map(|(tag, count)| (tag, count, normalize_tag(tag)))
        .collect();

    let mut warnings = Vec::new();
    for (tag, count) in ctx.concordance.iter() {
        let normalized = normalize_tag(tag);
        if count != 1 || normalized.is_empty() {
            continue;
        }

        // Closest established tag, ties broken by usage then name
        let candidate = established
            .iter()
            .filter(|(_, _, other_norm)| *other_norm != normalized)
            .map(|(other, other_count, other_norm)| {
                (levenshtein(&normalized, other_norm), *other, *other_count)
            })
            .filter(|(distance, _, _)| *distance <= ORPHAN_TYPO_DISTANCE)
            .min_by(|a, b| a.0.cmp(&b.0).then(b.2.cmp(&a.2)).then(a.1.cmp(&b.1)));

        let location = first_use(ctx.features, tag);
        match candidate {
            Some((_, other, other_count)) => {
                if ctx.is_enabled(WarningKind::TagTypo) {
                    warnings.push(ctx.warning(
                        WarningKind::TagTypo,
                        location,
                        format!(
                            "Singleton tag {} (used once) is possibly a typo of {} ({} uses)",
                            tag, other, other_count
                        ),
                        vec![
                            format!("Replace {} with {}", tag, other),
                            format!("If {} is intentional, use it on more than one element", tag),
                        ],
                    ));
                }
            }
            None => {
                if ctx.is_enabled(WarningKind::OrphanedTag) {
                    warnings.push(ctx.warning(
                        WarningKind::OrphanedTag,
                        location,
                        format!("Tag {} is used only once in the whole suite", tag),
                        vec![
                            format!("Remove {} if nothing filters on it", tag),
                            "Reuse an existing tag that expresses the same intent".to_string(),
                        ],
                    ));
                }
            }
        }
    }
    warnings
}

/// Location of the first element carrying `tag`.
fn first_use(features: &[Feature], tag: &str) -> String {
    let bare = bare_tag(tag);
    for feature in features {
        if feature.tags.iter().any(|t| bare_tag(t) == bare) {
            return feature.location();
        }
        if let Some(scenario) = feature
            .scenarios
            .iter()
            .find(|s| s.tags.iter().any(|t| bare_tag(t) == bare))
        {
            return feature.scenario_location(scenario);
        }
    }
    locations_of(features, &[tag])
}

fn excessive(ctx: &AnalysisContext) -> Vec<Warning> {
    let max_tags = ctx.config.thresholds.max_tags;
    let mut warnings = Vec::new();

    for feature in ctx.features {
        for scenario in feature.testable_scenarios() {
            let mut seen = HashSet::new();
            let effective: Vec<&str> = feature
                .tags
                .iter()
                .chain(scenario.tags.iter())
                .filter(|tag| seen.insert(bare_tag(tag)))
                .map(String::as_str)
                .collect();

            if effective.len() > max_tags {
                warnings.push(ctx.warning(
                    WarningKind::ExcessiveTags,
                    feature.scenario_location(scenario),
                    format!(
                        "Scenario has {} tags including inherited feature tags (maximum: {}): {}",
                        effective.len(),
                        max_tags,
                        effective.join(" ")
                    ),
                    vec![
                        "Move tags shared by every scenario up to the feature".to_string(),
                        "Drop tags nobody filters on".to_string(),
                    ],
                ));
            }
        }
    }
    warnings
}

fn mixed_priority_styles(ctx: &AnalysisContext) -> Vec<Warning> {
    let mut styles: BTreeMap<PriorityStyle, BTreeSet<&str>> = BTreeMap::new();
    for feature in ctx.features {
        let scenario_tags = feature.scenarios.iter().flat_map(|s| s.tags.iter());
        for tag in feature.tags.iter().chain(scenario_tags) {
            if let Some(style) = PriorityStyle::classify(tag) {
                styles.entry(style).or_default().insert(tag.as_str());
            }
        }
    }

    if styles.len() <= 1 {
        return Vec::new();
    }

    let described: Vec<String> = styles
        .iter()
        .map(|(style, tags)| {
            let examples: Vec<&str> = tags.iter().copied().collect();
            format!("{}: {}", style, examples.join(", "))
        })
        .collect();
    let all_tags: Vec<&str> = styles.values().flatten().copied().collect();

    vec![ctx.warning(
        WarningKind::InconsistentTagging,
        locations_of(ctx.features, &all_tags),
        format!(
            "Priority tags use {} different styles: {}",
            styles.len(),
            described.join("; ")
        ),
        vec![
            "Pick one priority naming style and migrate the rest".to_string(),
            "Configure the chosen tags as the priority vocabulary".to_string(),
        ],
    )]
}

fn duplicates(ctx: &AnalysisContext) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for feature in ctx.features {
        let location = feature.location();
        for tag in repeated(&feature.tags) {
            warnings.push(ctx.warning(
                WarningKind::DuplicateTag,
                location.clone(),
                format!("Tag {} appears more than once on the feature", tag),
                vec![format!("Remove the repeated {}", tag)],
            ));
        }

        let inherited: HashSet<String> = feature.tags.iter().map(|t| bare_tag(t)).collect();
        for scenario in feature.testable_scenarios() {
            let location = feature.scenario_location(scenario);
            for tag in repeated(&scenario.tags) {
                warnings.push(ctx.warning(
                    WarningKind::DuplicateTag,
                    location.clone(),
                    format!("Tag {} appears more than once on the scenario", tag),
                    vec![format!("Remove the repeated {}", tag)],
                ));
            }

            let mut reported = HashSet::new();
            for tag in &scenario.tags {
                let bare = bare_tag(tag);
                if inherited.contains(&bare) && reported.insert(bare) {
                    warnings.push(ctx.warning(
                        WarningKind::DuplicateTag,
                        location.clone(),
                        format!(
                            "Tag {} is already inherited from the feature's tags",
                            tag
                        ),
                        vec![format!(
                            "Remove {} from the scenario; feature tags apply to every scenario",
                            tag
                        )],
                    ));
                }
            }
        }
    }
    warnings
}

/// Tags occurring more than once (case-insensitive), each reported once, in
/// order of their first repeat.
fn repeated(tags: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    tags.iter()
        .filter(|tag| {
            let bare = bare_tag(tag);
            !seen.insert(bare.clone()) && reported.insert(bare)
        })
        .map(String::as_str)
        .collect()
}
