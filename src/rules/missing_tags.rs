use super::{Detector, Warning, WarningKind};
use crate::config::TagVocabulary;
use crate::engine::AnalysisContext;
use crate::model::{Feature, Scenario};

/// Detects scenarios lacking a priority, type or status tag, counting tags
/// inherited from the feature.
pub struct MissingTagDetector;

/// One required tag category.
struct Requirement {
    kind: WarningKind,
    label: &'static str,
    matches: fn(&TagVocabulary, &str) -> bool,
}

const REQUIREMENTS: &[Requirement] = &[
    Requirement {
        kind: WarningKind::MissingPriorityTag,
        label: "priority",
        matches: TagVocabulary::is_priority,
    },
    Requirement {
        kind: WarningKind::MissingTypeTag,
        label: "type",
        matches: TagVocabulary::is_type,
    },
    Requirement {
        kind: WarningKind::MissingStatusTag,
        label: "status",
        matches: TagVocabulary::is_status,
    },
];

impl Detector for MissingTagDetector {
    fn id(&self) -> &'static str {
        "missing-tags"
    }

    fn name(&self) -> &'static str {
        "Missing Tags"
    }

    fn description(&self) -> &'static str {
        "Detects scenarios without a priority, type or status tag on themselves or their feature"
    }

    fn kinds(&self) -> &'static [WarningKind] {
        &[
            WarningKind::MissingPriorityTag,
            WarningKind::MissingTypeTag,
            WarningKind::MissingStatusTag,
        ]
    }

    fn detect(&self, ctx: &AnalysisContext) -> Vec<Warning> {
        let active: Vec<&Requirement> = REQUIREMENTS
            .iter()
            .filter(|r| ctx.is_enabled(r.kind))
            .collect();
        if active.is_empty() {
            return Vec::new();
        }

        let vocabulary = &ctx.config.vocabulary;
        let mut warnings = Vec::new();
        for feature in ctx.features {
            for scenario in feature.testable_scenarios() {
                for requirement in &active {
                    if !has_tag(feature, scenario, |tag| (requirement.matches)(vocabulary, tag)) {
                        warnings.push(missing(ctx, feature, scenario, requirement));
                    }
                }
            }
        }
        warnings
    }
}

fn has_tag(feature: &Feature, scenario: &Scenario, matches: impl Fn(&str) -> bool) -> bool {
    feature
        .tags
        .iter()
        .chain(scenario.tags.iter())
        .any(|tag| matches(tag.as_str()))
}

fn missing(
    ctx: &AnalysisContext,
    feature: &Feature,
    scenario: &Scenario,
    requirement: &Requirement,
) -> Warning {
    let alternatives = ctx.config.standard_alternatives(requirement.kind);
    let mut remediation = vec![format!(
        "Add a {} tag to the scenario or to its feature",
        requirement.label
    )];
    if !alternatives.is_empty() {
        remediation.push(format!("Use one of: {}", alternatives.join(", ")));
    }

    ctx.warning(
        requirement.kind,
        feature.scenario_location(scenario),
        format!("Scenario '{}' has no {} tag", scenario.name, requirement.label),
        remediation,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::model::{ScenarioKind, TagConcordance};

    fn feature(feature_tags: &[&str], scenario_tags: &[&str], kind: ScenarioKind) -> Feature {
        Feature {
            name: "Login".to_string(),
            filename: "login.feature".to_string(),
            tags: feature_tags.iter().map(|t| t.to_string()).collect(),
            scenarios: vec![Scenario {
                name: "Valid password".to_string(),
                kind,
                tags: scenario_tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn detect(features: &[Feature], config: &DetectorConfig) -> Vec<Warning> {
        let concordance = TagConcordance::from_features(features);
        let ctx = AnalysisContext::new(features, &concordance, config);
        MissingTagDetector.detect(&ctx)
    }

    #[test]
    fn test_missing_priority_and_type() {
        let features = vec![feature(&["@auth"], &["@happy"], ScenarioKind::Scenario)];
        let warnings = detect(&features, &DetectorConfig::default());

        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WarningKind::MissingPriorityTag, WarningKind::MissingTypeTag]
        );
        assert_eq!(warnings[0].location, "login.feature - Valid password");
        assert!(warnings[0].remediation[1].contains("@P0"));
    }

    #[test]
    fn test_feature_tags_are_inherited() {
        let features = vec![feature(&["@p1", "@API"], &[], ScenarioKind::Scenario)];
        assert!(detect(&features, &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn test_background_is_never_flagged() {
        let features = vec![feature(&[], &[], ScenarioKind::Background)];
        assert!(detect(&features, &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn test_status_check_when_enabled() {
        let mut config = DetectorConfig::default();
        config.set_enabled(WarningKind::MissingStatusTag, true);
        let features = vec![feature(&["@P0", "@ui"], &[], ScenarioKind::ScenarioOutline)];

        let warnings = detect(&features, &config);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MissingStatusTag);
        assert_eq!(warnings[0].message, "Scenario 'Valid password' has no status tag");
    }

    #[test]
    fn test_custom_priority_vocabulary() {
        let mut file = crate::Config::default();
        file.vocabulary.priority = vec!["@blocker".to_string()];
        let config = DetectorConfig::from_config(&file);
        let features = vec![feature(&["@ui"], &["@P0"], ScenarioKind::Scenario)];

        let warnings = detect(&features, &config);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MissingPriorityTag);
    }
}
