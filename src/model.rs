//! Parsed Gherkin entities consumed by the detectors.
//!
//! These mirror what a Gherkin parser produces. The crate never parses
//! `.feature` text itself; a corpus arrives fully populated, usually as JSON
//! (see [`crate::engine::loader`]).

use crate::rules::text::bare_tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parsed `.feature` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub filename: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

/// What kind of block a [`Scenario`] is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Background,
    #[default]
    Scenario,
    ScenarioOutline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub kind: ScenarioKind,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Raw step lines, each starting with its Gherkin keyword.
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
}

impl Scenario {
    pub fn is_background(&self) -> bool {
        self.kind == ScenarioKind::Background
    }

    pub fn is_outline(&self) -> bool {
        self.kind == ScenarioKind::ScenarioOutline
    }
}

/// An `Examples:` table attached to a scenario outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl Feature {
    /// Human-readable location of this feature: its file, or its name when
    /// the parser did not record one.
    pub fn location(&self) -> String {
        if self.filename.trim().is_empty() {
            self.name.clone()
        } else {
            self.filename.clone()
        }
    }

    /// `"<file> - <scenario name>"`.
    pub fn scenario_location(&self, scenario: &Scenario) -> String {
        format!("{} - {}", self.location(), scenario.name)
    }

    /// Scenarios that describe testable behavior (everything but Backgrounds).
    pub fn testable_scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter().filter(|s| !s.is_background())
    }

    /// Whether the tag appears on the feature or on any of its scenarios.
    ///
    /// Case and a leading `@` are ignored, so concordance keys match in
    /// either form.
    pub fn uses_tag(&self, tag: &str) -> bool {
        let wanted = bare_tag(tag);
        let matches = |t: &String| bare_tag(t) == wanted;
        self.tags.iter().any(matches) || self.scenarios.iter().any(|s| s.tags.iter().any(matches))
    }
}

/// Occurrence count of every tag across a corpus.
///
/// Keys are tags exactly as written (`@API` and `@api` are separate entries);
/// formatting variants are the typo detector's business, not the
/// concordance's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConcordance {
    counts: BTreeMap<String, usize>,
}

impl TagConcordance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count feature-level and scenario-level tags over the whole corpus.
    pub fn from_features(features: &[Feature]) -> Self {
        let mut concordance = Self::new();
        for feature in features {
            for tag in &feature.tags {
                concordance.record(tag);
            }
            for scenario in &feature.scenarios {
                for tag in &scenario.tags {
                    concordance.record(tag);
                }
            }
        }
        concordance
    }

    pub fn record(&mut self, tag: &str) {
        if tag.trim().is_empty() {
            return;
        }
        *self.counts.entry(tag.to_string()).or_default() += 1;
    }

    pub fn insert(&mut self, tag: impl Into<String>, count: usize) {
        self.counts.insert(tag.into(), count);
    }

    pub fn count(&self, tag: &str) -> usize {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    /// Tags in lexical order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(tag, count)| (tag.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, usize)> for TagConcordance {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_with_tags(feature_tags: &[&str], scenario_tags: &[&[&str]]) -> Feature {
        Feature {
            name: "Checkout".to_string(),
            filename: "checkout.feature".to_string(),
            tags: feature_tags.iter().map(|t| t.to_string()).collect(),
            scenarios: scenario_tags
                .iter()
                .map(|tags| Scenario {
                    name: "Pay".to_string(),
                    tags: tags.iter().map(|t| t.to_string()).collect(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_concordance_merges_feature_and_scenario_tags() {
        let features = vec![
            feature_with_tags(&["@API"], &[&["@P0", "@api"], &["@P0"]]),
            feature_with_tags(&["@API"], &[]),
        ];
        let concordance = TagConcordance::from_features(&features);

        assert_eq!(concordance.count("@API"), 2);
        assert_eq!(concordance.count("@api"), 1);
        assert_eq!(concordance.count("@P0"), 2);
        assert_eq!(concordance.count("@missing"), 0);
        assert_eq!(concordance.len(), 3);
    }

    #[test]
    fn test_concordance_skips_blank_tags() {
        let mut concordance = TagConcordance::new();
        concordance.record("  ");
        assert!(concordance.is_empty());
    }

    #[test]
    fn test_scenario_location() {
        let feature = feature_with_tags(&[], &[&[]]);
        assert_eq!(
            feature.scenario_location(&feature.scenarios[0]),
            "checkout.feature - Pay"
        );
    }

    #[test]
    fn test_location_falls_back_to_name() {
        let feature = Feature {
            name: "Unnamed file".to_string(),
            ..Default::default()
        };
        assert_eq!(feature.location(), "Unnamed file");
    }

    #[test]
    fn test_uses_tag_is_case_insensitive() {
        let feature = feature_with_tags(&[], &[&["@Smoke"]]);
        assert!(feature.uses_tag("@smoke"));
        assert!(!feature.uses_tag("@ui"));
    }

    #[test]
    fn test_uses_tag_ignores_sigil() {
        let feature = feature_with_tags(&["@web"], &[&["@Smoke"]]);
        assert!(feature.uses_tag("web"));
        assert!(feature.uses_tag("smoke"));
        assert!(feature.uses_tag("@WEB"));
        assert!(!feature.uses_tag("we"));
    }

    #[test]
    fn test_scenario_kind_deserializes_snake_case() {
        let scenario: Scenario =
            serde_json::from_str(r#"{"name": "x", "kind": "scenario_outline"}"#).unwrap();
        assert!(scenario.is_outline());
        assert!(scenario.steps.is_empty());
    }
}
