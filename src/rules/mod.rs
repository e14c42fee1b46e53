pub mod language_rules;
pub mod low_value;
pub mod missing_tags;
pub mod outline_rules;
pub mod registry;
pub mod step_rules;
pub mod tag_frequency;
pub mod tag_typo;
pub mod text;

use crate::engine::AnalysisContext;
use crate::model::Feature;
use serde::{Deserialize, Serialize};

/// Severity levels for warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "deny" => Ok(Severity::Error),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

#[cfg(feature = "cli")]
impl clap::ValueEnum for Severity {
    fn value_variants<'a>() -> &'a [Self] {
        &[Severity::Info, Severity::Warning, Severity::Error]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            Severity::Info => Some(clap::builder::PossibleValue::new("info")),
            Severity::Warning => Some(clap::builder::PossibleValue::new("warning")),
            Severity::Error => Some(clap::builder::PossibleValue::new("error")),
        }
    }
}

/// Which analyzer owns a warning kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Tag,
    AntiPattern,
}

/// Every warning the detectors can emit.
///
/// Declaration order is the inner sort order of the grouped report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    MissingPriorityTag,
    MissingTypeTag,
    MissingStatusTag,
    TagTypo,
    InconsistentTagging,
    LowValueTag,
    TooGenericTag,
    AmbiguousTag,
    OrphanedTag,
    ExcessiveTags,
    DuplicateTag,
    LongScenario,
    TooFewSteps,
    MissingGiven,
    MissingWhen,
    MissingThen,
    IncorrectStepOrder,
    UiCoupling,
    ImplementationDetail,
    MissingExamples,
    TooFewExamples,
    LongScenarioName,
    LongStepText,
    AmbiguousPronoun,
    ConjunctionInStep,
    InconsistentTense,
}

impl WarningKind {
    pub const ALL: &'static [WarningKind] = &[
        WarningKind::MissingPriorityTag,
        WarningKind::MissingTypeTag,
        WarningKind::MissingStatusTag,
        WarningKind::TagTypo,
        WarningKind::InconsistentTagging,
        WarningKind::LowValueTag,
        WarningKind::TooGenericTag,
        WarningKind::AmbiguousTag,
        WarningKind::OrphanedTag,
        WarningKind::ExcessiveTags,
        WarningKind::DuplicateTag,
        WarningKind::LongScenario,
        WarningKind::TooFewSteps,
        WarningKind::MissingGiven,
        WarningKind::MissingWhen,
        WarningKind::MissingThen,
        WarningKind::IncorrectStepOrder,
        WarningKind::UiCoupling,
        WarningKind::ImplementationDetail,
        WarningKind::MissingExamples,
        WarningKind::TooFewExamples,
        WarningKind::LongScenarioName,
        WarningKind::LongStepText,
        WarningKind::AmbiguousPronoun,
        WarningKind::ConjunctionInStep,
        WarningKind::InconsistentTense,
    ];

    /// Stable identifier, also the configuration key (e.g. "tag-typo").
    pub fn id(&self) -> &'static str {
        match self {
            WarningKind::MissingPriorityTag => "missing-priority-tag",
            WarningKind::MissingTypeTag => "missing-type-tag",
            WarningKind::MissingStatusTag => "missing-status-tag",
            WarningKind::TagTypo => "tag-typo",
            WarningKind::InconsistentTagging => "inconsistent-tagging",
            WarningKind::LowValueTag => "low-value-tag",
            WarningKind::TooGenericTag => "too-generic-tag",
            WarningKind::AmbiguousTag => "ambiguous-tag",
            WarningKind::OrphanedTag => "orphaned-tag",
            WarningKind::ExcessiveTags => "excessive-tags",
            WarningKind::DuplicateTag => "duplicate-tag",
            WarningKind::LongScenario => "long-scenario",
            WarningKind::TooFewSteps => "too-few-steps",
            WarningKind::MissingGiven => "missing-given",
            WarningKind::MissingWhen => "missing-when",
            WarningKind::MissingThen => "missing-then",
            WarningKind::IncorrectStepOrder => "incorrect-step-order",
            WarningKind::UiCoupling => "ui-coupling",
            WarningKind::ImplementationDetail => "implementation-detail",
            WarningKind::MissingExamples => "missing-examples",
            WarningKind::TooFewExamples => "too-few-examples",
            WarningKind::LongScenarioName => "long-scenario-name",
            WarningKind::LongStepText => "long-step-text",
            WarningKind::AmbiguousPronoun => "ambiguous-pronoun",
            WarningKind::ConjunctionInStep => "conjunction-in-step",
            WarningKind::InconsistentTense => "inconsistent-tense",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            WarningKind::MissingPriorityTag
            | WarningKind::MissingTypeTag
            | WarningKind::MissingStatusTag
            | WarningKind::TagTypo
            | WarningKind::InconsistentTagging
            | WarningKind::LowValueTag
            | WarningKind::TooGenericTag
            | WarningKind::AmbiguousTag
            | WarningKind::OrphanedTag
            | WarningKind::ExcessiveTags
            | WarningKind::DuplicateTag => Category::Tag,
            _ => Category::AntiPattern,
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            WarningKind::IncorrectStepOrder | WarningKind::MissingExamples => Severity::Error,
            WarningKind::MissingPriorityTag
            | WarningKind::TagTypo
            | WarningKind::InconsistentTagging
            | WarningKind::ExcessiveTags
            | WarningKind::DuplicateTag
            | WarningKind::LongScenario
            | WarningKind::TooFewSteps
            | WarningKind::MissingWhen
            | WarningKind::MissingThen
            | WarningKind::UiCoupling
            | WarningKind::ImplementationDetail
            | WarningKind::TooFewExamples => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// Status tags are a team convention rather than a hygiene baseline, so
    /// that check is opt-in.
    pub fn enabled_by_default(&self) -> bool {
        !matches!(self, WarningKind::MissingStatusTag)
    }

    pub fn description(&self) -> &'static str {
        match self {
            WarningKind::MissingPriorityTag => "Scenario has no priority tag, directly or via its feature",
            WarningKind::MissingTypeTag => "Scenario has no test-type tag (UI, API, integration, ...)",
            WarningKind::MissingStatusTag => "Scenario has no status tag (wip, manual, automated, ...)",
            WarningKind::TagTypo => "Tag looks like a misspelling of a more common tag",
            WarningKind::InconsistentTagging => "Same tag written in several formats, or mixed priority styles",
            WarningKind::LowValueTag => "Tag from the low-value vocabulary carries no information",
            WarningKind::TooGenericTag => "Tag is present on nearly every feature and filters nothing",
            WarningKind::AmbiguousTag => "Tag is too short to convey meaning",
            WarningKind::OrphanedTag => "Tag is used exactly once in the whole suite",
            WarningKind::ExcessiveTags => "Scenario carries more tags than the configured maximum",
            WarningKind::DuplicateTag => "Tag repeated on one element or already inherited from the feature",
            WarningKind::LongScenario => "Scenario has more steps than the configured maximum",
            WarningKind::TooFewSteps => "Scenario has fewer steps than the configured minimum",
            WarningKind::MissingGiven => "Scenario has no Given step establishing context",
            WarningKind::MissingWhen => "Scenario has no When step performing an action",
            WarningKind::MissingThen => "Scenario has no Then step verifying an outcome",
            WarningKind::IncorrectStepOrder => "Steps do not follow Given -> When -> Then order",
            WarningKind::UiCoupling => "Step describes UI mechanics instead of behavior",
            WarningKind::ImplementationDetail => "Step leaks implementation details (HTTP, SQL, selectors, ...)",
            WarningKind::MissingExamples => "Scenario Outline has no Examples table",
            WarningKind::TooFewExamples => "Examples table has fewer rows than the configured minimum",
            WarningKind::LongScenarioName => "Scenario name exceeds the configured length",
            WarningKind::LongStepText => "Step text exceeds the configured length",
            WarningKind::AmbiguousPronoun => "Step uses a pronoun with an unclear referent",
            WarningKind::ConjunctionInStep => "Step combines several actions or checks with and/or/but",
            WarningKind::InconsistentTense => "Scenario mixes present and past tense",
        }
    }
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for WarningKind {
    type Err = String;

    /// Accepts the kebab-case id as well as the SCREAMING_SNAKE spelling
    /// (`TAG_TYPO`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase().replace('_', "-");
        WarningKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| format!("Unknown warning kind: {}", s))
    }
}

/// A single finding reported by a detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    /// `"<file> - <scenario name>"`, or just the file for feature-level
    /// findings.
    pub location: String,
    /// Never empty.
    pub remediation: Vec<String>,
    pub standard_alternatives: Vec<String>,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] ({})",
            self.severity, self.message, self.kind, self.location
        )
    }
}

/// Location used for findings that concern the suite as a whole.
pub const CORPUS_LOCATION: &str = "(all features)";

/// Files of the features using any of `tags`, for corpus-level findings.
pub(crate) fn locations_of(features: &[Feature], tags: &[&str]) -> String {
    const MAX_LISTED: usize = 3;

    let mut files: Vec<String> = Vec::new();
    for feature in features {
        if tags.iter().any(|tag| feature.uses_tag(tag)) {
            let location = feature.location();
            if !files.contains(&location) {
                files.push(location);
            }
        }
    }

    match files.len() {
        0 => CORPUS_LOCATION.to_string(),
        n if n > MAX_LISTED => format!(
            "{} and {} more",
            files[..MAX_LISTED].join(", "),
            n - MAX_LISTED
        ),
        _ => files.join(", "),
    }
}

/// The Detector trait - implement this to add new checks
pub trait Detector: Send + Sync {
    /// Unique identifier for this detector (e.g., "tag-typo")
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Description of what this detector checks
    fn description(&self) -> &'static str;

    /// Warning kinds this detector can emit
    fn kinds(&self) -> &'static [WarningKind];

    /// Run the check and return warnings
    fn detect(&self, ctx: &AnalysisContext) -> Vec<Warning>;
}
