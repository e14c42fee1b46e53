//! bdd-lint: tag hygiene and anti-pattern analysis for Gherkin suites
//!
//! Feed it parsed features and it reports missing or misspelled tags,
//! badly structured scenarios and steps that leak implementation detail.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod reporter;
pub mod rules;

pub use config::{Config, DetectorConfig};
pub use engine::{AnalysisContext, AntiPatternAnalyzer, Engine, TagQualityAnalyzer};
pub use error::{Error, Result};
pub use model::{Example, Feature, Scenario, ScenarioKind, TagConcordance};
pub use reporter::WarningGroups;
pub use rules::{Detector, Severity, Warning, WarningKind};

/// Run every enabled detector over a corpus
pub fn analyze(
    features: &[Feature],
    concordance: &TagConcordance,
    config: &DetectorConfig,
) -> Vec<Warning> {
    Engine::new(config).analyze(features, concordance)
}
