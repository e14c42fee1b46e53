//! Analysis engine - runs the detector families over a feature corpus.

mod context;
pub mod loader;

pub use context::AnalysisContext;

use crate::config::DetectorConfig;
use crate::error::Result;
use crate::model::{Feature, TagConcordance};
use crate::rules::{registry, Detector, Warning};
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Runs the tag-quality detectors: missing tags, typos, low-value tags and
/// frequency checks.
pub struct TagQualityAnalyzer;

impl TagQualityAnalyzer {
    pub fn analyze(
        features: &[Feature],
        concordance: &TagConcordance,
        config: &DetectorConfig,
    ) -> Vec<Warning> {
        let ctx = AnalysisContext::new(features, concordance, config);
        run_detectors(registry::tag_detectors(), &ctx)
    }
}

/// Runs the scenario anti-pattern detectors. Tag data is not consulted.
pub struct AntiPatternAnalyzer;

impl AntiPatternAnalyzer {
    pub fn analyze(features: &[Feature], config: &DetectorConfig) -> Vec<Warning> {
        let concordance = TagConcordance::new();
        let ctx = AnalysisContext::new(features, &concordance, config);
        run_detectors(registry::anti_pattern_detectors(), &ctx)
    }
}

pub struct Engine<'a> {
    config: &'a DetectorConfig,
}

impl<'a> Engine<'a> {
    pub fn new(config: &'a DetectorConfig) -> Self {
        Self { config }
    }

    /// Tag-quality warnings first, then anti-patterns.
    pub fn analyze(&self, features: &[Feature], concordance: &TagConcordance) -> Vec<Warning> {
        let (mut warnings, anti_patterns) = rayon::join(
            || TagQualityAnalyzer::analyze(features, concordance, self.config),
            || AntiPatternAnalyzer::analyze(features, self.config),
        );
        warnings.extend(anti_patterns);

        info!(
            features = features.len(),
            tags = concordance.len(),
            warnings = warnings.len(),
            "analysis complete"
        );
        warnings
    }

    /// Load a JSON corpus and analyze it with a concordance computed from it.
    pub fn analyze_file(&self, path: &Path) -> Result<Vec<Warning>> {
        let features = loader::load_corpus(path)?;
        let concordance = TagConcordance::from_features(&features);
        Ok(self.analyze(&features, &concordance))
    }
}

fn run_detectors(detectors: Vec<Box<dyn Detector>>, ctx: &AnalysisContext) -> Vec<Warning> {
    let active: Vec<Box<dyn Detector>> = detectors
        .into_iter()
        .filter(|d| d.kinds().iter().any(|kind| ctx.is_enabled(*kind)))
        .collect();

    let per_detector: Vec<Vec<Warning>> = active
        .par_iter()
        .map(|detector| {
            let warnings = detector.detect(ctx);
            debug!(detector = detector.id(), warnings = warnings.len(), "detector finished");
            warnings
        })
        .collect();

    // Detectors gate on their own kinds, but one disabled kind inside an
    // enabled detector must still never surface.
    per_detector
        .into_iter()
        .flatten()
        .filter(|w| ctx.is_enabled(w.kind))
        .collect()
}
