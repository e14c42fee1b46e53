use super::language_rules::{AmbiguousLanguageDetector, ImplementationLeakDetector, NamingDetector};
use super::low_value::LowValueTagDetector;
use super::missing_tags::MissingTagDetector;
use super::outline_rules::OutlineExamplesDetector;
use super::step_rules::{StepCountDetector, StepStructureDetector};
use super::tag_frequency::TagFrequencyDetector;
use super::tag_typo::TagTypoDetector;
use super::{Category, Detector};

/// Detectors producing tag-quality warnings, in report order
pub fn tag_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(MissingTagDetector),
        Box::new(TagTypoDetector),
        Box::new(LowValueTagDetector),
        Box::new(TagFrequencyDetector),
    ]
}

/// Detectors producing scenario anti-pattern warnings, in report order
pub fn anti_pattern_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(StepCountDetector),
        Box::new(StepStructureDetector),
        Box::new(NamingDetector),
        Box::new(AmbiguousLanguageDetector),
        Box::new(ImplementationLeakDetector),
        Box::new(OutlineExamplesDetector),
    ]
}

/// Get all registered detectors
pub fn all_detectors() -> Vec<Box<dyn Detector>> {
    let mut detectors = tag_detectors();
    detectors.extend(anti_pattern_detectors());
    detectors
}

/// Get a detector by its ID
pub fn get_detector(id: &str) -> Option<Box<dyn Detector>> {
    all_detectors().into_iter().find(|d| d.id() == id)
}

/// The category shared by every kind a detector reports.
pub fn category_of(detector: &dyn Detector) -> Category {
    detector
        .kinds()
        .first()
        .map(|kind| kind.category())
        .unwrap_or(Category::Tag)
}
