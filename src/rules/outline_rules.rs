use super::{Detector, Warning, WarningKind};
use crate::engine::AnalysisContext;
use crate::model::Example;

/// Detects scenario outlines without Examples or with too few rows
pub struct OutlineExamplesDetector;

impl Detector for OutlineExamplesDetector {
    fn id(&self) -> &'static str {
        "outline-examples"
    }

    fn name(&self) -> &'static str {
        "Outline Examples"
    }

    fn description(&self) -> &'static str {
        "Detects Scenario Outlines with no Examples table or with Examples blocks too small to justify an outline"
    }

    fn kinds(&self) -> &'static [WarningKind] {
        &[WarningKind::MissingExamples, WarningKind::TooFewExamples]
    }

    fn detect(&self, ctx: &AnalysisContext) -> Vec<Warning> {
        let min_examples = ctx.config.thresholds.min_examples;
        let mut warnings = Vec::new();

        for feature in ctx.features {
            for scenario in feature.scenarios.iter().filter(|s| s.is_outline()) {
                if scenario.examples.is_empty() {
                    if ctx.is_enabled(WarningKind::MissingExamples) {
                        warnings.push(ctx.warning(
                            WarningKind::MissingExamples,
                            feature.scenario_location(scenario),
                            format!("Scenario Outline '{}' has no Examples table", scenario.name),
                            vec![
                                "Add an Examples table with the values to run".to_string(),
                                "Convert it to a plain Scenario if it needs no parameters".to_string(),
                            ],
                        ));
                    }
                    continue;
                }

                if !ctx.is_enabled(WarningKind::TooFewExamples) {
                    continue;
                }
                for (index, block) in scenario.examples.iter().enumerate() {
                    let rows = block.rows.len();
                    if rows >= min_examples {
                        continue;
                    }
                    warnings.push(ctx.warning(
                        WarningKind::TooFewExamples,
                        feature.scenario_location(scenario),
                        format!(
                            "Examples block '{}' has {} row{} (minimum: {})",
                            block_name(block, index),
                            rows,
                            if rows == 1 { "" } else { "s" },
                            min_examples
                        ),
                        vec![
                            "Add rows covering boundary and error cases".to_string(),
                            "Inline the values into a plain Scenario if one row is enough".to_string(),
                        ],
                    ));
                }
            }
        }
        warnings
    }
}

/// Unnamed blocks are referred to by 1-based position.
fn block_name(block: &Example, index: usize) -> String {
    match block.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("#{}", index + 1),
    }
}
