use super::step_rules::step_body;
use super::text::truncate;
use super::{Detector, Warning, WarningKind};
use crate::engine::AnalysisContext;
use regex::Regex;
use std::sync::LazyLock;

/// Quoted steps in messages are cut to this many characters.
const QUOTED_STEP_CHARS: usize = 50;

/// A compiled pattern with the label used in messages.
struct Pattern {
    regex: Regex,
    label: &'static str,
}

fn compile(patterns: &[(&str, &'static str)]) -> Vec<Pattern> {
    patterns
        .iter()
        .map(|(source, label)| Pattern {
            regex: Regex::new(&format!("(?i){}", source)).unwrap(),
            label,
        })
        .collect()
}

static UI_PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile(&[
        (r"\b(click|clicks|clicked|clicking|tap|taps|tapped|tapping)\b", "click/tap"),
        (
            r"\b(select|selects|selected|choose|chooses|chose)\b.*\b(dropdown|drop-down|list box|option|menu)\b",
            "dropdown selection",
        ),
        (
            r"\b(type|types|typed|typing|enter|enters|entered|fill|fills|filled)\b.*\b(field|textbox|text box|input)\b",
            "typing into a field",
        ),
        (r"\bscroll(s|ed|ing)?\b", "scrolling"),
        (r"\bhover(s|ed|ing)?\b", "hovering"),
        (r"\b(drag|drags|dragged|dragging)\b", "drag and drop"),
        (
            r"\b(button|checkbox|radio button|textbox|text box|dropdown|hyperlink)\b",
            "UI widget",
        ),
    ])
});

static IMPLEMENTATION_PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile(&[
        (r"\b(javascript|js|ajax|jquery)\b", "JavaScript"),
        (r"\bcss\b", "CSS"),
        (
            r"\bhttps?://|\bhttp\b|\b(get|post|put|patch|delete) request\b|\bstatus code\b|\bendpoint\b",
            "HTTP",
        ),
        (
            r"\bsql\b|\bselect \* from\b|\binsert into\b|\bdelete from\b|\bdatabase table\b",
            "SQL",
        ),
        (r"\b(xpath|selector|data-testid|div|span|iframe)\b", "selector/DOM"),
        (
            r"\b(timeout|sleep)\b|\bwaits? (for )?\d+ ?(ms|milliseconds|seconds?)\b",
            "timeout/wait",
        ),
    ])
});

static PRONOUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(it|they|them|this|that|these|those)\b").unwrap());

static CONJUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(and|or|but)\b").unwrap());

static PRESENT_TENSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(clicks|enters|submits|navigates|opens|creates|deletes|updates|selects|sees|views|receives|sends|logs|saves|adds|removes|visits|types|goes)\b",
    )
    .unwrap()
});

static PAST_TENSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(clicked|entered|submitted|navigated|opened|created|deleted|updated|selected|saw|viewed|received|sent|logged|saved|added|removed|visited|typed|went)\b",
    )
    .unwrap()
});

/// Detects steps describing UI mechanics or implementation details
pub struct ImplementationLeakDetector;

impl Detector for ImplementationLeakDetector {
    fn id(&self) -> &'static str {
        "implementation-leak"
    }

    fn name(&self) -> &'static str {
        "Implementation Leak"
    }

    fn description(&self) -> &'static str {
        "Detects steps coupled to UI interactions or to technical details such as HTTP, SQL or selectors"
    }

    fn kinds(&self) -> &'static [WarningKind] {
        &[WarningKind::UiCoupling, WarningKind::ImplementationDetail]
    }

    fn detect(&self, ctx: &AnalysisContext) -> Vec<Warning> {
        let mut categories: Vec<(WarningKind, &[Pattern], &str, &str)> = Vec::new();
        if ctx.is_enabled(WarningKind::UiCoupling) {
            categories.push((
                WarningKind::UiCoupling,
                UI_PATTERNS.as_slice(),
                "UI interaction",
                "Describe what the user achieves, not how they operate the screen",
            ));
        }
        if ctx.is_enabled(WarningKind::ImplementationDetail) {
            categories.push((
                WarningKind::ImplementationDetail,
                IMPLEMENTATION_PATTERNS.as_slice(),
                "implementation detail",
                "Move technical details into step definitions and keep the step in business language",
            ));
        }
        if categories.is_empty() {
            return Vec::new();
        }

        let mut warnings = Vec::new();
        for feature in ctx.features {
            for scenario in feature.testable_scenarios() {
                for step in scenario.steps.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
                    for (kind, patterns, what, fix) in &categories {
                        // First match only; the rest of the category is noise
                        let Some(pattern) = patterns.iter().find(|p| p.regex.is_match(step)) else {
                            continue;
                        };
                        warnings.push(ctx.warning(
                            *kind,
                            feature.scenario_location(scenario),
                            format!(
                                "Step \"{}\" contains {} ({})",
                                truncate(step, QUOTED_STEP_CHARS),
                                what,
                                pattern.label
                            ),
                            vec![fix.to_string()],
                        ));
                    }
                }
            }
        }
        warnings
    }
}

/// Detects overly long scenario names and step lines
pub struct NamingDetector;

impl Detector for NamingDetector {
    fn id(&self) -> &'static str {
        "naming"
    }

    fn name(&self) -> &'static str {
        "Naming"
    }

    fn description(&self) -> &'static str {
        "Detects scenario names and step lines longer than the configured limits"
    }

    fn kinds(&self) -> &'static [WarningKind] {
        &[WarningKind::LongScenarioName, WarningKind::LongStepText]
    }

    fn detect(&self, ctx: &AnalysisContext) -> Vec<Warning> {
        let thresholds = &ctx.config.thresholds;
        let names = ctx.is_enabled(WarningKind::LongScenarioName);
        let steps = ctx.is_enabled(WarningKind::LongStepText);
        let mut warnings = Vec::new();

        for feature in ctx.features {
            for scenario in feature.testable_scenarios() {
                let name_len = scenario.name.trim().chars().count();
                if names && name_len > thresholds.max_scenario_name_length {
                    warnings.push(ctx.warning(
                        WarningKind::LongScenarioName,
                        feature.scenario_location(scenario),
                        format!(
                            "Scenario name is {} characters (maximum: {})",
                            name_len, thresholds.max_scenario_name_length
                        ),
                        vec![
                            "Name the behavior, not the steps".to_string(),
                            "Move detail into the scenario description".to_string(),
                        ],
                    ));
                }

                if !steps {
                    continue;
                }
                for step in scenario.steps.iter().map(|s| s.trim()) {
                    let len = step.chars().count();
                    if len > thresholds.max_step_length {
                        warnings.push(ctx.warning(
                            WarningKind::LongStepText,
                            feature.scenario_location(scenario),
                            format!(
                                "Step \"{}\" is {} characters (maximum: {})",
                                truncate(step, QUOTED_STEP_CHARS),
                                len,
                                thresholds.max_step_length
                            ),
                            vec![
                                "Split the step or move data into a table".to_string(),
                                "Phrase the step at a higher level of abstraction".to_string(),
                            ],
                        ));
                    }
                }
            }
        }
        warnings
    }
}

/// Detects unclear pronouns, compound steps and mixed tenses
pub struct AmbiguousLanguageDetector;

impl Detector for AmbiguousLanguageDetector {
    fn id(&self) -> &'static str {
        "ambiguous-language"
    }

    fn name(&self) -> &'static str {
        "Ambiguous Language"
    }

    fn description(&self) -> &'static str {
        "Detects ambiguous pronouns, conjunctions joining several actions, and mixed present/past tense"
    }

    fn kinds(&self) -> &'static [WarningKind] {
        &[
            WarningKind::AmbiguousPronoun,
            WarningKind::ConjunctionInStep,
            WarningKind::InconsistentTense,
        ]
    }

    fn detect(&self, ctx: &AnalysisContext) -> Vec<Warning> {
        let pronouns = ctx.is_enabled(WarningKind::AmbiguousPronoun);
        let conjunctions = ctx.is_enabled(WarningKind::ConjunctionInStep);
        let tense = ctx.is_enabled(WarningKind::InconsistentTense);
        let mut warnings = Vec::new();

        for feature in ctx.features {
            for scenario in feature.testable_scenarios() {
                let location = feature.scenario_location(scenario);
                let mut present: Option<String> = None;
                let mut past: Option<String> = None;

                for step in scenario.steps.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
                    let body = step_body(step);
                    let quoted = truncate(step, QUOTED_STEP_CHARS);

                    if pronouns {
                        for found in PRONOUN.find_iter(body) {
                            warnings.push(ctx.warning(
                                WarningKind::AmbiguousPronoun,
                                location.clone(),
                                format!(
                                    "Ambiguous pronoun '{}' in step \"{}\"",
                                    found.as_str(),
                                    quoted
                                ),
                                vec![format!(
                                    "Replace '{}' with the thing it refers to",
                                    found.as_str()
                                )],
                            ));
                        }
                    }

                    if conjunctions {
                        if let Some(found) = CONJUNCTION.find(body) {
                            warnings.push(ctx.warning(
                                WarningKind::ConjunctionInStep,
                                location.clone(),
                                format!(
                                    "Step \"{}\" joins several clauses with '{}'",
                                    quoted,
                                    found.as_str()
                                ),
                                vec![
                                    "Split the step into separate And/But steps".to_string(),
                                    "Keep one action or one assertion per step".to_string(),
                                ],
                            ));
                        }
                    }

                    if tense {
                        if present.is_none() {
                            present = PRESENT_TENSE.find(body).map(|m| m.as_str().to_string());
                        }
                        if past.is_none() {
                            past = PAST_TENSE.find(body).map(|m| m.as_str().to_string());
                        }
                    }
                }

                if let (Some(present), Some(past)) = (present, past) {
                    warnings.push(ctx.warning(
                        WarningKind::InconsistentTense,
                        location,
                        format!(
                            "Scenario mixes present tense ('{}') and past tense ('{}')",
                            present, past
                        ),
                        vec![
                            "Write Given steps as state, When steps in present tense, Then steps as outcomes".to_string(),
                        ],
                    ));
                }
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::model::{Feature, Scenario, ScenarioKind, TagConcordance};

    fn feature_with(steps: &[&str]) -> Feature {
        Feature {
            name: "Profile".to_string(),
            filename: "profile.feature".to_string(),
            scenarios: vec![Scenario {
                name: "Update email".to_string(),
                steps: steps.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn run_with(detector: &dyn Detector, features: &[Feature], config: &DetectorConfig) -> Vec<Warning> {
        let concordance = TagConcordance::new();
        let ctx = AnalysisContext::new(features, &concordance, config);
        detector.detect(&ctx)
    }

    fn run(detector: &dyn Detector, features: &[Feature]) -> Vec<Warning> {
        run_with(detector, features, &DetectorConfig::default())
    }

    fn kinds(warnings: &[Warning]) -> Vec<WarningKind> {
        warnings.iter().map(|w| w.kind).collect()
    }

    #[test]
    fn test_ui_coupling_first_match_only() {
        let features = [feature_with(&["When I click the save button and scroll down"])];
        let warnings = run(&ImplementationLeakDetector, &features);

        assert_eq!(kinds(&warnings), vec![WarningKind::UiCoupling]);
        assert!(warnings[0].message.contains("(click/tap)"));
    }

    #[test]
    fn test_implementation_detail() {
        let features = [feature_with(&[
            "When a POST request is sent to the orders endpoint",
            "Then the row exists in the database table",
        ])];
        let warnings = run(&ImplementationLeakDetector, &features);

        assert_eq!(
            kinds(&warnings),
            vec![WarningKind::ImplementationDetail, WarningKind::ImplementationDetail]
        );
        assert!(warnings[0].message.contains("(HTTP)"));
        assert!(warnings[1].message.contains("(SQL)"));
    }

    #[test]
    fn test_one_step_can_leak_in_both_categories() {
        let features = [feature_with(&["When I click the div with xpath //a"])];
        let warnings = run(&ImplementationLeakDetector, &features);
        assert_eq!(
            kinds(&warnings),
            vec![WarningKind::UiCoupling, WarningKind::ImplementationDetail]
        );
    }

    #[test]
    fn test_business_language_is_clean() {
        let features = [feature_with(&[
            "Given a registered customer",
            "When the customer changes their email address",
            "Then a confirmation email is sent to the new address",
        ])];
        assert!(run(&ImplementationLeakDetector, &features).is_empty());
    }

    #[test]
    fn test_long_step_text_truncates_quote() {
        let long_step = format!("Given {}", "x".repeat(130));
        let features = [feature_with(&[long_step.as_str(), "When ok", "Then ok"])];
        let warnings = run(&NamingDetector, &features);

        assert_eq!(kinds(&warnings), vec![WarningKind::LongStepText]);
        let expected_quote = format!("\"Given {}...\"", "x".repeat(44));
        assert!(warnings[0].message.contains(&expected_quote));
        assert!(warnings[0].message.ends_with("is 136 characters (maximum: 120)"));
    }

    #[test]
    fn test_long_scenario_name() {
        let mut feature = feature_with(&["Given a", "When b", "Then c"]);
        feature.scenarios[0].name = "n".repeat(101);
        let warnings = run(&NamingDetector, &[feature]);

        assert_eq!(kinds(&warnings), vec![WarningKind::LongScenarioName]);
        assert_eq!(
            warnings[0].message,
            "Scenario name is 101 characters (maximum: 100)"
        );
    }

    #[test]
    fn test_pronoun_per_occurrence() {
        let features = [feature_with(&["Then it shows that they were saved"])];
        let mut config = DetectorConfig::default();
        config.restrict_to(&[WarningKind::AmbiguousPronoun]);
        let warnings = run_with(&AmbiguousLanguageDetector, &features, &config);

        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].message.starts_with("Ambiguous pronoun 'it'"));
        assert!(warnings[2].message.starts_with("Ambiguous pronoun 'they'"));
    }

    #[test]
    fn test_leading_and_is_not_a_conjunction() {
        let features = [feature_with(&["And the profile is stored", "But the user is not notified"])];
        let mut config = DetectorConfig::default();
        config.restrict_to(&[WarningKind::ConjunctionInStep]);
        assert!(run_with(&AmbiguousLanguageDetector, &features, &config).is_empty());
    }

    #[test]
    fn test_conjunction_mid_step_once_per_step() {
        let features = [feature_with(&["When the user saves and closes or exits"])];
        let mut config = DetectorConfig::default();
        config.restrict_to(&[WarningKind::ConjunctionInStep]);
        let warnings = run_with(&AmbiguousLanguageDetector, &features, &config);

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.ends_with("with 'and'"));
    }

    #[test]
    fn test_inconsistent_tense_once_per_scenario() {
        let features = [feature_with(&[
            "Given the user opened the settings",
            "When the user saves the form",
            "Then the user saw a banner",
            "And the user clicks close",
        ])];
        let mut config = DetectorConfig::default();
        config.restrict_to(&[WarningKind::InconsistentTense]);
        let warnings = run_with(&AmbiguousLanguageDetector, &features, &config);

        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].message,
            "Scenario mixes present tense ('saves') and past tense ('opened')"
        );
    }

    #[test]
    fn test_background_language_ignored() {
        let mut feature = feature_with(&["Given I click it and it scrolled"]);
        feature.scenarios[0].kind = ScenarioKind::Background;
        let features = [feature];
        assert!(run(&AmbiguousLanguageDetector, &features).is_empty());
        assert!(run(&ImplementationLeakDetector, &features).is_empty());
    }
}
