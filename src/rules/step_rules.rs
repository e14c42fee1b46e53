use super::{Detector, Warning, WarningKind};
use crate::engine::AnalysisContext;
use crate::model::{Feature, Scenario};

/// Leading Gherkin keyword of a step line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Given,
    When,
    Then,
    And,
    But,
    /// The `*` bullet keyword.
    Star,
    /// No recognized keyword.
    Other,
}

impl Keyword {
    /// Classify a step by its first word, case-insensitively.
    pub fn of(step: &str) -> Keyword {
        let word = step.split_whitespace().next().unwrap_or("");
        match word.to_lowercase().as_str() {
            "given" => Keyword::Given,
            "when" => Keyword::When,
            "then" => Keyword::Then,
            "and" => Keyword::And,
            "but" => Keyword::But,
            "*" => Keyword::Star,
            _ => Keyword::Other,
        }
    }
}

/// Step text after its leading keyword.
pub fn step_body(step: &str) -> &str {
    let trimmed = step.trim();
    match Keyword::of(trimmed) {
        Keyword::Other => trimmed,
        _ => trimmed
            .split_once(char::is_whitespace)
            .map_or("", |(_, rest)| rest.trim_start()),
    }
}

/// Position in the Given -> When -> Then sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Unknown,
    Given,
    When,
    Then,
}

impl StepState {
    /// Next state after a step with `keyword`, and whether taking it breaks
    /// the Given -> When -> Then order. And/But/`*` and keyword-less steps
    /// keep the current state.
    pub fn transition(self, keyword: Keyword) -> (StepState, bool) {
        match (self, keyword) {
            (state, Keyword::And | Keyword::But | Keyword::Star | Keyword::Other) => {
                (state, false)
            }
            (StepState::Then, Keyword::When) => (StepState::When, true),
            (StepState::When | StepState::Then, Keyword::Given) => (StepState::Given, true),
            (_, Keyword::Given) => (StepState::Given, false),
            (_, Keyword::When) => (StepState::When, false),
            (_, Keyword::Then) => (StepState::Then, false),
        }
    }
}

impl std::fmt::Display for StepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepState::Unknown => write!(f, "unknown"),
            StepState::Given => write!(f, "Given"),
            StepState::When => write!(f, "When"),
            StepState::Then => write!(f, "Then"),
        }
    }
}

/// An out-of-order step found while walking a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderViolation<'a> {
    pub step: &'a str,
    pub after: StepState,
}

/// Result of walking one scenario's steps through [`StepState`].
#[derive(Debug, Default)]
pub struct StepWalk<'a> {
    pub has_given: bool,
    pub has_when: bool,
    pub has_then: bool,
    pub violations: Vec<OrderViolation<'a>>,
}

impl<'a> StepWalk<'a> {
    /// Walk `steps` from [`StepState::Unknown`]; blank steps are skipped.
    pub fn run(steps: &'a [String]) -> Self {
        let mut walk = StepWalk::default();
        let mut state = StepState::Unknown;

        for step in steps.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let (next, violation) = state.transition(Keyword::of(step));
            if violation {
                walk.violations.push(OrderViolation { step, after: state });
            }
            match next {
                StepState::Given => walk.has_given = true,
                StepState::When => walk.has_when = true,
                StepState::Then => walk.has_then = true,
                StepState::Unknown => {}
            }
            state = next;
        }
        walk
    }
}

fn non_blank_steps(scenario: &Scenario) -> usize {
    scenario.steps.iter().filter(|s| !s.trim().is_empty()).count()
}

/// Detects scenarios that are too long or too short
pub struct StepCountDetector;

impl Detector for StepCountDetector {
    fn id(&self) -> &'static str {
        "step-count"
    }

    fn name(&self) -> &'static str {
        "Step Count"
    }

    fn description(&self) -> &'static str {
        "Detects scenarios with a step count outside the configured range"
    }

    fn kinds(&self) -> &'static [WarningKind] {
        &[WarningKind::LongScenario, WarningKind::TooFewSteps]
    }

    fn detect(&self, ctx: &AnalysisContext) -> Vec<Warning> {
        let long = ctx.is_enabled(WarningKind::LongScenario);
        let short = ctx.is_enabled(WarningKind::TooFewSteps);
        let thresholds = &ctx.config.thresholds;
        let mut warnings = Vec::new();

        for feature in ctx.features {
            for scenario in feature.testable_scenarios() {
                let count = non_blank_steps(scenario);
                if long && count > thresholds.max_steps {
                    warnings.push(ctx.warning(
                        WarningKind::LongScenario,
                        feature.scenario_location(scenario),
                        format!(
                            "Scenario has {} steps (maximum: {})",
                            count, thresholds.max_steps
                        ),
                        vec![
                            "Split the scenario into smaller scenarios, one behavior each".to_string(),
                            "Move shared setup into a Background".to_string(),
                            "Replace sequences of low-level steps with one declarative step".to_string(),
                        ],
                    ));
                } else if short && count < thresholds.min_steps {
                    warnings.push(ctx.warning(
                        WarningKind::TooFewSteps,
                        feature.scenario_location(scenario),
                        format!(
                            "Scenario has {} step{} (minimum: {})",
                            count,
                            if count == 1 { "" } else { "s" },
                            thresholds.min_steps
                        ),
                        vec!["State the context, the action and the expected outcome".to_string()],
                    ));
                }
            }
        }
        warnings
    }
}

/// Detects missing Given/When/Then steps and out-of-order steps
pub struct StepStructureDetector;

impl Detector for StepStructureDetector {
    fn id(&self) -> &'static str {
        "step-structure"
    }

    fn name(&self) -> &'static str {
        "Step Structure"
    }

    fn description(&self) -> &'static str {
        "Detects scenarios missing a Given, When or Then step, and steps breaking Given -> When -> Then order"
    }

    fn kinds(&self) -> &'static [WarningKind] {
        &[
            WarningKind::MissingGiven,
            WarningKind::MissingWhen,
            WarningKind::MissingThen,
            WarningKind::IncorrectStepOrder,
        ]
    }

    fn detect(&self, ctx: &AnalysisContext) -> Vec<Warning> {
        let mut warnings = Vec::new();
        for feature in ctx.features {
            for scenario in feature.testable_scenarios() {
                let walk = StepWalk::run(&scenario.steps);
                missing_step_types(ctx, feature, scenario, &walk, &mut warnings);
                if ctx.is_enabled(WarningKind::IncorrectStepOrder) {
                    order_violations(ctx, feature, scenario, &walk, &mut warnings);
                }
            }
        }
        warnings
    }
}

fn missing_step_types(
    ctx: &AnalysisContext,
    feature: &Feature,
    scenario: &Scenario,
    walk: &StepWalk,
    warnings: &mut Vec<Warning>,
) {
    let checks = [
        (
            WarningKind::MissingGiven,
            walk.has_given,
            "Given",
            "Add a Given step describing the starting context",
        ),
        (
            WarningKind::MissingWhen,
            walk.has_when,
            "When",
            "Add a When step describing the action under test",
        ),
        (
            WarningKind::MissingThen,
            walk.has_then,
            "Then",
            "Add a Then step asserting the expected outcome",
        ),
    ];

    for (kind, present, keyword, fix) in checks {
        if present || !ctx.is_enabled(kind) {
            continue;
        }
        warnings.push(ctx.warning(
            kind,
            feature.scenario_location(scenario),
            format!("Scenario has no {} step", keyword),
            vec![fix.to_string()],
        ));
    }
}

fn order_violations(
    ctx: &AnalysisContext,
    feature: &Feature,
    scenario: &Scenario,
    walk: &StepWalk,
    warnings: &mut Vec<Warning>,
) {
    for violation in &walk.violations {
        warnings.push(ctx.warning(
            WarningKind::IncorrectStepOrder,
            feature.scenario_location(scenario),
            format!(
                "Step \"{}\" occurs after a {} step",
                violation.step, violation.after
            ),
            vec![
                "Order steps as Given -> When -> Then".to_string(),
                "Split scenarios that verify and then act again into separate scenarios".to_string(),
            ],
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::model::{ScenarioKind, TagConcordance};

    fn steps(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn feature_with(steps: Vec<String>) -> Feature {
        Feature {
            name: "Cart".to_string(),
            filename: "cart.feature".to_string(),
            scenarios: vec![Scenario {
                name: "Add item".to_string(),
                steps,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn run(detector: &dyn Detector, features: &[Feature]) -> Vec<Warning> {
        let concordance = TagConcordance::new();
        let config = DetectorConfig::default();
        let ctx = AnalysisContext::new(features, &concordance, &config);
        detector.detect(&ctx)
    }

    #[test]
    fn test_keyword_classification() {
        assert_eq!(Keyword::of("Given a user"), Keyword::Given);
        assert_eq!(Keyword::of("  WHEN they log in"), Keyword::When);
        assert_eq!(Keyword::of("then it works"), Keyword::Then);
        assert_eq!(Keyword::of("And more"), Keyword::And);
        assert_eq!(Keyword::of("* bullet"), Keyword::Star);
        assert_eq!(Keyword::of("Givenness"), Keyword::Other);
        assert_eq!(Keyword::of(""), Keyword::Other);
    }

    #[test]
    fn test_step_body() {
        assert_eq!(step_body("Given  a logged in user"), "a logged in user");
        assert_eq!(step_body("And"), "");
        assert_eq!(step_body("no keyword here"), "no keyword here");
    }

    #[test]
    fn test_transition_table() {
        use Keyword as K;
        use StepState as S;

        assert_eq!(S::Unknown.transition(K::When), (S::When, false));
        assert_eq!(S::Given.transition(K::Then), (S::Then, false));
        assert_eq!(S::Then.transition(K::When), (S::When, true));
        assert_eq!(S::When.transition(K::Given), (S::Given, true));
        assert_eq!(S::Then.transition(K::Given), (S::Given, true));
        assert_eq!(S::Then.transition(K::And), (S::Then, false));
        assert_eq!(S::When.transition(K::When), (S::When, false));
        assert_eq!(S::Then.transition(K::Then), (S::Then, false));
    }

    #[test]
    fn test_long_scenario() {
        let mut list = vec!["Given a cart".to_string(), "When I add an item".to_string()];
        list.extend((0..9).map(|i| format!("And I add item {}", i)));
        list.push("Then the cart is full".to_string());
        let warnings = run(&StepCountDetector, &[feature_with(list)]);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::LongScenario);
        assert_eq!(warnings[0].message, "Scenario has 12 steps (maximum: 10)");
    }

    #[test]
    fn test_too_few_steps() {
        let warnings = run(&StepCountDetector, &[feature_with(steps(&["Then done"]))]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::TooFewSteps);
        assert_eq!(warnings[0].message, "Scenario has 1 step (minimum: 2)");
    }

    #[test]
    fn test_background_skipped() {
        let mut feature = feature_with(steps(&["Given only one"]));
        feature.scenarios[0].kind = ScenarioKind::Background;
        assert!(run(&StepCountDetector, &[feature.clone()]).is_empty());
        assert!(run(&StepStructureDetector, &[feature]).is_empty());
    }

    #[test]
    fn test_when_after_then_is_single_violation() {
        let feature = feature_with(steps(&["Given A", "When B", "Then C", "When D"]));
        let warnings = run(&StepStructureDetector, &[feature]);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::IncorrectStepOrder);
        assert_eq!(warnings[0].message, "Step \"When D\" occurs after a Then step");
    }

    #[test]
    fn test_and_inherits_previous_type() {
        let feature = feature_with(steps(&[
            "Given a user",
            "And a product",
            "When the user buys it",
            "Then an order exists",
            "And Given nothing",
            "But the stock is lower",
        ]));
        assert!(run(&StepStructureDetector, &[feature]).is_empty());
    }

    #[test]
    fn test_each_violation_reported() {
        let feature = feature_with(steps(&[
            "When I act",
            "Given setup late",
            "Then I check",
            "Given more setup",
        ]));
        let warnings = run(&StepStructureDetector, &[feature]);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();

        assert_eq!(
            messages,
            vec![
                "Step \"Given setup late\" occurs after a When step",
                "Step \"Given more setup\" occurs after a Then step",
            ]
        );
    }

    #[test]
    fn test_state_resets_per_scenario() {
        let mut feature = feature_with(steps(&["Given a", "When b", "Then c"]));
        feature.scenarios.push(Scenario {
            name: "Second".to_string(),
            steps: steps(&["Given d", "When e", "Then f"]),
            ..Default::default()
        });
        assert!(run(&StepStructureDetector, &[feature]).is_empty());
    }

    #[test]
    fn test_missing_step_types() {
        let feature = feature_with(steps(&["And something", "When I act"]));
        let warnings = run(&StepStructureDetector, &[feature]);
        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();

        assert_eq!(kinds, vec![WarningKind::MissingGiven, WarningKind::MissingThen]);
    }

    #[test]
    fn test_disabled_order_check_does_not_report() {
        let feature = feature_with(steps(&["Given A", "When B", "Then C", "When D"]));
        let concordance = TagConcordance::new();
        let mut config = DetectorConfig::default();
        config.set_enabled(WarningKind::IncorrectStepOrder, false);
        let features = [feature];
        let ctx = AnalysisContext::new(&features, &concordance, &config);

        assert!(StepStructureDetector.detect(&ctx).is_empty());
    }
}
