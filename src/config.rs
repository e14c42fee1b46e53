use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use tracing::warn;

use crate::error::{Error, Result};
use crate::rules::text::bare_tag;
use crate::{Severity, WarningKind};

/// Maximum config file size (1 MB) - prevents memory exhaustion from malformed files
const MAX_CONFIG_SIZE: u64 = 1024 * 1024;

/// Name of the configuration file looked up in the analyzed directory.
pub const CONFIG_FILENAME: &str = "bdd-lint.toml";

const DEFAULT_PRIORITY_TAGS: &[&str] = &[
    "@p0", "@p1", "@p2", "@p3", "@p4", "@priority0", "@priority1", "@priority2", "@priority3",
    "@priority4", "@critical", "@high", "@medium", "@low",
];

const DEFAULT_TYPE_TAGS: &[&str] = &[
    "@ui", "@api", "@integration", "@unit", "@e2e", "@smoke", "@regression", "@performance",
    "@security", "@accessibility", "@contract", "@component", "@acceptance",
];

const DEFAULT_STATUS_TAGS: &[&str] = &[
    "@wip", "@manual", "@automated", "@skip", "@ignore", "@pending", "@flaky", "@deprecated",
    "@blocked",
];

const DEFAULT_LOW_VALUE_TAGS: &[&str] = &[
    "@test", "@tests", "@feature", "@features", "@scenario", "@temp", "@tmp", "@todo", "@fixme",
    "@misc", "@stuff", "@other", "@general", "@new", "@old", "@tbd", "@foo", "@xxx",
];

/// On-disk configuration, as written in `bdd-lint.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Per-kind settings keyed by warning kind id. Unknown keys are ignored.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSettings>,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleSettings {
    pub enabled: Option<bool>,
    pub severity: Option<Severity>,
    #[serde(default)]
    pub standard_alternatives: Vec<String>,
}

/// Named numeric limits used by the detectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Thresholds {
    pub max_steps: usize,
    pub min_steps: usize,
    pub min_examples: usize,
    pub max_scenario_name_length: usize,
    pub max_step_length: usize,
    pub max_tags: usize,
    /// Share of features (percent) a tag must reach to count as too generic.
    pub generic_tag_percent: usize,
    /// Corpus must have more features than this before the generic check runs.
    pub generic_tag_min_features: usize,
    /// Tags this long or shorter (sigil included) are ambiguous.
    pub ambiguous_tag_length: usize,
    /// How many times more frequent the canonical tag must be than its typo.
    pub typo_frequency_ratio: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_steps: 10,
            min_steps: 2,
            min_examples: 2,
            max_scenario_name_length: 100,
            max_step_length: 120,
            max_tags: 6,
            generic_tag_percent: 90,
            generic_tag_min_features: 5,
            ambiguous_tag_length: 3,
            typo_frequency_ratio: 2,
        }
    }
}

/// Custom tag vocabularies; a non-empty list replaces the built-in one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VocabularyConfig {
    #[serde(default)]
    pub priority: Vec<String>,
    #[serde(default, rename = "type")]
    pub types: Vec<String>,
    #[serde(default)]
    pub status: Vec<String>,
    #[serde(default)]
    pub low_value: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default = "default_color")]
    pub color: String,
}

fn default_format() -> String {
    "console".to_string()
}

fn default_color() -> String {
    "auto".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            color: default_color(),
        }
    }
}

impl Config {
    /// Load config from bdd-lint.toml in the given path, or return default
    ///
    /// # Arguments
    ///
    /// * `path` - Directory holding bdd-lint.toml, or a file inside it
    ///
    /// # Errors
    ///
    /// Returns an error if the path doesn't exist or if the config file
    /// exists but cannot be parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::config(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }

        // If path is a file, use its parent directory for config lookup
        let dir_path = if path.is_file() {
            path.parent().unwrap_or(path)
        } else {
            path
        };

        let config_path = dir_path.join(CONFIG_FILENAME);
        if config_path.exists() {
            Self::from_file(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load config from an explicit file.
    pub fn from_file(config_path: &Path) -> Result<Self> {
        // Check file size before reading to prevent memory exhaustion
        let metadata = std::fs::metadata(config_path).map_err(|e| Error::io(config_path, e))?;
        if metadata.len() > MAX_CONFIG_SIZE {
            return Err(Error::config(format!(
                "Config file too large ({} bytes, max {} bytes): {}",
                metadata.len(),
                MAX_CONFIG_SIZE,
                config_path.display()
            )));
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|e| Error::io(config_path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Generate default TOML config
    pub fn default_toml() -> &'static str {
        r#"# bdd-lint configuration

# Per-kind settings. Keys are warning kind ids (`bdd-lint rules` lists them).
# Unknown kinds are ignored.
[rules.missing-priority-tag]
enabled = true
severity = "warning"  # "info", "warning", "error"
standard-alternatives = ["@P0", "@P1", "@P2", "@P3"]

[rules.missing-status-tag]
enabled = false

# [rules.ambiguous-pronoun]
# enabled = false

[thresholds]
max-steps = 10
min-steps = 2
min-examples = 2
max-scenario-name-length = 100
max-step-length = 120
max-tags = 6

# Non-empty lists replace the built-in vocabularies.
[vocabulary]
# priority = ["@blocker", "@major", "@minor"]
# type = ["@ui", "@api"]
# status = ["@wip", "@manual"]
# low-value = ["@test", "@temp"]

[output]
format = "console"  # "console", "text", "json"
color = "auto"      # "auto", "always", "never"
"#
    }
}

/// Effective settings for one warning kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub enabled: bool,
    pub severity: Severity,
    pub standard_alternatives: Vec<String>,
}

impl RuleConfig {
    fn default_for(kind: WarningKind) -> Self {
        Self {
            enabled: kind.enabled_by_default(),
            severity: kind.default_severity(),
            standard_alternatives: default_alternatives(kind)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn default_alternatives(kind: WarningKind) -> &'static [&'static str] {
    match kind {
        WarningKind::MissingPriorityTag => &["@P0", "@P1", "@P2", "@P3"],
        WarningKind::MissingTypeTag => &["@UI", "@API", "@Integration", "@Unit"],
        WarningKind::MissingStatusTag => &["@wip", "@manual", "@automated"],
        _ => &[],
    }
}

/// One effective vocabulary per tag category, stored as bare lowercase
/// names (no sigil).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVocabulary {
    pub priority: BTreeSet<String>,
    pub types: BTreeSet<String>,
    pub status: BTreeSet<String>,
    pub low_value: BTreeSet<String>,
}

impl Default for TagVocabulary {
    fn default() -> Self {
        Self::merged(&VocabularyConfig::default())
    }
}

impl TagVocabulary {
    /// Merge custom lists over the built-in defaults.
    pub fn merged(custom: &VocabularyConfig) -> Self {
        Self {
            priority: pick(&custom.priority, DEFAULT_PRIORITY_TAGS),
            types: pick(&custom.types, DEFAULT_TYPE_TAGS),
            status: pick(&custom.status, DEFAULT_STATUS_TAGS),
            low_value: pick(&custom.low_value, DEFAULT_LOW_VALUE_TAGS),
        }
    }

    pub fn is_priority(&self, tag: &str) -> bool {
        self.priority.contains(&bare_tag(tag))
    }

    pub fn is_type(&self, tag: &str) -> bool {
        self.types.contains(&bare_tag(tag))
    }

    pub fn is_status(&self, tag: &str) -> bool {
        self.status.contains(&bare_tag(tag))
    }

    pub fn is_low_value(&self, tag: &str) -> bool {
        self.low_value.contains(&bare_tag(tag))
    }
}

fn pick(custom: &[String], defaults: &[&str]) -> BTreeSet<String> {
    let custom: BTreeSet<String> = custom
        .iter()
        .map(|t| bare_tag(t))
        .filter(|t| !t.is_empty())
        .collect();
    if custom.is_empty() {
        defaults.iter().map(|t| bare_tag(t)).collect()
    } else {
        custom
    }
}

/// Fully resolved configuration handed to the detectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorConfig {
    rules: HashMap<WarningKind, RuleConfig>,
    pub thresholds: Thresholds,
    pub vocabulary: TagVocabulary,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl DetectorConfig {
    /// Resolve every kind against its defaults and merge the vocabularies.
    pub fn from_config(config: &Config) -> Self {
        let mut rules: HashMap<WarningKind, RuleConfig> = WarningKind::ALL
            .iter()
            .map(|kind| (*kind, RuleConfig::default_for(*kind)))
            .collect();

        for (key, settings) in &config.rules {
            let Ok(kind) = key.parse::<WarningKind>() else {
                warn!(rule = %key, "Unknown warning kind in configuration (will be ignored)");
                continue;
            };
            let Some(rule) = rules.get_mut(&kind) else {
                continue;
            };
            if let Some(enabled) = settings.enabled {
                rule.enabled = enabled;
            }
            if let Some(severity) = settings.severity {
                rule.severity = severity;
            }
            if !settings.standard_alternatives.is_empty() {
                rule.standard_alternatives = settings.standard_alternatives.clone();
            }
        }

        Self {
            rules,
            thresholds: config.thresholds.clone(),
            vocabulary: TagVocabulary::merged(&config.vocabulary),
        }
    }

    pub fn rule(&self, kind: WarningKind) -> RuleConfig {
        self.rules
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| RuleConfig::default_for(kind))
    }

    pub fn is_enabled(&self, kind: WarningKind) -> bool {
        self.rules
            .get(&kind)
            .map_or(kind.enabled_by_default(), |r| r.enabled)
    }

    pub fn severity(&self, kind: WarningKind) -> Severity {
        self.rules
            .get(&kind)
            .map_or(kind.default_severity(), |r| r.severity)
    }

    pub fn standard_alternatives(&self, kind: WarningKind) -> &[String] {
        self.rules
            .get(&kind)
            .map(|r| r.standard_alternatives.as_slice())
            .unwrap_or(&[])
    }

    pub fn set_enabled(&mut self, kind: WarningKind, enabled: bool) {
        self.rules
            .entry(kind)
            .or_insert_with(|| RuleConfig::default_for(kind))
            .enabled = enabled;
    }

    /// Disable every kind not in `kinds`.
    pub fn restrict_to(&mut self, kinds: &[WarningKind]) {
        for kind in WarningKind::ALL {
            if !kinds.contains(kind) {
                self.set_enabled(*kind, false);
            }
        }
    }
}
