use crate::config::DetectorConfig;
use crate::model::{Feature, TagConcordance};
use crate::rules::{Warning, WarningKind};

/// Context passed to detectors during analysis
pub struct AnalysisContext<'a> {
    pub features: &'a [Feature],
    pub concordance: &'a TagConcordance,
    pub config: &'a DetectorConfig,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        features: &'a [Feature],
        concordance: &'a TagConcordance,
        config: &'a DetectorConfig,
    ) -> Self {
        Self {
            features,
            concordance,
            config,
        }
    }

    pub fn is_enabled(&self, kind: WarningKind) -> bool {
        self.config.is_enabled(kind)
    }

    /// Build a warning with the configured severity and standard
    /// alternatives for `kind`.
    pub fn warning(
        &self,
        kind: WarningKind,
        location: impl Into<String>,
        message: impl Into<String>,
        remediation: Vec<String>,
    ) -> Warning {
        debug_assert!(!remediation.is_empty(), "{kind} reported without remediation");
        let remediation = if remediation.is_empty() {
            vec![kind.description().to_string()]
        } else {
            remediation
        };
        Warning {
            kind,
            severity: self.config.severity(kind),
            message: message.into(),
            location: location.into(),
            remediation,
            standard_alternatives: self.config.standard_alternatives(kind).to_vec(),
        }
    }
}
