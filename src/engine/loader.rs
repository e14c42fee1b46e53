//! Reads a feature corpus serialized as JSON.
//!
//! Two shapes are accepted: a bare array of features, or an object with a
//! `features` array (the form most Gherkin-to-JSON exporters wrap it in).

use crate::error::{Error, Result};
use crate::model::Feature;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Maximum corpus file size (64 MB)
const MAX_CORPUS_SIZE: u64 = 64 * 1024 * 1024;

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Features(Vec<Feature>),
    Wrapped { features: Vec<Feature> },
}

impl From<CorpusFile> for Vec<Feature> {
    fn from(file: CorpusFile) -> Self {
        match file {
            CorpusFile::Features(features) | CorpusFile::Wrapped { features } => features,
        }
    }
}

/// Load every feature from the JSON file at `path`.
pub fn load_corpus(path: &Path) -> Result<Vec<Feature>> {
    let metadata = std::fs::metadata(path).map_err(|e| Error::io(path, e))?;
    check_size(path, metadata.len(), MAX_CORPUS_SIZE)?;

    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let features = parse_corpus(&content).map_err(|e| Error::corpus(path, e))?;
    debug!(path = %path.display(), features = features.len(), "loaded corpus");
    Ok(features)
}

fn check_size(path: &Path, size: u64, max: u64) -> Result<()> {
    if size > max {
        return Err(Error::corpus_too_large(path, size, max));
    }
    Ok(())
}

/// Parse a corpus from JSON text.
pub fn parse_corpus(content: &str) -> std::result::Result<Vec<Feature>, serde_json::Error> {
    serde_json::from_str::<CorpusFile>(content).map(Vec::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScenarioKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CORPUS: &str = r#"[
        {
            "name": "Checkout",
            "filename": "checkout.feature",
            "tags": ["@P1", "@payments"],
            "scenarios": [
                { "name": "Setup", "kind": "background", "steps": ["Given a cart"] },
                {
                    "name": "Pay by card",
                    "kind": "scenario_outline",
                    "steps": ["When I pay <amount>", "Then I see a receipt"],
                    "examples": [{ "headers": ["amount"], "rows": [["10"], ["20"]] }]
                }
            ]
        }
    ]"#;

    #[test]
    fn test_parse_bare_array() {
        let features = parse_corpus(CORPUS).unwrap();
        assert_eq!(features.len(), 1);
        let scenarios = &features[0].scenarios;
        assert_eq!(scenarios[0].kind, ScenarioKind::Background);
        assert_eq!(scenarios[1].kind, ScenarioKind::ScenarioOutline);
        assert_eq!(scenarios[1].examples[0].rows.len(), 2);
        assert_eq!(scenarios[1].examples[0].name, None);
    }

    #[test]
    fn test_parse_wrapped_object() {
        let wrapped = format!(r#"{{ "features": {} }}"#, CORPUS);
        let features = parse_corpus(&wrapped).unwrap();
        assert_eq!(features[0].filename, "checkout.feature");
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let features = parse_corpus(r#"[{ "name": "Bare", "filename": "bare.feature" }]"#).unwrap();
        assert!(features[0].tags.is_empty());
        assert!(features[0].scenarios.is_empty());
    }

    #[test]
    fn test_load_corpus_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CORPUS.as_bytes()).unwrap();

        let features = load_corpus(file.path()).unwrap();
        assert_eq!(features[0].name, "Checkout");
    }

    #[test]
    fn test_load_corpus_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = load_corpus(file.path()).unwrap_err();
        assert!(matches!(err, Error::Corpus { .. }));
    }

    #[test]
    fn test_load_corpus_missing_file() {
        let err = load_corpus(Path::new("/nonexistent/corpus.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_oversized_corpus_is_rejected() {
        let path = Path::new("big.json");
        assert!(check_size(path, 1024, 1024).is_ok());

        let err = check_size(path, 1025, 1024).unwrap_err();
        assert!(matches!(
            err,
            Error::CorpusTooLarge {
                size: 1025,
                max: 1024,
                ..
            }
        ));
        assert!(err.to_string().contains("big.json"));
    }
}
