//! Rule File Loading
//!
//! ## File Format
//!
//! Rule bases are external JSON configuration in the deployed format:
//!
//! ```json
//! {
//!   "project_name": "Smart Compost Monitoring - Simplified",
//!   "version": "2.0",
//!   "total_rules": 16,
//!   "variables": {
//!     "inputs":  { "suhu": ["Dingin", "Ideal", "Panas"] },
//!     "outputs": { "status_kompos": ["Buruk", "Sedang", "Baik", "Sangat Baik"] }
//!   },
//!   "rules": [
//!     { "id": 1,
//!       "if": { "bau": "Tidak Bau", "suhu": "Ideal", "ph": "Netral", "kelembapan": "Sedang" },
//!       "then": "Sangat Baik" }
//!   ]
//! }
//! ```
//!
//! Only `rules` drives inference; the header fields are carried for
//! diagnostics. Name matching is case- and space-insensitive, so the file's
//! display spellings (`"Sangat Baik"`) resolve against canonical term names.
//!
//! Loading is fail-soft at the call sites that matter: the bridge treats a
//! missing or unparseable file as an empty rule base and keeps running (the
//! safety override still fires), so `load` errors are surfaced but rarely
//! fatal.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::ConfigResult;
use crate::rules::{Antecedent, Rule};

/// Top-level rule file structure
#[derive(Debug, Clone, Deserialize)]
pub struct RuleFile {
    /// Display name from the file header
    #[serde(default)]
    pub project_name: Option<String>,
    /// Configuration version string
    #[serde(default)]
    pub version: Option<String>,
    /// Declared rule count (informational; the parsed list is authoritative)
    #[serde(default)]
    pub total_rules: Option<u32>,
    /// Declared variable/term vocabularies (informational)
    #[serde(default)]
    pub variables: Option<Vocabulary>,
    /// The rule list itself
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

/// Declared variable vocabularies from the file header
#[derive(Debug, Clone, Deserialize)]
pub struct Vocabulary {
    /// Input variable names to their term names
    #[serde(default)]
    pub inputs: BTreeMap<String, Vec<String>>,
    /// Output variable names to their category names
    #[serde(default)]
    pub outputs: BTreeMap<String, Vec<String>>,
}

/// One rule record: `IF (conjunction) THEN class`
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    /// Identifier for diagnostics
    #[serde(default)]
    pub id: Option<u32>,
    /// Map of variable name to term name; conjunction over all entries
    #[serde(rename = "if")]
    pub conditions: BTreeMap<String, String>,
    /// Output class name
    #[serde(rename = "then")]
    pub consequent: String,
}

impl RuleFile {
    /// Parse a rule file from JSON text
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a rule file from disk
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Convert the parsed entries into engine rules
    ///
    /// Purely structural: name resolution (and skipping of entries that do
    /// not resolve) happens later, at rule-base compile time.
    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
            .into_iter()
            .map(|entry| {
                let antecedents = entry
                    .conditions
                    .iter()
                    .map(|(variable, term)| Antecedent::new(variable, term))
                    .collect();
                let rule = Rule::new(antecedents, &entry.consequent);
                match entry.id {
                    Some(id) => rule.with_id(id),
                    None => rule,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FuzzyEngine;
    use crate::profile;
    use crate::rules::QualityClass;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "project_name": "Smart Compost Monitoring - Simplified",
        "version": "2.0",
        "total_rules": 2,
        "variables": {
            "inputs": { "suhu": ["Dingin", "Ideal", "Panas"] },
            "outputs": { "status_kompos": ["Buruk", "Sedang", "Baik", "Sangat Baik"] }
        },
        "rules": [
            { "id": 1,
              "if": { "bau": "Tidak Bau", "suhu": "Ideal", "ph": "Netral", "kelembapan": "Sedang" },
              "then": "Sangat Baik" },
            { "id": 14,
              "if": { "bau": "Bau Busuk", "suhu": "Ideal", "ph": "Netral", "kelembapan": "Sedang" },
              "then": "Buruk" }
        ]
    }"#;

    #[test]
    fn parses_historical_format() {
        let file = RuleFile::from_json(SAMPLE).unwrap();
        assert_eq!(file.version.as_deref(), Some("2.0"));
        assert_eq!(file.rules.len(), 2);

        let rules = file.into_rules();
        assert_eq!(rules[0].id, Some(1));
        assert_eq!(rules[0].antecedents.len(), 4);
        assert_eq!(QualityClass::parse(&rules[0].consequent), Some(QualityClass::VeryGood));
    }

    #[test]
    fn loaded_rules_compile_against_profile() {
        let rules = RuleFile::from_json(SAMPLE).unwrap().into_rules();
        let engine = FuzzyEngine::new(profile::compost().with_rules(rules)).unwrap();
        assert_eq!(engine.rule_count(), 2);
        assert_eq!(engine.compile_report().skipped().count(), 0);
    }

    #[test]
    fn load_from_disk_roundtrips() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(SAMPLE.as_bytes()).unwrap();

        let file = RuleFile::load(tmp.path()).unwrap();
        assert_eq!(file.rules.len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RuleFile::load("/nonexistent/rules.json").unwrap_err();
        assert!(matches!(err, crate::errors::ConfigError::Io(_)));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = RuleFile::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::errors::ConfigError::Parse(_)));
    }
}
