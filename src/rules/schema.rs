//! Rule Schema Types
//!
//! Rule definitions as written in TOML rule files, plus the analyzer report
//! shapes the remote rule document and the rule cache are made of.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values accepted by every `dotnet_diagnostic.<id>.severity` key
pub const ANALYZER_SEVERITY_PATTERN: &str = "(none|silent|suggestion|warning|error|default)";

/// A known key, the pattern its value must match, and descriptive metadata
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Rule {
    pub key: String,
    pub value_pattern: String,
    pub name: Option<String>,
    pub default_value: Option<String>,
    pub description: Option<String>,
    pub documentation_url: Option<String>,
    #[serde(default = "default_true")]
    pub key_case_insensitive: bool,
    #[serde(default = "default_true")]
    pub value_case_insensitive: bool,
}

fn default_true() -> bool {
    true
}

impl Rule {
    /// Create a rule with no metadata, compared case-insensitively
    pub fn new(key: impl Into<String>, value_pattern: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value_pattern: value_pattern.into(),
            name: None,
            default_value: None,
            description: None,
            documentation_url: None,
            key_case_insensitive: true,
            value_case_insensitive: true,
        }
    }

    /// Key used for uniqueness checks in the catalog
    pub fn normalized_key(&self) -> String {
        self.key.to_lowercase()
    }

    /// Check whether `key` names this rule, honoring the key comparison mode
    pub fn matches_key(&self, key: &str) -> bool {
        if self.key_case_insensitive {
            self.key.to_lowercase() == key.to_lowercase()
        } else {
            self.key == key
        }
    }
}

/// Root of a TOML rule file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleFile {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Remote analyzer rule document (SARIF-style)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalyzerReport {
    pub runs: Vec<AnalyzerRun>,
}

/// One tool run inside an analyzer report
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalyzerRun {
    #[serde(default)]
    pub rules: BTreeMap<String, AnalyzerRule>,
}

/// A single analyzer diagnostic as published in the rule document.
///
/// This is also the record shape of the on-disk rule cache.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerRule {
    pub id: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub full_description: Option<String>,
    #[serde(default)]
    pub default_level: Option<String>,
    #[serde(default)]
    pub help_uri: Option<String>,
    #[serde(default)]
    pub properties: AnalyzerProperties,
}

/// Analyzer metadata carried alongside each diagnostic
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerProperties {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_enabled_by_default: bool,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AnalyzerRule {
    /// The `.editorconfig` key that configures this diagnostic's severity
    pub fn severity_key(&self) -> String {
        format!("dotnet_diagnostic.{}.severity", self.id)
    }
}

impl From<&AnalyzerRule> for Rule {
    fn from(record: &AnalyzerRule) -> Self {
        let name = Some(record.short_description.clone()).filter(|s| !s.is_empty());
        let description = record
            .full_description
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| name.clone());

        Self {
            key: record.severity_key(),
            value_pattern: ANALYZER_SEVERITY_PATTERN.to_string(),
            name,
            default_value: record.default_level.clone(),
            description,
            documentation_url: record.help_uri.clone(),
            key_case_insensitive: true,
            value_case_insensitive: true,
        }
    }
}

impl AnalyzerReport {
    /// Flatten every run's rule mapping into one list.
    ///
    /// An id seen in more than one run keeps its first record; the later
    /// record only contributes languages the first one did not list.
    pub fn into_records(self) -> Vec<AnalyzerRule> {
        let mut records: Vec<AnalyzerRule> = Vec::new();
        let mut index: BTreeMap<String, usize> = BTreeMap::new();

        for run in self.runs {
            for (id, mut record) in run.rules {
                if record.id.is_empty() {
                    record.id = id;
                }
                match index.get(&record.id) {
                    Some(&pos) => {
                        log::debug!("Analyzer rule {} appears in several runs", record.id);
                        let existing = &mut records[pos].properties.languages;
                        for language in record.properties.languages {
                            if !existing.contains(&language) {
                                existing.push(language);
                            }
                        }
                    }
                    None => {
                        index.insert(record.id.clone(), records.len());
                        records.push(record);
                    }
                }
            }
        }

        records
    }
}
