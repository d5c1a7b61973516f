//! Rule Catalog
//!
//! In-memory lookup of every key the validator knows about. Built once per
//! run and only read afterwards.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use super::error::CatalogError;
use super::schema::{Rule, RuleFile};

const BUILTIN_RULES: &str = include_str!("../../resources/rules/editorconfig.rules.toml");

/// A rule together with its compiled, fully anchored value pattern
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: Rule,
    value_regex: Regex,
}

impl CompiledRule {
    fn compile(rule: Rule) -> Result<Self, CatalogError> {
        let value_regex = RegexBuilder::new(&format!("^(?:{})$", rule.value_pattern))
            .case_insensitive(rule.value_case_insensitive)
            .build()
            .map_err(|source| CatalogError::InvalidPattern {
                key: rule.key.clone(),
                pattern: rule.value_pattern.clone(),
                source,
            })?;

        Ok(Self { rule, value_regex })
    }

    /// Check whether the whole of `value` matches the rule's pattern
    pub fn accepts(&self, value: &str) -> bool {
        self.value_regex.is_match(value)
    }
}

/// Known keys, indexed by their lower-cased form
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: HashMap<String, CompiledRule>,
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with the core EditorConfig properties
    pub fn with_builtin_rules() -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        catalog.register_rule_file(BUILTIN_RULES, "built-in rules")?;
        Ok(catalog)
    }

    /// Add rules to the catalog.
    ///
    /// Either every rule is added or none is: a key that collides with an
    /// existing rule (or with another rule in the same batch) rejects the
    /// whole batch.
    pub fn register<I>(&mut self, rules: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = Rule>,
    {
        let mut staged: HashMap<String, CompiledRule> = HashMap::new();

        for rule in rules {
            let normalized = rule.normalized_key();
            if self.rules.contains_key(&normalized) || staged.contains_key(&normalized) {
                return Err(CatalogError::DuplicateKey(rule.key));
            }
            staged.insert(normalized, CompiledRule::compile(rule)?);
        }

        log::debug!("Registered {} rules", staged.len());
        self.rules.extend(staged);
        Ok(())
    }

    /// Parse a TOML rule file and register its rules, returning how many were added
    pub fn register_rule_file(&mut self, content: &str, origin: &str) -> Result<usize, CatalogError> {
        let file: RuleFile = toml::from_str(content).map_err(|source| CatalogError::RuleFile {
            origin: origin.to_string(),
            source,
        })?;
        let count = file.rules.len();
        self.register(file.rules)?;
        Ok(count)
    }

    /// Find the single rule whose key matches `key`
    pub fn lookup(&self, key: &str) -> Option<&CompiledRule> {
        self.rules
            .get(&key.to_lowercase())
            .filter(|compiled| compiled.rule.matches_key(key))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules() {
        let catalog = RuleCatalog::with_builtin_rules().unwrap();
        assert_eq!(catalog.len(), 7);

        for key in [
            "indent_style",
            "indent_size",
            "tab_width",
            "end_of_line",
            "charset",
            "trim_trailing_whitespace",
            "insert_final_newline",
        ] {
            assert!(catalog.lookup(key).is_some(), "missing built-in rule {key}");
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = RuleCatalog::with_builtin_rules().unwrap();
        let rule = catalog.lookup("INDENT_STYLE").expect("indent_style rule");
        assert_eq!(rule.rule.key, "indent_style");
        assert!(catalog.lookup("indent").is_none());
    }

    #[test]
    fn test_value_pattern_is_anchored() {
        let catalog = RuleCatalog::with_builtin_rules().unwrap();
        let rule = catalog.lookup("indent_style").unwrap();

        assert!(rule.accepts("space"));
        assert!(rule.accepts("TAB"));
        assert!(!rule.accepts("tabs"));
        assert!(!rule.accepts("xspace"));

        let size = catalog.lookup("indent_size").unwrap();
        assert!(size.accepts("4"));
        assert!(size.accepts("tab"));
        assert!(!size.accepts("0"));
    }

    #[test]
    fn test_case_sensitive_value() {
        let mut rule = Rule::new("answer", "(yes|no)");
        rule.value_case_insensitive = false;

        let mut catalog = RuleCatalog::new();
        catalog.register([rule]).unwrap();

        let compiled = catalog.lookup("answer").unwrap();
        assert!(compiled.accepts("yes"));
        assert!(!compiled.accepts("YES"));
    }

    #[test]
    fn test_case_sensitive_key() {
        let mut rule = Rule::new("MixedCase", ".*");
        rule.key_case_insensitive = false;

        let mut catalog = RuleCatalog::new();
        catalog.register([rule]).unwrap();

        assert!(catalog.lookup("MixedCase").is_some());
        assert!(catalog.lookup("mixedcase").is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut catalog = RuleCatalog::with_builtin_rules().unwrap();
        let err = catalog
            .register([Rule::new("custom_key", ".*"), Rule::new("Indent_Style", ".*")])
            .unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateKey(ref key) if key == "Indent_Style"));
        // Nothing from the rejected batch was kept
        assert!(catalog.lookup("custom_key").is_none());
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn test_duplicate_within_batch_rejected() {
        let mut catalog = RuleCatalog::new();
        let err = catalog
            .register([Rule::new("a_key", ".*"), Rule::new("A_KEY", ".*")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey(_)));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut catalog = RuleCatalog::new();
        let err = catalog.register([Rule::new("broken", "(unclosed")]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPattern { ref key, .. } if key == "broken"));
    }

    #[test]
    fn test_register_rule_file() {
        let mut catalog = RuleCatalog::new();
        let added = catalog
            .register_rule_file(
                r#"
                [[rules]]
                key = "max_line_length"
                value_pattern = "([1-9][0-9]*|off)"
                description = "Hard wrap column"
                "#,
                "test",
            )
            .unwrap();

        assert_eq!(added, 1);
        let rule = catalog.lookup("max_line_length").unwrap();
        assert!(rule.accepts("120"));
        assert!(rule.accepts("off"));
        assert_eq!(rule.rule.description.as_deref(), Some("Hard wrap column"));
    }

    #[test]
    fn test_malformed_rule_file() {
        let mut catalog = RuleCatalog::new();
        let err = catalog.register_rule_file("[[rules]]\nkey = 3", "broken.toml").unwrap_err();
        assert!(matches!(err, CatalogError::RuleFile { ref origin, .. } if origin == "broken.toml"));
    }
}
