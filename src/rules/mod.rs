//! Rule System
//!
//! Known keys and how to obtain them: built-in EditorConfig properties,
//! custom TOML rule files, and the cached analyzer-diagnostic rule set.

pub mod catalog;
pub mod error;
pub mod schema;
pub mod source;

pub use catalog::{CompiledRule, RuleCatalog};
pub use error::{CatalogError, RuleSourceError};
pub use schema::{AnalyzerReport, AnalyzerRule, Rule};
pub use source::{CurlFetcher, RuleFetcher, RuleSource, CACHE_FILE_NAME, DEFAULT_RULES_URL};
