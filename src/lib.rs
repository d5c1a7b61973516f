//! EditorConfig Validator
//!
//! Line-by-line validation of `.editorconfig` files.
//!
//! This library provides:
//! - Line classification into typed line states
//! - Section-tree document validation
//! - A rule catalog of built-in, custom and analyzer-diagnostic keys
//! - A cached loader for the remote analyzer rule document

pub mod cli;
pub mod config;
pub mod output;
pub mod parser;
pub mod rules;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use parser::{classify_line, LineContext, LineState, Section, Status};
pub use rules::{Rule, RuleCatalog, RuleSource};
pub use validation::{validate_document, ValidationReport};
