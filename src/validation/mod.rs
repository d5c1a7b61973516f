//! Document Validation
//!
//! Whole-document validation on top of the line parser.

pub mod engine;

pub use engine::{validate_document, ValidationReport};
