//! EditorConfig Line Parser
//!
//! Line-by-line classification of EditorConfig text into typed line states.
//! No document-level state lives here beyond what [`LineContext`] carries.

pub mod classifier;
pub mod line;

pub use classifier::{classify_line, LineContext};
pub use line::{LineState, Section, Status};
