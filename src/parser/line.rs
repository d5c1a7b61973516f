//! Line States
//!
//! The classification outcome for a single line, and the section tree those
//! outcomes are grouped into. Pure data, no classification logic.

use serde::Serialize;

/// Severity of a line's classification, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Info,
    Error,
}

/// A section header and every non-section line that follows it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// `None` for the synthetic root section that precedes the first header
    pub line_number: Option<usize>,
    pub status: Status,
    pub name: String,
    pub children: Vec<LineState>,
}

impl Section {
    /// The implicit section owning every line before the first `[header]`
    pub fn root() -> Self {
        Self {
            line_number: None,
            status: Status::Ok,
            name: String::new(),
            children: Vec::new(),
        }
    }

    pub fn new(line_number: usize, name: impl Into<String>) -> Self {
        Self {
            line_number: Some(line_number),
            status: Status::Ok,
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.line_number.is_none()
    }

    /// Worst status of the header and everything nested under it
    pub fn worst_status(&self) -> Status {
        self.children
            .iter()
            .map(|child| match child {
                LineState::Section(section) => section.worst_status(),
                other => other.status(),
            })
            .fold(self.status, Status::max)
    }
}

/// Classification of one line of an EditorConfig document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineState {
    /// Blank or whitespace-only line
    Empty { line_number: usize },
    /// Dedicated `#` or `;` comment line; text has the marker stripped
    Comment { line_number: usize, text: String },
    /// `[name]` header
    Section(Section),
    /// `key = value` property, with a message when it fails a rule
    KeyValue {
        line_number: usize,
        key: String,
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        status: Status,
    },
    /// Line that could not be read as any of the above
    Error {
        line_number: usize,
        message: String,
        status: Status,
    },
}

impl LineState {
    pub fn error(line_number: usize, message: impl Into<String>) -> Self {
        LineState::Error {
            line_number,
            message: message.into(),
            status: Status::Error,
        }
    }

    pub fn line_number(&self) -> Option<usize> {
        match self {
            LineState::Empty { line_number }
            | LineState::Comment { line_number, .. }
            | LineState::KeyValue { line_number, .. }
            | LineState::Error { line_number, .. } => Some(*line_number),
            LineState::Section(section) => section.line_number,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            LineState::Empty { .. } | LineState::Comment { .. } => Status::Ok,
            LineState::Section(section) => section.status,
            LineState::KeyValue { status, .. } | LineState::Error { status, .. } => *status,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LineState::KeyValue { message, .. } => message.as_deref(),
            LineState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Short lowercase name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            LineState::Empty { .. } => "empty",
            LineState::Comment { .. } => "comment",
            LineState::Section(_) => "section",
            LineState::KeyValue { .. } => "key_value",
            LineState::Error { .. } => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        self.status() == Status::Error
    }
}
