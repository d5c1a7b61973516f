//! Line Classifier
//!
//! Turns one raw line into exactly one [`LineState`]. The checks run in a
//! fixed order and the first one that applies wins, since several of them
//! overlap (a trailing comment on a header is still a header-shaped line).

use crate::parser::line::{LineState, Section, Status};
use crate::rules::RuleCatalog;

pub const MSG_DOUBLE_BACKSLASH: &str = "Double Slashes are not allowed";
pub const MSG_TRAILING_COMMENT: &str = "Comments are only permitted on dedicated lines";
pub const MSG_INVALID_FORMAT: &str = "INVALID FORMAT";
pub const MSG_ROOT_PLACEMENT: &str = "'root' must be in root section.";

const COMMENT_MARKERS: [char; 2] = ['#', ';'];

/// Parsing state a line is classified in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext {
    /// 0-based position of the line in the document
    pub line_number: usize,
    /// No `[section]` header has been seen yet
    pub in_root_section: bool,
}

/// Classify a single line
pub fn classify_line(line: &str, context: LineContext, catalog: &RuleCatalog) -> LineState {
    let line_number = context.line_number;
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return LineState::Empty { line_number };
    }

    if trimmed.starts_with(COMMENT_MARKERS) {
        let text = trimmed.trim_start_matches(COMMENT_MARKERS).trim_start();
        return LineState::Comment {
            line_number,
            text: text.to_string(),
        };
    }

    if line.contains("\\\\") {
        return LineState::error(line_number, MSG_DOUBLE_BACKSLASH);
    }

    // The line does not start with a marker (checked above), so any marker
    // left in it trails some other content.
    if line.contains(COMMENT_MARKERS) {
        return LineState::error(line_number, MSG_TRAILING_COMMENT);
    }

    if let Some(name) = section_name(trimmed) {
        return LineState::Section(Section::new(line_number, name));
    }

    match split_key_value(line) {
        Some((key, value)) => classify_key_value(key, value, context, catalog),
        None => LineState::error(line_number, MSG_INVALID_FORMAT),
    }
}

/// Inner text of a `[name]` header, if the trimmed line is one
fn section_name(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix('[')?
        .strip_suffix(']')
        .filter(|name| !name.is_empty())
}

/// Split `key = value` on its only `=`, trimming both sides.
///
/// The key must be non-blank. The value only needs at least one character
/// after the `=`, so `key = ` yields an empty value that the rule check
/// then rejects.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    if value.contains('=') || value.is_empty() {
        return None;
    }

    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key, value.trim()))
}

fn classify_key_value(
    key: &str,
    value: &str,
    context: LineContext,
    catalog: &RuleCatalog,
) -> LineState {
    let message = if key.eq_ignore_ascii_case("root") {
        check_root(value, context)
    } else {
        check_rule(key, value, catalog)
    };

    let status = if message.is_some() {
        Status::Error
    } else {
        Status::Ok
    };

    LineState::KeyValue {
        line_number: context.line_number,
        key: key.to_string(),
        value: value.to_string(),
        message,
        status,
    }
}

fn check_root(value: &str, context: LineContext) -> Option<String> {
    if !context.in_root_section {
        return Some(MSG_ROOT_PLACEMENT.to_string());
    }

    match value {
        "true" | "false" => None,
        _ => Some(format!(
            "Invalid value '{}' for key 'root'. Must be 'true' or 'false'",
            value
        )),
    }
}

fn check_rule(key: &str, value: &str, catalog: &RuleCatalog) -> Option<String> {
    match catalog.lookup(key) {
        Some(compiled) if compiled.accepts(value) => None,
        Some(compiled) => Some(format!(
            "Invalid value '{}' for key '{}'. Expected '{}'",
            value, key, compiled.rule.value_pattern
        )),
        None => Some(format!("Unknown key '{}'", key)),
    }
}
