//! Report rendering
//!
//! Text output groups lines under their section header. JSON output carries
//! both the flat per-line view and the section tree.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::parser::{LineState, Section, Status};
use crate::validation::ValidationReport;

/// One entry of the flat JSON view
#[derive(Debug, Serialize)]
struct LineRecord<'a> {
    line_number: Option<usize>,
    kind: &'static str,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    valid: bool,
    counts: BTreeMap<Status, usize>,
    lines: Vec<LineRecord<'a>>,
    tree: &'a Section,
}

/// Render the report as pretty-printed JSON
pub fn render_json(report: &ValidationReport) -> serde_json::Result<String> {
    let lines = report
        .lines()
        .into_iter()
        .map(|line| LineRecord {
            line_number: line.line_number(),
            kind: line.kind(),
            status: line.status(),
            text: line_text(line),
            message: line.message(),
        })
        .collect();

    serde_json::to_string_pretty(&JsonReport {
        valid: report.is_valid(),
        counts: report.status_counts(),
        lines,
        tree: &report.root,
    })
}

/// Render the report as human-readable text, one line per line state
pub fn render_text(report: &ValidationReport, source: &str) -> String {
    let mut out = String::new();
    write_children(&mut out, &report.root, 0);

    let errors = report.errors().len();
    let _ = if errors == 0 {
        writeln!(out, "{}: ok ({} lines)", source, report.lines().len())
    } else {
        writeln!(
            out,
            "{}: {} error{}",
            source,
            errors,
            if errors == 1 { "" } else { "s" }
        )
    };
    out
}

fn write_children(out: &mut String, section: &Section, depth: usize) {
    for child in &section.children {
        write_line(out, child, depth);
        if let LineState::Section(nested) = child {
            write_children(out, nested, depth + 1);
        }
    }
}

fn write_line(out: &mut String, line: &LineState, depth: usize) {
    let number = line
        .line_number()
        .map(|n| (n + 1).to_string())
        .unwrap_or_default();
    let status = match line.status() {
        Status::Ok => "ok",
        Status::Info => "info",
        Status::Error => "error",
    };

    let _ = write!(
        out,
        "{:>5}  {:<5}  {}{}",
        number,
        status,
        "  ".repeat(depth),
        line_text(line).unwrap_or_default()
    );
    if let Some(message) = line.message() {
        let _ = write!(out, "  <- {}", message);
    }
    out.push('\n');
}

fn line_text(line: &LineState) -> Option<String> {
    match line {
        LineState::Empty { .. } | LineState::Error { .. } => None,
        LineState::Comment { text, .. } => Some(format!("# {}", text)),
        LineState::Section(section) => Some(format!("[{}]", section.name)),
        LineState::KeyValue { key, value, .. } => Some(format!("{} = {}", key, value)),
    }
}
