//! Validation Engine
//!
//! Drives the line classifier across a whole document and groups the
//! results into a section tree.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::parser::{classify_line, LineContext, LineState, Section, Status};
use crate::rules::RuleCatalog;

/// Every line of a document, grouped under the section that owns it.
///
/// The tree is the only storage; [`ValidationReport::lines`] derives the
/// flat document-order view from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub root: Section,
}

impl ValidationReport {
    /// All line states in document order (depth-first, header before children).
    /// The synthetic root section is not included.
    pub fn lines(&self) -> Vec<&LineState> {
        let mut lines = Vec::new();
        flatten_into(&self.root, &mut lines);
        lines
    }

    /// Explicit `[section]` headers in document order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.root.children.iter().filter_map(|child| match child {
            LineState::Section(section) => Some(section),
            _ => None,
        })
    }

    /// Line states with Error status, in document order
    pub fn errors(&self) -> Vec<&LineState> {
        self.lines().into_iter().filter(|l| l.is_error()).collect()
    }

    /// A document is valid when no line has Error status
    pub fn is_valid(&self) -> bool {
        self.root.worst_status() < Status::Error
    }

    /// Number of lines per status
    pub fn status_counts(&self) -> BTreeMap<Status, usize> {
        let mut counts = BTreeMap::new();
        for line in self.lines() {
            *counts.entry(line.status()).or_insert(0) += 1;
        }
        counts
    }
}

fn flatten_into<'a>(section: &'a Section, out: &mut Vec<&'a LineState>) {
    for child in &section.children {
        out.push(child);
        if let LineState::Section(nested) = child {
            flatten_into(nested, out);
        }
    }
}

/// Validate an entire document.
///
/// Lines are split with [`str::lines`]: `\n` and `\r\n` both end a line and a
/// trailing terminator does not produce an extra empty line.
pub fn validate_document(content: &str, catalog: &RuleCatalog) -> ValidationReport {
    let mut root = Section::root();
    let mut current: Option<Section> = None;

    for (line_number, line) in content.lines().enumerate() {
        let context = LineContext {
            line_number,
            in_root_section: current.is_none(),
        };

        match classify_line(line, context, catalog) {
            LineState::Section(section) => {
                if let Some(finished) = current.replace(section) {
                    root.children.push(LineState::Section(finished));
                }
            }
            other => match current.as_mut() {
                Some(section) => section.children.push(other),
                None => root.children.push(other),
            },
        }
    }

    if let Some(finished) = current {
        root.children.push(LineState::Section(finished));
    }

    let report = ValidationReport { root };
    if log::log_enabled!(log::Level::Debug) {
        let lines = report.lines();
        let errors = lines.iter().filter(|l| l.is_error()).count();
        log::debug!("Validated {} lines, {} errors", lines.len(), errors);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RuleCatalog {
        RuleCatalog::with_builtin_rules().unwrap()
    }

    #[test]
    fn test_empty_document() {
        let report = validate_document("", &catalog());
        assert!(report.lines().is_empty());
        assert!(report.root.is_root());
        assert!(report.is_valid());
    }

    #[test]
    fn test_lines_before_first_section_belong_to_root() {
        let content = "root = true\n\n[*]\nindent_style = space\n";
        let report = validate_document(content, &catalog());

        assert_eq!(report.root.children.len(), 3);
        assert!(matches!(report.root.children[0], LineState::KeyValue { .. }));
        assert!(matches!(report.root.children[1], LineState::Empty { .. }));

        let sections: Vec<_> = report.sections().collect();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "*");
        assert_eq!(sections[0].children.len(), 1);
    }

    #[test]
    fn test_flat_view_in_document_order() {
        let content = "# top\n[a]\nx = 1\n[b]\n\ny = 2";
        let report = validate_document(content, &catalog());
        let numbers: Vec<_> = report.lines().iter().map(|l| l.line_number()).collect();

        assert_eq!(numbers, (0..6).map(Some).collect::<Vec<_>>());
    }

    #[test]
    fn test_crlf_and_lf_split_the_same() {
        let lf = validate_document("[a]\ncharset = utf-8\n", &catalog());
        let crlf = validate_document("[a]\r\ncharset = utf-8\r\n", &catalog());
        assert_eq!(lf, crlf);
        assert_eq!(lf.lines().len(), 2);
    }

    #[test]
    fn test_status_counts() {
        let content = "root = true\n[*]\nbogus\nindent_size = 4";
        let report = validate_document(content, &catalog());
        let counts = report.status_counts();

        assert_eq!(counts.get(&Status::Ok), Some(&3));
        assert_eq!(counts.get(&Status::Error), Some(&1));
        assert!(!report.is_valid());
    }
}
