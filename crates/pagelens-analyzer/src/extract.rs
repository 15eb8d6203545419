//! Fact extractors for title, document version, and heading counts.
//!
//! Each extractor consumes one token at a time, mutates the shared
//! aggregate through its single write path when it learns something new,
//! and hands back a snapshot for emission. Extractors whose fact is
//! already determined become no-ops.

use crate::report::{PageSnapshot, ScanState};
use crate::token::Token;

/// The six tag names counted as headings.
const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Case-insensitive substring check, used for doctype classification and
/// host comparison.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Captures the first non-blank text between `<title>` and `</title>`.
#[derive(Debug, Default)]
pub struct TitleExtractor {
    capturing: bool,
}

impl TitleExtractor {
    /// Feed one token; returns a snapshot when the title is assigned.
    pub fn observe(&mut self, token: &Token, state: &ScanState) -> Option<PageSnapshot> {
        if state.has_title() {
            return None;
        }
        match token {
            Token::StartTag(tag) | Token::SelfClosingTag(tag) if tag.name == "title" => {
                self.capturing = true;
            }
            Token::EndTag(tag) if tag.name == "title" => {
                self.capturing = false;
            }
            Token::Text(text) if self.capturing => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    state.with_core(|core| core.title = Some(trimmed.to_string()));
                    return Some(state.snapshot());
                }
            }
            _ => {}
        }
        None
    }
}

/// Classifies the doctype declaration, at most once per scan.
#[derive(Debug, Default)]
pub struct VersionExtractor;

impl VersionExtractor {
    /// Feed one token; returns a snapshot when the version is assigned.
    pub fn observe(&self, token: &Token, state: &ScanState) -> Option<PageSnapshot> {
        if state.has_version() {
            return None;
        }
        let Token::Doctype(doctype) = token else {
            return None;
        };
        let version = classify_doctype(doctype);
        state.with_core(|core| core.version = Some(version));
        Some(state.snapshot())
    }
}

/// Map a flattened doctype string onto a version label.
///
/// Total and deterministic: anything unrecognized is kept verbatim.
pub(crate) fn classify_doctype(doctype: &str) -> String {
    if doctype == "html" {
        "HTML5".to_string()
    } else if contains_ignore_case(doctype, "xhtml") {
        "XHTML".to_string()
    } else if contains_ignore_case(doctype, "html 4.01") {
        "HTML 4.01".to_string()
    } else {
        doctype.to_string()
    }
}

/// Counts `h1`..`h6` occurrences.
#[derive(Debug, Default)]
pub struct HeadingCounter;

impl HeadingCounter {
    /// Feed one token; returns a snapshot after every increment.
    pub fn observe(&self, token: &Token, state: &ScanState) -> Option<PageSnapshot> {
        let (Token::StartTag(tag) | Token::SelfClosingTag(tag)) = token else {
            return None;
        };
        if !HEADING_TAGS.contains(&tag.name.as_str()) {
            return None;
        }
        state.with_core(|core| {
            *core.headings.entry(tag.name.clone()).or_insert(0) += 1;
        });
        Some(state.snapshot())
    }
}
