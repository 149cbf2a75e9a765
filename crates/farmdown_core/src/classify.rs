use std::sync::OnceLock;

use regex::Regex;

use crate::config::DeepHeadings;

/// What a single source line is, with its marker stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Heading { level: u8, text: &'a str },
    UnorderedItem(&'a str),
    OrderedItem(&'a str),
    Blank,
    Plain(&'a str),
}

impl LineKind<'_> {
    pub fn is_list_item(&self) -> bool {
        matches!(self, LineKind::UnorderedItem(_) | LineKind::OrderedItem(_))
    }
}

fn re_unordered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*]\s+").expect("valid unordered item pattern"))
}

fn re_ordered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.\s+").expect("valid ordered item pattern"))
}

fn re_deep_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#{4,} ").expect("valid deep heading pattern"))
}

const HEADING_MARKERS: [(&str, u8); 3] = [("### ", 3), ("## ", 2), ("# ", 1)];

/// Classify one line (without its trailing newline).
pub fn classify(line: &str, deep_headings: DeepHeadings) -> LineKind<'_> {
    let trimmed = line.trim();

    for (marker, level) in HEADING_MARKERS {
        if let Some(text) = trimmed.strip_prefix(marker) {
            return LineKind::Heading { level, text };
        }
    }

    if deep_headings == DeepHeadings::Clamp {
        if let Some(m) = re_deep_heading().find(trimmed) {
            return LineKind::Heading {
                level: 3,
                text: &trimmed[m.end()..],
            };
        }
    }

    if let Some(m) = re_unordered_item().find(trimmed) {
        return LineKind::UnorderedItem(&trimmed[m.end()..]);
    }

    if let Some(m) = re_ordered_item().find(trimmed) {
        return LineKind::OrderedItem(&trimmed[m.end()..]);
    }

    if trimmed.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Plain(trimmed)
    }
}
