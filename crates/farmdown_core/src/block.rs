use serde::{Deserialize, Serialize};

/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Bold(String),
}

impl Span {
    /// The span's characters without any formatting markers.
    pub fn as_str(&self) -> &str {
        match self {
            Span::Text(text) | Span::Bold(text) => text,
        }
    }
}

/// Block-level nodes produced by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Heading {
        level: u8,
        spans: Vec<Span>,
    },
    Paragraph {
        spans: Vec<Span>,
    },
    List {
        ordered: bool,
        items: Vec<Vec<Span>>,
    },
    /// Spacer standing in for a run of blank lines
    Break,
}

impl Node {
    pub fn is_break(&self) -> bool {
        matches!(self, Node::Break)
    }
}

/// Concatenated characters of a span sequence, markers stripped.
pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(Span::as_str).collect()
}
