use crate::block::Node;
use crate::classify::{LineKind, classify};
use crate::config::{DeepHeadings, RenderConfig};
use crate::inline::format_inline;
use crate::list::ListAccumulator;

/// Parse loosely formatted markdown text into a list of nodes
pub fn parse(text: &str, config: &RenderConfig) -> Vec<Node> {
    let mut nodes = Vec::new();
    if text.is_empty() {
        return nodes;
    }

    let mut state = ParseState::new(config.deep_headings);

    for line in text.split('\n') {
        let kind = classify(line, state.deep_headings);
        process_line(kind, &mut state, &mut nodes);
    }

    if let Some(list) = state.lists.flush() {
        nodes.push(list);
    }

    tracing::debug!(
        lines = state.lines,
        nodes = nodes.len(),
        "rendered markdown"
    );

    nodes
}

struct ParseState {
    deep_headings: DeepHeadings,
    lists: ListAccumulator,
    lines: usize,
}

impl ParseState {
    fn new(deep_headings: DeepHeadings) -> Self {
        Self {
            deep_headings,
            lists: ListAccumulator::new(),
            lines: 0,
        }
    }
}

fn process_line(kind: LineKind<'_>, state: &mut ParseState, nodes: &mut Vec<Node>) {
    state.lines += 1;

    // List lines extend or switch the open run
    match kind {
        LineKind::UnorderedItem(text) => {
            nodes.extend(state.lists.push(false, text));
            return;
        }
        LineKind::OrderedItem(text) => {
            nodes.extend(state.lists.push(true, text));
            return;
        }
        _ => {}
    }

    // Anything else ends the open run first
    nodes.extend(state.lists.flush());

    match kind {
        LineKind::Heading { level, text } => {
            nodes.push(Node::Heading {
                level,
                spans: format_inline(text),
            });
        }
        LineKind::Plain(text) => {
            nodes.push(Node::Paragraph {
                spans: format_inline(text),
            });
        }
        LineKind::Blank => {
            // Leading blanks are dropped and runs of blanks collapse
            if nodes.last().is_some_and(|last| !last.is_break()) {
                nodes.push(Node::Break);
            }
        }
        LineKind::UnorderedItem(_) | LineKind::OrderedItem(_) => {}
    }
}
