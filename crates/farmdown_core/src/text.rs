use crate::block::{Node, spans_text};

/// Convert nodes to plain text, one line per heading, paragraph or item.
pub fn nodes_to_text(nodes: &[Node]) -> String {
    let mut out = String::new();

    for node in nodes {
        match node {
            Node::Heading { spans, .. } | Node::Paragraph { spans } => {
                out.push_str(&spans_text(spans));
                out.push('\n');
            }
            Node::List { ordered, items } => {
                for (i, item) in items.iter().enumerate() {
                    if *ordered {
                        out.push_str(&format!("{}. ", i + 1));
                    } else {
                        out.push_str("- ");
                    }
                    out.push_str(&spans_text(item));
                    out.push('\n');
                }
            }
            Node::Break => out.push('\n'),
        }
    }

    out
}
