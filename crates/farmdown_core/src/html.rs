use crate::block::{Node, Span};

/// Convert nodes to an HTML fragment
pub fn nodes_to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        emit_node(node, &mut out);
    }
    out
}

fn emit_node(node: &Node, out: &mut String) {
    match node {
        Node::Heading { level, spans } => {
            let level = (*level).clamp(1, 3);
            out.push_str(&format!("<h{level}>"));
            spans_to_html(spans, out);
            out.push_str(&format!("</h{level}>\n"));
        }
        Node::Paragraph { spans } => {
            out.push_str("<p>");
            spans_to_html(spans, out);
            out.push_str("</p>\n");
        }
        Node::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            out.push_str(&format!("<{tag}>\n"));
            for item in items {
                out.push_str("  <li>");
                spans_to_html(item, out);
                out.push_str("</li>\n");
            }
            out.push_str(&format!("</{tag}>\n"));
        }
        Node::Break => {
            out.push_str("<br>\n");
        }
    }
}

fn spans_to_html(spans: &[Span], out: &mut String) {
    for span in spans {
        match span {
            Span::Text(text) => escape_into(text, out),
            Span::Bold(text) => {
                out.push_str("<strong>");
                escape_into(text, out);
                out.push_str("</strong>");
            }
        }
    }
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
