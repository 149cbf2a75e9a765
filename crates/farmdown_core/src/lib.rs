mod block;
mod classify;
mod config;
mod html;
mod inline;
mod list;
mod parser;
mod text;

use std::sync::OnceLock;

pub mod api;
pub mod proxy;
pub mod session;
pub mod transport;

pub use block::{Node, Span, spans_text};
pub use classify::{LineKind, classify};
pub use config::{ApiConfig, Config, ConfigError, DeepHeadings, RenderConfig, SessionConfig};
pub use inline::format_inline;

/// Parse markdown text into a vector of nodes using the default config.
pub fn parse(markdown: &str) -> Vec<Node> {
    parse_with_config(markdown, default_render_config())
}

/// The bundled render settings, decoded on first use.
fn default_render_config() -> &'static RenderConfig {
    static RENDER: OnceLock<RenderConfig> = OnceLock::new();
    RENDER.get_or_init(|| Config::compiled_default().render)
}

/// Parse markdown text into a vector of nodes.
pub fn parse_with_config(markdown: &str, config: &RenderConfig) -> Vec<Node> {
    parser::parse(markdown, config)
}

/// Convert markdown to an HTML fragment using default config.
pub fn markdown_to_html(markdown: &str) -> String {
    html::nodes_to_html(&parse(markdown))
}

/// Convert nodes to an HTML fragment.
pub fn nodes_to_html(nodes: &[Node]) -> String {
    html::nodes_to_html(nodes)
}

/// Convert markdown to plain text using default config.
pub fn markdown_to_text(markdown: &str) -> String {
    text::nodes_to_text(&parse(markdown))
}

/// Convert nodes to plain text.
pub fn nodes_to_text(nodes: &[Node]) -> String {
    text::nodes_to_text(nodes)
}
