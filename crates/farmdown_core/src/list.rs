use crate::block::{Node, Span};
use crate::inline::format_inline;

/// Items of consecutive same-kind list lines, not yet emitted.
#[derive(Debug)]
struct ListRun {
    ordered: bool,
    items: Vec<Vec<Span>>,
}

impl ListRun {
    fn into_node(self) -> Node {
        Node::List {
            ordered: self.ordered,
            items: self.items,
        }
    }
}

/// Groups list lines into [`Node::List`] blocks, one open run at a time.
#[derive(Debug, Default)]
pub struct ListAccumulator {
    open: Option<ListRun>,
}

impl ListAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one item. Returns the previous run if its kind differed.
    pub fn push(&mut self, ordered: bool, text: &str) -> Option<Node> {
        let kind_changed = self.open.as_ref().is_some_and(|run| run.ordered != ordered);
        let flushed = if kind_changed { self.flush() } else { None };

        let run = self.open.get_or_insert_with(|| ListRun {
            ordered,
            items: Vec::new(),
        });
        run.items.push(format_inline(text));

        flushed
    }

    /// Close the open run, if any.
    pub fn flush(&mut self) -> Option<Node> {
        self.open.take().map(ListRun::into_node)
    }
}
