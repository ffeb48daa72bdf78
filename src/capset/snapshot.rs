//! Normalized, serializable snapshots of a parsed tree
//!
//! A snapshot is a plain recursive value suitable for serialization to any
//! output format (JSON, YAML, indented text) without the consumer having
//! to know about the arena. Used by the CLI and handy in tests.

use serde::{Deserialize, Serialize};

use crate::capset::node::{NodeId, NodeTree};

/// A snapshot of one node and its subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Node kind (`brace`, `brace.open`, `text`, ...)
    pub kind: String,
    /// Literal matched text (empty for containers)
    pub value: String,
    /// Byte range in the source
    pub span: (usize, usize),
    /// Whether the node was consumed as a literal rather than a delimiter
    pub escaped: bool,
    /// Child snapshots in document order
    pub children: Vec<NodeSnapshot>,
}

/// Snapshot the whole tree from its root
pub fn snapshot(tree: &NodeTree) -> NodeSnapshot {
    snapshot_node(tree, tree.root())
}

/// Snapshot the subtree rooted at `id`
pub fn snapshot_node(tree: &NodeTree, id: NodeId) -> NodeSnapshot {
    let node = tree.node(id);
    NodeSnapshot {
        kind: node.kind.clone(),
        value: node.value.clone(),
        span: (node.span.start, node.span.end),
        escaped: node.escaped,
        children: tree
            .children(id)
            .iter()
            .map(|child| snapshot_node(tree, *child))
            .collect(),
    }
}

/// Render the tree as indented text, one node per line
///
/// ```text
/// root
///   brace [0..6] escaped
///     brace.open '{' [0..1]
/// ```
pub fn render_text(tree: &NodeTree) -> String {
    let mut out = String::new();
    render_node(tree, tree.root(), 0, &mut out);
    out
}

fn render_node(tree: &NodeTree, id: NodeId, depth: usize, out: &mut String) {
    let node = tree.node(id);
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(&node.kind);
    if !node.value.is_empty() {
        out.push_str(&format!(" '{}'", node.value));
    }
    if node.span != (0..0) {
        out.push_str(&format!(" [{}..{}]", node.span.start, node.span.end));
    }
    if node.escaped {
        out.push_str(" escaped");
    }
    out.push('\n');
    for child in tree.children(id) {
        render_node(tree, *child, depth + 1, out);
    }
}
