//! Arena-backed node tree
//!
//! Nodes live in a flat arena owned by `NodeTree` and refer to each other
//! by `NodeId`. The `children` list of a node is the owning edge (document
//! order); `parent` is a plain back-reference id, never a second owning
//! edge, so the tree cannot form reference cycles.
//!
//! Node kinds follow the `<type>` / `<type>.open` / `<type>.close` naming
//! convention used by the capture handlers; any other kind is fair game
//! for host-registered token handlers (e.g. `text`).

use std::ops::Range;

use crate::capset::matcher::MatchInfo;

/// Identifies a node within its `NodeTree` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The arena slot index
    pub fn index(self) -> usize {
        self.0
    }
}

/// A labeled tree element: a container, a delimiter marker, or a plain token
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Discriminator: `<type>`, `<type>.open`, `<type>.close`, or a host kind
    pub kind: String,
    /// Literal matched text (empty for containers)
    pub value: String,
    /// Byte range in the source
    pub span: Range<usize>,
    /// Raw match result from the pattern that produced this node
    pub match_info: Option<MatchInfo>,
    /// Set when a close was consumed as a literal rather than a delimiter
    pub escaped: bool,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    /// Create a container node of the given kind with no children
    pub fn container(kind: &str, span: Range<usize>) -> Self {
        Node {
            kind: kind.to_string(),
            value: String::new(),
            span,
            match_info: None,
            escaped: false,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Create a marker node (`<type>.open` / `<type>.close`) from a match
    pub fn marker(kind: String, info: MatchInfo, span: Range<usize>) -> Self {
        Node {
            kind,
            value: info.text.clone(),
            span,
            match_info: Some(info),
            escaped: false,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Create a plain token node (host handlers, e.g. `text`)
    pub fn token(kind: &str, value: &str, span: Range<usize>) -> Self {
        Node {
            kind: kind.to_string(),
            value: value.to_string(),
            span,
            match_info: None,
            escaped: false,
            children: Vec::new(),
            parent: None,
        }
    }
}

/// The arena holding all nodes produced by one parse session
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl NodeTree {
    /// Create a tree with a fresh `root` container
    pub fn new() -> Self {
        let root = Node::container("root", 0..0);
        NodeTree {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The root container id
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add a detached node to the arena, returning its id
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutably borrow a node
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Append `child` to `parent`'s children and set the back-reference
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Children of a node, in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Parent of a node, `None` for the root and detached nodes
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Kind of a node
    pub fn kind(&self, id: NodeId) -> &str {
        &self.nodes[id.0].kind
    }

    /// Number of nodes in the arena (including the root)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Depth-first pre-order walk from `id`, including `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            for child in self.children(next).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Count nodes of a given kind anywhere under `id` (inclusive)
    pub fn count_kind(&self, id: NodeId, kind: &str) -> usize {
        self.descendants(id)
            .iter()
            .filter(|n| self.kind(**n) == kind)
            .count()
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}
