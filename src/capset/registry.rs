//! Capture Registry: per-delimiter-kind stacks of open containers
//!
//! Each registered delimiter kind gets its own LIFO stack. A container sits
//! on its kind's stack from the moment its open handler fires until a
//! matching close pops it, or until the parse ends with the pair left
//! unterminated. Stacks are created lazily on first use and are scoped to
//! one parse session.
//!
//! `pop` on an empty stack returns `None`; `peek` reads the innermost
//! entry without removing it.

use std::collections::HashMap;

use crate::capset::node::NodeId;

/// Per-kind stacks of currently-open container nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureSets {
    sets: HashMap<String, Vec<NodeId>>,
}

impl CaptureSets {
    /// Create an empty registry
    pub fn new() -> Self {
        CaptureSets {
            sets: HashMap::new(),
        }
    }

    /// Return the stack for `kind`, creating it if absent
    pub fn ensure(&mut self, kind: &str) -> &mut Vec<NodeId> {
        self.sets.entry(kind.to_string()).or_default()
    }

    /// Whether a stack exists for `kind` (even if currently empty)
    pub fn contains(&self, kind: &str) -> bool {
        self.sets.contains_key(kind)
    }

    /// Push an open container onto its kind's stack
    pub fn push(&mut self, kind: &str, id: NodeId) {
        self.ensure(kind).push(id);
    }

    /// Pop the innermost open container for `kind`, `None` when empty
    pub fn pop(&mut self, kind: &str) -> Option<NodeId> {
        self.ensure(kind).pop()
    }

    /// The innermost open container for `kind`, left on its stack
    pub fn peek(&self, kind: &str) -> Option<NodeId> {
        self.sets.get(kind).and_then(|stack| stack.last()).copied()
    }

    /// Current nesting depth for `kind`
    pub fn depth(&self, kind: &str) -> usize {
        self.sets.get(kind).map_or(0, Vec::len)
    }

    /// Kinds with at least one container still open, with their stacks
    pub fn open_kinds(&self) -> Vec<(&str, &[NodeId])> {
        let mut kinds: Vec<_> = self
            .sets
            .iter()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(kind, stack)| (kind.as_str(), stack.as_slice()))
            .collect();
        kinds.sort_by_key(|(kind, _)| *kind);
        kinds
    }

    /// Drop all stacks (start of a new session)
    pub fn clear(&mut self) {
        self.sets.clear();
    }
}
