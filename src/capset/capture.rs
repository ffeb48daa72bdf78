//! The paired-delimiter capture engine
//!
//! Extends `Parser` with `capture_open` / `capture_close` / `capture_set`:
//! registrations that teach the dispatch loop to recognize a delimiter
//! family (braces, brackets, parens, or any regex-defined pair) as a
//! three-node group: a container of kind `<type>` holding a `<type>.open`
//! marker, the captured content, and a `<type>.close` marker.
//!
//! Nesting is tracked on the capture registry's per-kind stack; closes pop
//! the innermost open container (LIFO). An unbalanced close is fatal under
//! the strict policy and tolerated under the default lenient policy, where
//! it degrades to a standalone escaped close-marker and a counter
//! decrement. A close whose `suffix` sub-capture equals the configured
//! escape marker is recorded as literal text at the point it occurs; the
//! pair stays on its stack and waits for a later unescaped close.

use std::rc::Rc;

use crate::capset::error::CaptureError;
use crate::capset::matcher::Pattern;
use crate::capset::node::{Node, NodeId, NodeTree};
use crate::capset::parser::{Capture, Parser, ParserState, TokenHandler};

/// Post-creation hook invoked with `(tree, marker, container)`
///
/// Runs synchronously: for opens, after the marker is attached to the
/// container but before the container is linked into the tree; for closes,
/// after the pair is completed. Both nodes may be mutated freely.
pub type NodeCallback = Rc<dyn Fn(&mut NodeTree, NodeId, NodeId)>;

/// Handler for the `<type>.open` dispatch key
pub struct OpenHandler {
    kind: String,
    pattern: Pattern,
    callback: Option<NodeCallback>,
}

impl OpenHandler {
    pub fn new(kind: &str, pattern: Pattern, callback: Option<NodeCallback>) -> Self {
        OpenHandler {
            kind: kind.to_string(),
            pattern,
            callback,
        }
    }
}

impl TokenHandler for OpenHandler {
    fn attempt(&self, state: &mut ParserState) -> Result<Capture, CaptureError> {
        let start = state.position();
        let Some(info) = state.match_pattern(&self.pattern) else {
            return Ok(Capture::None);
        };
        let end = state.position();

        state.set_count += 1;

        // The enclosing node is resolved before the new container joins
        // the open chain, so the container attaches under it.
        let prev = state.enclosing_node();

        let container = state.tree.push(Node::container(&self.kind, start..end));
        let open = state.tree.push(Node::marker(
            format!("{}.open", self.kind),
            info.clone(),
            start..end,
        ));
        state.tree.node_mut(container).match_info = Some(info);
        state.tree.append_child(container, open);

        if let Some(callback) = &self.callback {
            callback(&mut state.tree, open, container);
        }

        state.push_open(&self.kind, container);
        state.tree.append_child(prev, container);

        Ok(Capture::Handled)
    }
}

/// Handler for the `<type>.close` dispatch key
pub struct CloseHandler {
    kind: String,
    pattern: Pattern,
    callback: Option<NodeCallback>,
}

impl CloseHandler {
    pub fn new(kind: &str, pattern: Pattern, callback: Option<NodeCallback>) -> Self {
        CloseHandler {
            kind: kind.to_string(),
            pattern,
            callback,
        }
    }
}

impl TokenHandler for CloseHandler {
    fn attempt(&self, state: &mut ParserState) -> Result<Capture, CaptureError> {
        let start = state.position();
        let Some(info) = state.match_pattern(&self.pattern) else {
            return Ok(Capture::None);
        };
        let end = state.position();

        let close = state.tree.push(Node::marker(
            format!("{}.close", self.kind),
            info.clone(),
            start..end,
        ));

        // Nothing open for this kind: unbalanced close.
        let Some(container) = state.peek_open(&self.kind) else {
            if state.options.strict {
                return Err(CaptureError::UnbalancedClose(self.kind.clone()));
            }
            state.set_count -= 1;
            state.tree.node_mut(close).escaped = true;
            return Ok(Capture::Standalone(close));
        };

        if info.suffix() == Some(state.options.escape.as_str()) {
            // Escaped close: recorded as literal text where it occurs, the
            // pair stays open (and on its stack) for a later unescaped
            // close. The marker attaches to the innermost open element,
            // which is the container itself unless another pair opened
            // inside it.
            state.tree.node_mut(container).escaped = true;
            state.tree.node_mut(close).escaped = true;
            let prev = state.enclosing_node();
            state.tree.append_child(prev, close);

            if let Some(callback) = &self.callback {
                callback(&mut state.tree, close, container);
            }
            return Ok(Capture::Handled);
        }

        state.pop_open(&self.kind);
        state.tree.append_child(container, close);
        state.tree.node_mut(container).span.end = end;

        if let Some(callback) = &self.callback {
            callback(&mut state.tree, close, container);
        }

        Ok(Capture::Handled)
    }
}

impl Parser {
    /// Register the open side of a delimiter pair under `<kind>.open`
    pub fn capture_open(
        &mut self,
        kind: &str,
        pattern: Pattern,
        callback: Option<NodeCallback>,
    ) -> &mut Self {
        self.registered_opens.insert(kind.to_string());
        self.set(
            &format!("{}.open", kind),
            OpenHandler::new(kind, pattern, callback),
        );
        self
    }

    /// Register the close side of a delimiter pair under `<kind>.close`
    ///
    /// Fails immediately with `UnregisteredClose` when no open side exists
    /// for `kind`: a close without an open is a configuration error, not
    /// a parse-time condition.
    pub fn capture_close(
        &mut self,
        kind: &str,
        pattern: Pattern,
        callback: Option<NodeCallback>,
    ) -> Result<&mut Self, CaptureError> {
        if !self.registered_opens.contains(kind) {
            return Err(CaptureError::UnregisteredClose(kind.to_string()));
        }
        self.set(
            &format!("{}.close", kind),
            CloseHandler::new(kind, pattern, callback),
        );
        Ok(self)
    }

    /// Register both sides of a delimiter pair in one call
    ///
    /// Behaviorally identical to `capture_open` followed by
    /// `capture_close` with the same callback shared by both sides.
    pub fn capture_set(
        &mut self,
        kind: &str,
        open: Pattern,
        close: Pattern,
        callback: Option<NodeCallback>,
    ) -> Result<&mut Self, CaptureError> {
        self.capture_open(kind, open, callback.clone());
        self.capture_close(kind, close, callback)
    }
}
