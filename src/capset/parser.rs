//! Host parser surface and dispatch loop
//!
//! This module provides the minimal host the capture handlers plug into:
//! a sequential scan over one input buffer, a dispatch table of token
//! handlers tried in registration order, and the per-session state the
//! handlers mutate (node tree, capture registry, open-element chain, global
//! open counter).
//!
//! Handlers implement `TokenHandler` and report one of three outcomes:
//!
//! - `Capture::None`: the handler's pattern did not apply; the loop falls
//!   through to the next handler.
//! - `Capture::Handled`: input was consumed and any produced nodes were
//!   attached by the handler itself.
//! - `Capture::Standalone(id)`: input was consumed and the node should be
//!   attached to the current enclosing node by the loop (used by the
//!   lenient unbalanced-close recovery).
//!
//! Sessions are strictly single-threaded and synchronous; parsing several
//! inputs in parallel means one `Parser` per input.

use std::fmt;

use crate::capset::error::CaptureError;
use crate::capset::matcher::{MatchInfo, Pattern};
use crate::capset::node::{NodeId, NodeTree};
use crate::capset::registry::CaptureSets;

/// Policy knobs for one parser instance
#[derive(Debug, Clone, PartialEq)]
pub struct ParserOptions {
    /// When true, an unbalanced close is a fatal parse error
    pub strict: bool,
    /// The escape marker a close's `suffix` capture is compared against
    pub escape: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            strict: false,
            escape: "\\".to_string(),
        }
    }
}

/// Outcome of one handler attempt at the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Pattern did not apply; no input consumed, no state changed
    None,
    /// Input consumed; the handler attached its own nodes
    Handled,
    /// Input consumed; the loop attaches this node to the enclosing node
    Standalone(NodeId),
}

/// A token handler consulted by the scanning loop
pub trait TokenHandler {
    /// Try to capture at the current position
    fn attempt(&self, state: &mut ParserState) -> Result<Capture, CaptureError>;
}

impl<F> TokenHandler for F
where
    F: Fn(&mut ParserState) -> Result<Capture, CaptureError>,
{
    fn attempt(&self, state: &mut ParserState) -> Result<Capture, CaptureError> {
        self(state)
    }
}

/// Mutable per-session state shared by all handlers
#[derive(Debug)]
pub struct ParserState {
    input: String,
    pos: usize,
    /// The node tree grown during this session
    pub tree: NodeTree,
    /// Per-kind stacks of open containers
    pub sets: CaptureSets,
    /// Net open count across all kinds; decremented by tolerated
    /// mismatched closes, so it can go negative and is not required to
    /// equal the sum of stack depths
    pub set_count: isize,
    /// Policy configuration
    pub options: ParserOptions,
    open_elements: Vec<NodeId>,
}

impl ParserState {
    fn new(options: ParserOptions) -> Self {
        ParserState {
            input: String::new(),
            pos: 0,
            tree: NodeTree::new(),
            sets: CaptureSets::new(),
            set_count: 0,
            options,
            open_elements: Vec::new(),
        }
    }

    /// Start a fresh session over `input`
    fn reset(&mut self, input: &str) {
        self.input = input.to_string();
        self.pos = 0;
        self.tree = NodeTree::new();
        self.sets.clear();
        self.set_count = 0;
        self.open_elements.clear();
    }

    /// Current byte offset into the input
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The not-yet-consumed tail of the input
    pub fn remaining(&self) -> &str {
        &self.input[self.pos..]
    }

    /// True when the whole input has been consumed
    pub fn eos(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Anchored match against the remaining input; consumes on success
    pub fn match_pattern(&mut self, pattern: &Pattern) -> Option<MatchInfo> {
        let info = pattern.apply(self.remaining())?;
        self.pos += info.text.len();
        Some(info)
    }

    /// The innermost open element, or the root when nothing is open
    pub fn enclosing_node(&self) -> NodeId {
        self.open_elements
            .last()
            .copied()
            .unwrap_or_else(|| self.tree.root())
    }

    /// Push a freshly-opened container onto its kind's stack and onto the
    /// open-element chain
    pub fn push_open(&mut self, kind: &str, id: NodeId) {
        self.sets.push(kind, id);
        self.open_elements.push(id);
    }

    /// The innermost open container for `kind`, without popping it
    pub fn peek_open(&self, kind: &str) -> Option<NodeId> {
        self.sets.peek(kind)
    }

    /// Pop the innermost container for `kind`
    ///
    /// On a non-empty pop the same node is removed from the open-element
    /// chain (last occurrence); an empty pop leaves the chain alone.
    pub fn pop_open(&mut self, kind: &str) -> Option<NodeId> {
        let popped = self.sets.pop(kind);
        if let Some(id) = popped {
            if let Some(at) = self.open_elements.iter().rposition(|n| *n == id) {
                self.open_elements.remove(at);
            }
        }
        popped
    }
}

/// A parser instance: dispatch table plus session state
pub struct Parser {
    handlers: Vec<(String, Box<dyn TokenHandler>)>,
    pub(crate) registered_opens: std::collections::HashSet<String>,
    /// Session state, exposed for host diagnostics and tests
    pub state: ParserState,
}

impl Parser {
    /// Create a parser with default (lenient) options
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    /// Create a parser with explicit options
    pub fn with_options(options: ParserOptions) -> Self {
        Parser {
            handlers: Vec::new(),
            registered_opens: std::collections::HashSet::new(),
            state: ParserState::new(options),
        }
    }

    /// Register a handler for a token kind
    ///
    /// Handlers are consulted in first-registration order; re-registering
    /// a kind replaces the handler in place without changing that order.
    pub fn set<H>(&mut self, kind: &str, handler: H) -> &mut Self
    where
        H: TokenHandler + 'static,
    {
        let boxed: Box<dyn TokenHandler> = Box::new(handler);
        if let Some(entry) = self.handlers.iter_mut().find(|(k, _)| k == kind) {
            entry.1 = boxed;
        } else {
            self.handlers.push((kind.to_string(), boxed));
        }
        self
    }

    /// Whether a handler is registered for `kind`
    pub fn has(&self, kind: &str) -> bool {
        self.handlers.iter().any(|(k, _)| k == kind)
    }

    /// Parse `input`, producing the session's node tree
    ///
    /// Resets all session state first, then scans until end of input. Each
    /// step tries the registered handlers in order; a position where no
    /// handler applies (or where a handler reports success without
    /// consuming input) fails with `NoMatchingHandler`.
    pub fn parse(&mut self, input: &str) -> Result<&NodeTree, CaptureError> {
        self.state.reset(input);

        while !self.state.eos() {
            let before = self.state.position();
            let mut outcome = Capture::None;

            for (_, handler) in &self.handlers {
                outcome = handler.attempt(&mut self.state)?;
                if outcome != Capture::None {
                    break;
                }
            }

            match outcome {
                Capture::None => {
                    return Err(CaptureError::NoMatchingHandler { position: before });
                }
                Capture::Handled => {}
                Capture::Standalone(id) => {
                    let prev = self.state.enclosing_node();
                    self.state.tree.append_child(prev, id);
                }
            }

            // zero-width "success" would loop forever
            if self.state.position() == before {
                return Err(CaptureError::NoMatchingHandler { position: before });
            }
        }

        Ok(&self.state.tree)
    }

    /// The tree from the most recent parse
    pub fn tree(&self) -> &NodeTree {
        &self.state.tree
    }

    /// Net open count after the most recent parse
    pub fn set_count(&self) -> isize {
        self.state.set_count
    }

    /// Containers left open at end of parse, per kind
    pub fn unclosed(&self) -> Vec<(String, NodeId)> {
        let mut out = Vec::new();
        for (kind, stack) in self.state.sets.open_kinds() {
            for id in stack {
                out.push((kind.to_string(), *id));
            }
        }
        out
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<&str> = self.handlers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("Parser")
            .field("handlers", &kinds)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capset::node::Node;

    /// A handler capturing runs of lowercase letters as `text`
    fn text_handler(state: &mut ParserState) -> Result<Capture, CaptureError> {
        let start = state.position();
        let pattern = Pattern::regex("^[a-z]+").unwrap();
        let Some(info) = state.match_pattern(&pattern) else {
            return Ok(Capture::None);
        };
        let end = state.position();
        let prev = state.enclosing_node();
        let node = state.tree.push(Node::token("text", &info.text, start..end));
        state.tree.append_child(prev, node);
        Ok(Capture::Handled)
    }

    #[test]
    fn test_parse_with_closure_handler() {
        let mut parser = Parser::new();
        parser.set("text", text_handler);

        let tree = parser.parse("abc").unwrap().clone();
        let root = tree.root();
        assert_eq!(tree.children(root).len(), 1);
        let text = tree.children(root)[0];
        assert_eq!(tree.node(text).kind, "text");
        assert_eq!(tree.node(text).value, "abc");
        assert_eq!(tree.node(text).span, 0..3);
    }

    #[test]
    fn test_no_matching_handler_is_an_error() {
        let mut parser = Parser::new();
        parser.set("text", text_handler);

        let err = parser.parse("abc123").unwrap_err();
        assert_eq!(err, CaptureError::NoMatchingHandler { position: 3 });
    }

    #[test]
    fn test_handlers_tried_in_registration_order() {
        // Both handlers match "a"; the first registered one wins.
        let first = |state: &mut ParserState| -> Result<Capture, CaptureError> {
            let start = state.position();
            let pattern = Pattern::regex("^a").unwrap();
            let Some(info) = state.match_pattern(&pattern) else {
                return Ok(Capture::None);
            };
            let end = state.position();
            let prev = state.enclosing_node();
            let node = state.tree.push(Node::token("first", &info.text, start..end));
            state.tree.append_child(prev, node);
            Ok(Capture::Handled)
        };
        let second = |state: &mut ParserState| -> Result<Capture, CaptureError> {
            let start = state.position();
            let pattern = Pattern::regex("^a").unwrap();
            let Some(info) = state.match_pattern(&pattern) else {
                return Ok(Capture::None);
            };
            let end = state.position();
            let prev = state.enclosing_node();
            let node = state.tree.push(Node::token("second", &info.text, start..end));
            state.tree.append_child(prev, node);
            Ok(Capture::Handled)
        };

        let mut parser = Parser::new();
        parser.set("first", first).set("second", second);
        let tree = parser.parse("a").unwrap();
        assert_eq!(tree.node(tree.children(tree.root())[0]).kind, "first");
    }

    #[test]
    fn test_reset_between_parses() {
        let mut parser = Parser::new();
        parser.set("text", text_handler);

        parser.parse("abc").unwrap();
        parser.parse("xy").unwrap();
        let tree = parser.tree();
        assert_eq!(tree.children(tree.root()).len(), 1);
        assert_eq!(tree.node(tree.children(tree.root())[0]).value, "xy");
        assert_eq!(parser.set_count(), 0);
    }

    #[test]
    fn test_parser_debug_lists_handler_kinds() {
        let mut parser = Parser::new();
        parser.set("text", text_handler);
        let rendered = format!("{:?}", parser);
        assert!(rendered.contains("\"text\""));
        assert!(rendered.contains("set_count"));
    }

    #[test]
    fn test_enclosing_node_defaults_to_root() {
        let state = ParserState::new(ParserOptions::default());
        assert_eq!(state.enclosing_node(), state.tree.root());
    }

    #[test]
    fn test_pop_open_removes_exact_chain_entry() {
        let mut state = ParserState::new(ParserOptions::default());
        let outer = state.tree.push(Node::container("brace", 0..0));
        let inner = state.tree.push(Node::container("bracket", 1..1));
        state.push_open("brace", outer);
        state.push_open("bracket", inner);

        // Popping the brace while the bracket is innermost must not
        // disturb the bracket's position in the chain.
        assert_eq!(state.pop_open("brace"), Some(outer));
        assert_eq!(state.enclosing_node(), inner);
        assert_eq!(state.pop_open("brace"), None);
        assert_eq!(state.enclosing_node(), inner);
    }
}
