//! Fluent assertion API for parsed trees
//!
//! Test helpers mirroring the tree structure: start from `assert_tree`,
//! then drill into children with closures. Failure messages carry the
//! node path so a failing assertion points at the exact child.

use crate::capset::node::{NodeId, NodeTree};

/// Entry point: build an assertion rooted at the tree's root
pub fn assert_tree(tree: &NodeTree) -> NodeAssertion<'_> {
    NodeAssertion {
        tree,
        id: tree.root(),
        context: "root".to_string(),
    }
}

/// Assertion builder for one node
pub struct NodeAssertion<'a> {
    tree: &'a NodeTree,
    id: NodeId,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    /// Assert the node's kind
    pub fn kind(self, expected: &str) -> Self {
        assert_eq!(
            self.tree.kind(self.id),
            expected,
            "{}: expected kind '{}', found '{}'",
            self.context,
            expected,
            self.tree.kind(self.id)
        );
        self
    }

    /// Assert the node's literal value
    pub fn value(self, expected: &str) -> Self {
        let actual = &self.tree.node(self.id).value;
        assert_eq!(
            actual, expected,
            "{}: expected value '{}', found '{}'",
            self.context, expected, actual
        );
        self
    }

    /// Assert the node's escaped flag
    pub fn escaped(self, expected: bool) -> Self {
        assert_eq!(
            self.tree.node(self.id).escaped,
            expected,
            "{}: expected escaped={}",
            self.context,
            expected
        );
        self
    }

    /// Assert the node's byte span
    pub fn span(self, start: usize, end: usize) -> Self {
        let actual = &self.tree.node(self.id).span;
        assert_eq!(
            (actual.start, actual.end),
            (start, end),
            "{}: expected span {}..{}, found {}..{}",
            self.context,
            start,
            end,
            actual.start,
            actual.end
        );
        self
    }

    /// Assert the number of direct children
    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.tree.children(self.id).len();
        assert_eq!(
            actual,
            expected,
            "{}: expected {} children, found {} ({})",
            self.context,
            expected,
            actual,
            summarize_children(self.tree, self.id)
        );
        self
    }

    /// Drill into a child by index
    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let children = self.tree.children(self.id);
        assert!(
            index < children.len(),
            "{}: child index {} out of bounds ({} children: {})",
            self.context,
            index,
            children.len(),
            summarize_children(self.tree, self.id)
        );
        assertion(NodeAssertion {
            tree: self.tree,
            id: children[index],
            context: format!("{}.children[{}]", self.context, index),
        });
        self
    }

    /// Assert that a node of the given kind exists somewhere in the subtree
    pub fn has_descendant_kind(self, kind: &str) -> Self {
        assert!(
            self.tree.count_kind(self.id, kind) > 0,
            "{}: no descendant of kind '{}'",
            self.context,
            kind
        );
        self
    }

    /// The node id under assertion, for ad-hoc follow-up checks
    pub fn id(&self) -> NodeId {
        self.id
    }
}

fn summarize_children(tree: &NodeTree, id: NodeId) -> String {
    tree.children(id)
        .iter()
        .map(|child| tree.kind(*child))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capset::builtins::register_default_pairs;
    use crate::capset::parser::Parser;

    #[test]
    fn test_fluent_assertions() {
        let mut parser = Parser::new();
        register_default_pairs(&mut parser).unwrap();
        let tree = parser.parse("{a}").unwrap();

        assert_tree(tree)
            .kind("root")
            .child_count(1)
            .has_descendant_kind("brace.close")
            .child(0, |brace| {
                brace
                    .kind("brace")
                    .span(0, 3)
                    .escaped(false)
                    .child_count(3)
                    .child(0, |open| {
                        open.kind("brace.open").value("{").span(0, 1);
                    })
                    .child(1, |text| {
                        text.kind("text").value("a");
                    })
                    .child(2, |close| {
                        close.kind("brace.close").value("}").span(2, 3);
                    });
            });
    }

    #[test]
    #[should_panic(expected = "expected kind 'paren'")]
    fn test_kind_mismatch_panics_with_context() {
        let mut parser = Parser::new();
        register_default_pairs(&mut parser).unwrap();
        let tree = parser.parse("{}").unwrap();
        assert_tree(tree).child(0, |c| {
            c.kind("paren");
        });
    }
}
