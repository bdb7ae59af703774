//! The syntax-session abstraction.
//!
//! A [`SyntaxSession`] owns the current parse tree exclusively: edits are
//! recorded into it, an incremental re-parse installs a replacement tree, and
//! the previous tree is dropped at that moment. Consumers only ever see
//! borrowed [`SyntaxNode`] views, so no view can outlive the tree it came from.

use crate::delta::{EditDelta, Position};

/// A read-only view over one parse-tree node.
pub trait SyntaxNode: Clone {
    /// The node's kind name (grammar symbol).
    fn kind(&self) -> &str;
    /// Start byte offset in the document.
    fn start_byte(&self) -> usize;
    /// Exclusive end byte offset in the document.
    fn end_byte(&self) -> usize;
    /// Start position (row, byte column).
    fn start_position(&self) -> Position;
    /// End position (row, byte column).
    fn end_position(&self) -> Position;
    /// Whether the parser inserted this node to recover from an error.
    fn is_missing(&self) -> bool;
    /// Whether this node is an error node.
    fn is_error(&self) -> bool;
    /// The node's parent, if any.
    fn parent(&self) -> Option<Self>;
    /// All children, in tree order.
    fn children(&self) -> Vec<Self>;
    /// Named children only, in tree order.
    fn named_children(&self) -> Vec<Self>;
}

/// Owner of the current parse tree.
///
/// At most one tree is current at any time. [`SyntaxSession::reparse`] replaces
/// it atomically; implementations must drop the previous tree as part of the
/// replacement and never hand it out again.
pub trait SyntaxSession {
    /// The borrowed node view type.
    type Node<'a>: SyntaxNode
    where
        Self: 'a;

    /// Record an ordered batch of edits into the current tree.
    ///
    /// This mutates the tree's bookkeeping only; no re-parse happens here.
    /// A no-op when no tree exists yet.
    fn apply_edits(&mut self, deltas: &[EditDelta]);

    /// Re-parse `full_text`, using the edited current tree as an incremental
    /// hint when present, and install the result as the new current tree.
    fn reparse(&mut self, full_text: &str);

    /// Borrow the current tree's root, or `None` when no tree is available.
    fn root(&self) -> Option<Self::Node<'_>>;

    /// Whether a current tree exists.
    fn has_tree(&self) -> bool {
        self.root().is_some()
    }
}

/// A node view type for sessions that never produce a tree.
#[derive(Debug, Clone, Copy)]
pub enum NeverNode {}

impl SyntaxNode for NeverNode {
    fn kind(&self) -> &str {
        match *self {}
    }
    fn start_byte(&self) -> usize {
        match *self {}
    }
    fn end_byte(&self) -> usize {
        match *self {}
    }
    fn start_position(&self) -> Position {
        match *self {}
    }
    fn end_position(&self) -> Position {
        match *self {}
    }
    fn is_missing(&self) -> bool {
        match *self {}
    }
    fn is_error(&self) -> bool {
        match *self {}
    }
    fn parent(&self) -> Option<Self> {
        match *self {}
    }
    fn children(&self) -> Vec<Self> {
        match *self {}
    }
    fn named_children(&self) -> Vec<Self> {
        match *self {}
    }
}

/// The degraded session used when no parser engine is available.
///
/// Never holds a tree, so dependents derive no artifacts and no diagnostics;
/// the surrounding session keeps accepting edits and evaluating.
#[derive(Debug, Default)]
pub struct NullSyntax;

impl SyntaxSession for NullSyntax {
    type Node<'a> = NeverNode;

    fn apply_edits(&mut self, _deltas: &[EditDelta]) {}

    fn reparse(&mut self, _full_text: &str) {}

    fn root(&self) -> Option<NeverNode> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_syntax_has_no_tree() {
        let mut syntax = NullSyntax;
        syntax.apply_edits(&[]);
        syntax.reparse("1 + 1");
        assert!(!syntax.has_tree());
        assert!(syntax.root().is_none());
    }
}
