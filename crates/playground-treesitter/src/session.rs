use playground_core::delta::{EditDelta, Position};
use playground_core::syntax::{SyntaxNode, SyntaxSession};
use tree_sitter::{InputEdit, Parser, Point, Tree};

/// Errors produced by [`TreeSitterSyntax`].
#[derive(Debug)]
pub enum TreeSitterSyntaxError {
    /// Setting the Tree-sitter language failed.
    Language(String),
}

impl std::fmt::Display for TreeSitterSyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Language(msg) => write!(f, "tree-sitter language error: {msg}"),
        }
    }
}

impl std::error::Error for TreeSitterSyntaxError {}

fn to_point(position: Position) -> Point {
    Point {
        row: position.row,
        column: position.column,
    }
}

fn to_position(point: Point) -> Position {
    Position::new(point.row, point.column)
}

/// A borrowed view over one Tree-sitter node.
///
/// Borrows from the session's current tree, so it cannot outlive a re-parse.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a>(tree_sitter::Node<'a>);

impl<'a> NodeView<'a> {
    /// The underlying Tree-sitter node.
    pub fn inner(&self) -> tree_sitter::Node<'a> {
        self.0
    }
}

impl SyntaxNode for NodeView<'_> {
    fn kind(&self) -> &str {
        self.0.kind()
    }

    fn start_byte(&self) -> usize {
        self.0.start_byte()
    }

    fn end_byte(&self) -> usize {
        self.0.end_byte()
    }

    fn start_position(&self) -> Position {
        to_position(self.0.start_position())
    }

    fn end_position(&self) -> Position {
        to_position(self.0.end_position())
    }

    fn is_missing(&self) -> bool {
        self.0.is_missing()
    }

    fn is_error(&self) -> bool {
        self.0.is_error()
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent().map(NodeView)
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.0.walk();
        self.0.children(&mut cursor).map(NodeView).collect()
    }

    fn named_children(&self) -> Vec<Self> {
        let mut cursor = self.0.walk();
        self.0.named_children(&mut cursor).map(NodeView).collect()
    }
}

/// A Tree-sitter backed syntax session.
///
/// Owns the parser and the current tree. Edits are recorded as `InputEdit`s;
/// a re-parse uses the edited tree as the incremental hint and installs the
/// result, dropping the previous tree at that moment.
pub struct TreeSitterSyntax {
    parser: Parser,
    tree: Option<Tree>,
}

impl TreeSitterSyntax {
    /// Create a session for the given language.
    pub fn new(language: &tree_sitter::Language) -> Result<Self, TreeSitterSyntaxError> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| TreeSitterSyntaxError::Language(e.to_string()))?;
        Ok(Self { parser, tree: None })
    }
}

impl SyntaxSession for TreeSitterSyntax {
    type Node<'a> = NodeView<'a>;

    fn apply_edits(&mut self, deltas: &[EditDelta]) {
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        for delta in deltas {
            tree.edit(&InputEdit {
                start_byte: delta.start_byte,
                old_end_byte: delta.old_end_byte,
                new_end_byte: delta.new_end_byte,
                start_position: to_point(delta.start_position),
                old_end_position: to_point(delta.old_end_position),
                new_end_position: to_point(delta.new_end_position),
            });
        }
    }

    fn reparse(&mut self, full_text: &str) {
        // Installing the new tree drops the edited one it was seeded from.
        self.tree = self.parser.parse(full_text, self.tree.as_ref());
    }

    fn root(&self) -> Option<NodeView<'_>> {
        self.tree.as_ref().map(|tree| NodeView(tree.root_node()))
    }
}
