#![warn(missing_docs)]
//! `playground-treesitter` - Tree-sitter integration for `playground-core`.
//!
//! Implements the kernel's [`SyntaxSession`](playground_core::SyntaxSession)
//! trait over a Tree-sitter parser: edit batches become `InputEdit`s on the
//! current tree, and each re-parse uses that edited tree as the incremental
//! hint. Node views borrow from the session, so derivations can never hold a
//! node across a tree replacement.

mod session;

pub use session::{NodeView, TreeSitterSyntax, TreeSitterSyntaxError};
