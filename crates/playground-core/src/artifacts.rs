//! Artifact derivation.
//!
//! Walks the current parse tree to produce the two derived artifacts: per-line
//! highlight tokens and structural diagnostics (missing / error nodes). Both
//! walks are iterative and deterministic; an absent tree yields default tokens
//! and no diagnostics.

use crate::diagnostics::{Diagnostic, Span};
use crate::line_index::LineIndex;
use crate::syntax::SyntaxNode;
use crate::tokens::{ScopeMap, Token};

/// One default-scope token line per document line.
///
/// This is also the degraded output when no tree is available.
pub fn default_token_lines(line_index: &LineIndex) -> Vec<Vec<Token>> {
    (0..line_index.line_count())
        .map(|_| vec![Token::reset(0)])
        .collect()
}

/// Derive per-line highlight tokens from the tree.
///
/// Every node whose kind maps to a classification contributes a classified
/// token at its start column and a reset token at its end column. A node
/// spanning multiple lines re-affirms its classification at column 0 of each
/// interior line and resets at the full line length there. Zero-width spans
/// are skipped. Each line's tokens come back sorted by `start_index`, with at
/// most one token per column (the later contribution wins).
pub fn derive_tokens<N: SyntaxNode>(
    root: Option<&N>,
    line_index: &LineIndex,
    scopes: &ScopeMap,
) -> Vec<Vec<Token>> {
    let mut lines = default_token_lines(line_index);
    let Some(root) = root else {
        return lines;
    };

    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if let Some(scope) = scopes.get(node.kind()) {
            push_token_range(&node, scope, &mut lines, line_index);
        }
        for child in node.named_children() {
            stack.push(child);
        }
    }

    for line in &mut lines {
        line.sort_by_key(|token| token.start_index);
        collapse_same_column(line);
    }
    lines
}

fn push_token_range<N: SyntaxNode>(
    node: &N,
    scope: crate::tokens::HighlightScope,
    lines: &mut [Vec<Token>],
    line_index: &LineIndex,
) {
    let start = node.start_position();
    let end = node.end_position();

    for row in start.row..=end.row {
        let Some(tokens) = lines.get_mut(row) else {
            continue;
        };
        let start_col = if row == start.row { start.column } else { 0 };
        let end_col = if row == end.row {
            end.column
        } else {
            line_index.line_byte_len(row)
        };
        if start_col == end_col {
            continue;
        }
        tokens.push(Token::classified(start_col, scope));
        tokens.push(Token::reset(end_col));
    }
}

/// Keep one token per column, preferring the later contribution.
///
/// The input must already be sorted by `start_index`; the stable sort keeps
/// push order within a column, so a classification pushed after a reset (or
/// after the line's initial default token) wins that column.
fn collapse_same_column(line: &mut Vec<Token>) {
    let mut out: Vec<Token> = Vec::with_capacity(line.len());
    for token in line.drain(..) {
        match out.last_mut() {
            Some(last) if last.start_index == token.start_index => *last = token,
            _ => out.push(token),
        }
    }
    *line = out;
}

/// Derive structural diagnostics from the tree.
///
/// A missing node yields a `missing` diagnostic; an error node yields a
/// `syntax` diagnostic unless its immediate parent is itself an error node,
/// so one error region is reported once rather than once per level of the
/// error subtree. Zero-width spans are widened by one byte (clamped to the
/// document end) so the marker stays visible. The result is sorted ascending
/// by span start.
pub fn derive_diagnostics<N: SyntaxNode>(root: Option<&N>, text_byte_len: usize) -> Vec<Diagnostic> {
    let Some(root) = root else {
        return Vec::new();
    };

    let mut diagnostics = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if node.is_missing() {
            diagnostics.push(Diagnostic::parser(
                format!("Missing {}", node.kind()),
                "missing",
                node_span(&node, text_byte_len),
            ));
        } else if node.is_error() && !node.parent().is_some_and(|parent| parent.is_error()) {
            diagnostics.push(Diagnostic::parser(
                "Syntax error",
                "syntax",
                node_span(&node, text_byte_len),
            ));
        }
        for child in node.children() {
            stack.push(child);
        }
    }

    diagnostics.sort_by_key(|diag| diag.span.start);
    diagnostics
}

fn node_span<N: SyntaxNode>(node: &N, text_byte_len: usize) -> Span {
    let start = node.start_byte();
    let end = node.end_byte();
    if start == end {
        // widen so the marker is selectable
        Span::new(start, (start + 1).min(text_byte_len))
    } else {
        Span::new(start, end)
    }
}
