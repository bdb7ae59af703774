//! Diagnostics data model and the parser/engine merger.
//!
//! Diagnostics come from two independent producers: structural analysis of the
//! parse tree and the external evaluation engine. [`DiagnosticsMerger`] caches
//! each set separately and recombines them into one span-ordered marker list on
//! every publish, so clearing one producer's set never disturbs the other's.

use crate::line_index::LineIndex;
use crate::surface::Marker;
use serde::{Deserialize, Serialize};

/// A half-open byte-offset span (`start..end`) in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Span start offset (inclusive).
    pub start: usize,
    /// Span end offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks dependent automatic actions (auto-evaluation).
    Error,
    /// Worth surfacing but non-blocking.
    Warning,
    /// Informational only.
    Info,
}

/// Which subsystem produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSource {
    /// Structural diagnostics derived from the parse tree.
    Parser,
    /// Diagnostics returned by the evaluation engine.
    Engine,
}

impl DiagnosticSource {
    /// Stable lowercase name, used as the marker `source` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parser => "parser",
            Self::Engine => "engine",
        }
    }
}

impl Default for DiagnosticSource {
    fn default() -> Self {
        Self::Engine
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Human-readable message.
    pub message: String,
    /// Severity level.
    pub severity: Severity,
    /// Stable diagnostic code (e.g. `"syntax"`, `"missing"`).
    #[serde(default)]
    pub code: String,
    /// Affected byte span.
    pub span: Span,
    /// Producing subsystem.
    #[serde(default)]
    pub source: DiagnosticSource,
}

impl Diagnostic {
    /// Create a parser-sourced diagnostic.
    pub fn parser(message: impl Into<String>, code: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            code: code.into(),
            span,
            source: DiagnosticSource::Parser,
        }
    }
}

/// Combines parser-sourced and engine-sourced diagnostics into one ordered set.
pub struct DiagnosticsMerger {
    syntax: Vec<Diagnostic>,
    engine: Vec<Diagnostic>,
}

impl DiagnosticsMerger {
    /// Create a merger with both sets empty.
    pub fn new() -> Self {
        Self {
            syntax: Vec::new(),
            engine: Vec::new(),
        }
    }

    /// Replace the parser-sourced set. The engine-sourced set is untouched.
    pub fn set_syntax(&mut self, diagnostics: Vec<Diagnostic>) {
        self.syntax = diagnostics;
    }

    /// Replace the engine-sourced set. The parser-sourced set is untouched.
    pub fn set_engine(&mut self, diagnostics: Vec<Diagnostic>) {
        self.engine = diagnostics;
    }

    /// Clear only the engine-sourced set.
    pub fn clear_engine(&mut self) {
        self.engine.clear();
    }

    /// The currently cached parser-sourced diagnostics.
    pub fn syntax_diagnostics(&self) -> &[Diagnostic] {
        &self.syntax
    }

    /// Whether any parser-sourced diagnostic has `Error` severity.
    ///
    /// Such a diagnostic blocks automatic evaluation until edits resolve it.
    pub fn has_blocking_errors(&self) -> bool {
        self.syntax
            .iter()
            .any(|diag| diag.severity == Severity::Error)
    }

    /// Both sets combined, sorted ascending by `span.start`.
    pub fn merged(&self) -> Vec<Diagnostic> {
        let mut combined = Vec::with_capacity(self.syntax.len() + self.engine.len());
        combined.extend(self.syntax.iter().cloned());
        combined.extend(self.engine.iter().cloned());
        combined.sort_by_key(|diag| diag.span.start);
        combined
    }

    /// The merged set mapped to the editor surface's marker schema.
    pub fn to_markers(&self, line_index: &LineIndex) -> Vec<Marker> {
        self.merged()
            .into_iter()
            .map(|diag| Marker {
                start: line_index.byte_to_position(diag.span.start),
                end: line_index.byte_to_position(diag.span.end),
                message: diag.message,
                severity: diag.severity,
                code: diag.code,
                source: diag.source.as_str().to_string(),
            })
            .collect()
    }
}

impl Default for DiagnosticsMerger {
    fn default() -> Self {
        Self::new()
    }
}
