#![warn(missing_docs)]
//! `playground-core` - Incremental syntax session kernel for live-evaluating
//! code playgrounds.
//!
//! # Overview
//!
//! The crate keeps a mutable parse tree synchronized with a stream of editor
//! edits, derives per-line highlight tokens and structural diagnostics from
//! that tree, and coordinates debounced, single-flight calls into an external
//! evaluation engine. It is headless: the editor widget, the parser engine,
//! and the evaluation engine are collaborators reached through traits.
//!
//! # Pipeline
//!
//! ```text
//! editor surface ──change batch──▶ delta::translate_changes
//!                                        │ ordered EditDeltas
//!                                        ▼
//!                              SyntaxSession (owned tree)
//!                              apply_edits + incremental reparse
//!                                        │ borrowed node views
//!                                        ▼
//!                        artifacts::{derive_tokens, derive_diagnostics}
//!                                        │
//!                                        ▼
//!                        DiagnosticsMerger ──markers──▶ editor surface
//!
//! every edit also drives EvalScheduler ──▶ evaluation engine ──▶ merger
//! ```
//!
//! # Concurrency model
//!
//! Everything runs on one logical thread. The session and scheduler are
//! event-driven state machines: they return [`SessionCommand`]s /
//! [`SchedulerAction`]s telling the host what to start (a timer, an
//! evaluation), and the host reports completions back. No runtime is assumed.
//!
//! # Module Description
//!
//! - [`surface`] - editor-surface boundary types (change batches, markers)
//! - [`delta`] - edit translation into tree-mutation deltas
//! - [`line_index`] - rope-backed byte offset ↔ position conversion
//! - [`syntax`] - the owned-tree session and node-view traits
//! - [`tokens`] - highlight scopes and per-line tokens
//! - [`artifacts`] - token and diagnostic derivation from the tree
//! - [`diagnostics`] - the diagnostic model and parser/engine merger
//! - [`scheduler`] - the debounce / single-flight evaluation state machine
//! - [`engine`] - the evaluation-engine capability trait and wire format
//! - [`session`] - the per-editor session orchestrator

pub mod artifacts;
pub mod delta;
pub mod diagnostics;
pub mod engine;
pub mod line_index;
pub mod scheduler;
pub mod session;
pub mod surface;
pub mod syntax;
pub mod tokens;

pub use artifacts::{default_token_lines, derive_diagnostics, derive_tokens};
pub use delta::{EditDelta, Position, end_position_after, translate_changes};
pub use diagnostics::{Diagnostic, DiagnosticSource, DiagnosticsMerger, Severity, Span};
pub use engine::{
    CompletionItem, CompletionKind, CompletionSuggestion, EngineCapabilities, EngineError,
    EvalFailure, EvalResponse, EvalSuccess, EvaluationEngine, Hover, decode_response,
    format_duration_ms, map_completion_item,
};
pub use line_index::LineIndex;
pub use scheduler::{
    DEFAULT_DEBOUNCE, EvalScheduler, SchedulerAction, SchedulerState, TimerToken,
};
pub use session::{
    DEFAULT_SOURCE, MARKER_OWNER, PlaygroundSession, ResultDisplay, SessionCommand, SessionConfig,
    SessionUpdate,
};
pub use surface::{ChangeRange, ContentChange, Marker, MarkerSink};
pub use syntax::{NeverNode, NullSyntax, SyntaxNode, SyntaxSession};
pub use tokens::{DEFAULT_SCOPE, HighlightScope, ScopeMap, Token};
