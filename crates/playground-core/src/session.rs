//! The incremental playground session.
//!
//! One [`PlaygroundSession`] exists per editor instance. It owns the syntax
//! session (and through it the current parse tree), the derived token and
//! diagnostic caches, and the evaluation scheduler. All mutation flows through
//! it: the editor surface feeds change batches in, and the session hands back
//! markers plus [`SessionCommand`]s for the host to act on.
//!
//! The session never performs timing or engine calls itself. The host starts
//! the debounce timer and the evaluation it is told to, then reports back via
//! [`PlaygroundSession::timer_fired`] and
//! [`PlaygroundSession::evaluation_finished`]. This keeps the whole pipeline on
//! one logical thread with explicit suspension points.

use std::time::Duration;

use crate::artifacts::{default_token_lines, derive_diagnostics, derive_tokens};
use crate::delta::translate_changes;
use crate::diagnostics::DiagnosticsMerger;
use crate::engine::{
    CompletionSuggestion, EngineError, EvalResponse, EvaluationEngine, Hover, format_duration_ms,
    map_completion_item,
};
use crate::line_index::LineIndex;
use crate::scheduler::{EvalScheduler, SchedulerAction, SchedulerState, TimerToken};
use crate::surface::{ContentChange, Marker, MarkerSink};
use crate::syntax::SyntaxSession;
use crate::tokens::{ScopeMap, Token};

/// The owner tag under which the session publishes markers.
pub const MARKER_OWNER: &str = "playground";

/// The source text a fresh playground starts with.
pub const DEFAULT_SOURCE: &str = "1 + 1";

/// Session construction parameters.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Node kind → highlight scope mapping.
    pub scopes: ScopeMap,
    /// Debounce delay for automatic evaluation.
    pub debounce: Duration,
    /// Owner tag for published markers.
    pub marker_owner: String,
}

impl SessionConfig {
    /// Create a config with the default debounce and marker owner.
    pub fn new(scopes: ScopeMap) -> Self {
        Self {
            scopes,
            debounce: crate::scheduler::DEFAULT_DEBOUNCE,
            marker_owner: MARKER_OWNER.to_string(),
        }
    }

    /// Override the debounce delay.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Override the marker owner tag.
    pub fn with_marker_owner(mut self, owner: impl Into<String>) -> Self {
        self.marker_owner = owner.into();
        self
    }
}

/// Work the host must carry out on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start the debounce timer; call
    /// [`PlaygroundSession::timer_fired`] with `token` after `delay`.
    ScheduleTimer {
        /// Token identifying this timer generation.
        token: TimerToken,
        /// How long to wait.
        delay: Duration,
    },
    /// Submit `source` to the evaluation engine; call
    /// [`PlaygroundSession::evaluation_finished`] with the result.
    Evaluate {
        /// Snapshot of the text to evaluate.
        source: String,
    },
    /// An evaluation is already in flight; surface its result to the caller
    /// when it lands instead of submitting another.
    AwaitInFlight,
}

/// What to show in the result area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultDisplay {
    /// A successful evaluation.
    Value {
        /// Rendered result value.
        text: String,
        /// Name of the result's type.
        type_name: String,
        /// Formatted timing string (e.g. `"<0.01ms"`).
        timing: String,
    },
    /// The engine call itself failed.
    Failure {
        /// Message replacing the result area.
        message: String,
    },
}

/// The outcome of feeding one event into the session.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    /// Full replacement marker set, when diagnostics changed.
    pub markers: Option<Vec<Marker>>,
    /// Whether line tokens changed (the surface should re-tokenize).
    pub tokens_changed: bool,
    /// Result-area update, if any.
    pub display: Option<ResultDisplay>,
    /// Follow-up work for the host.
    pub commands: Vec<SessionCommand>,
}

/// An incremental syntax session for one editor instance.
pub struct PlaygroundSession<S: SyntaxSession> {
    syntax: S,
    config: SessionConfig,
    text: String,
    line_index: LineIndex,
    tokens_by_line: Vec<Vec<Token>>,
    token_version: u64,
    merger: DiagnosticsMerger,
    scheduler: EvalScheduler,
}

impl<S: SyntaxSession> PlaygroundSession<S> {
    /// Create a session over the given syntax session.
    ///
    /// The document starts empty; call [`PlaygroundSession::open`] to load the
    /// initial text.
    pub fn new(syntax: S, config: SessionConfig) -> Self {
        let scheduler = EvalScheduler::new(config.debounce);
        let line_index = LineIndex::new();
        let tokens_by_line = default_token_lines(&line_index);
        Self {
            syntax,
            config,
            text: String::new(),
            line_index,
            tokens_by_line,
            token_version: 0,
            merger: DiagnosticsMerger::new(),
            scheduler,
        }
    }

    /// Load the initial text: first parse (no edit hints), derive artifacts,
    /// and schedule the first automatic evaluation.
    pub fn open(&mut self, text: &str) -> SessionUpdate {
        self.text = text.to_string();
        self.line_index = LineIndex::from_text(text);
        self.syntax.reparse(&self.text);
        self.refresh_artifacts();

        let action = self.scheduler.on_edit();
        SessionUpdate {
            markers: Some(self.current_markers()),
            tokens_changed: true,
            display: None,
            commands: self.commands_for(action),
        }
    }

    /// The current document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The marker owner tag this session publishes under.
    pub fn marker_owner(&self) -> &str {
        &self.config.marker_owner
    }

    /// Monotonic version of the token cache; bumped on every artifact refresh
    /// so the surface knows to re-tokenize.
    pub fn token_version(&self) -> u64 {
        self.token_version
    }

    /// Highlight tokens for one line (empty for out-of-range lines).
    pub fn tokens_for_line(&self, row: usize) -> &[Token] {
        self.tokens_by_line.get(row).map_or(&[], Vec::as_slice)
    }

    /// Highlight tokens for every line.
    pub fn token_lines(&self) -> &[Vec<Token>] {
        &self.tokens_by_line
    }

    /// Whether a blocking (error-severity) syntax diagnostic is present.
    pub fn has_blocking_errors(&self) -> bool {
        self.merger.has_blocking_errors()
    }

    /// The scheduler's current state.
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// The currently merged marker set.
    pub fn current_markers(&self) -> Vec<Marker> {
        self.merger.to_markers(&self.line_index)
    }

    /// Publish the current marker set to a sink under this session's owner tag.
    pub fn publish_markers(&self, sink: &mut impl MarkerSink) {
        sink.set_markers(&self.config.marker_owner, self.current_markers());
    }

    /// Process one change batch from the editor surface.
    ///
    /// `new_text` is the full document text after the batch. The batch is
    /// translated into ordered deltas, recorded into the current tree, and an
    /// incremental re-parse replaces the tree before artifacts are re-derived.
    pub fn apply_change_batch(
        &mut self,
        changes: &[ContentChange],
        new_text: &str,
    ) -> SessionUpdate {
        let deltas = translate_changes(changes);
        self.syntax.apply_edits(&deltas);

        self.text = new_text.to_string();
        self.line_index = LineIndex::from_text(new_text);
        self.syntax.reparse(&self.text);
        self.refresh_artifacts();

        let action = self.scheduler.on_edit();
        SessionUpdate {
            markers: Some(self.current_markers()),
            tokens_changed: true,
            display: None,
            commands: self.commands_for(action),
        }
    }

    /// The debounce timer fired.
    pub fn timer_fired(&mut self, token: TimerToken) -> Vec<SessionCommand> {
        let blocked = self.merger.has_blocking_errors();
        let action = self.scheduler.on_timer_fired(token, blocked);
        self.commands_for(action)
    }

    /// A manual run was requested (e.g. a Run button).
    pub fn manual_run(&mut self) -> Vec<SessionCommand> {
        let action = self.scheduler.on_manual_run();
        self.commands_for(action)
    }

    /// The in-flight evaluation completed.
    ///
    /// A success renders the value and clears engine-sourced diagnostics; an
    /// error outcome installs the outcome's diagnostics; a failed engine call
    /// renders a failure message and leaves cached diagnostics alone. In every
    /// case the scheduler advances, so a queued replay starts immediately.
    pub fn evaluation_finished(
        &mut self,
        result: Result<EvalResponse, EngineError>,
    ) -> SessionUpdate {
        let (display, markers) = match result {
            Ok(EvalResponse::Ok { data }) => {
                self.merger.clear_engine();
                let display = ResultDisplay::Value {
                    text: data.value,
                    type_name: data.type_name,
                    timing: format_duration_ms(data.duration_ms),
                };
                (Some(display), Some(self.current_markers()))
            }
            Ok(EvalResponse::Error { error }) => {
                self.merger.set_engine(error.diagnostics);
                (None, Some(self.current_markers()))
            }
            Err(err) => {
                let display = ResultDisplay::Failure {
                    message: format!("Evaluation failed: {err}"),
                };
                (Some(display), None)
            }
        };

        let blocked = self.merger.has_blocking_errors();
        let action = self.scheduler.on_evaluation_finished(blocked);
        SessionUpdate {
            markers,
            tokens_changed: false,
            display,
            commands: self.commands_for(action),
        }
    }

    /// Hover lookup through the engine, gated on its advertised capability.
    ///
    /// Any engine failure yields `None` rather than propagating.
    pub fn hover(&self, engine: &mut impl EvaluationEngine, byte_offset: usize) -> Option<Hover> {
        if !engine.capabilities().hover {
            return None;
        }
        engine.hover_at(&self.text, byte_offset).ok().flatten()
    }

    /// Completion lookup through the engine, gated on its advertised
    /// capability.
    ///
    /// Any engine failure yields an empty list rather than propagating.
    pub fn completions(
        &self,
        engine: &mut impl EvaluationEngine,
        byte_offset: usize,
    ) -> Vec<CompletionSuggestion> {
        if !engine.capabilities().completions {
            return Vec::new();
        }
        engine
            .completions_at(&self.text, byte_offset)
            .unwrap_or_default()
            .iter()
            .map(map_completion_item)
            .collect()
    }

    fn refresh_artifacts(&mut self) {
        let (tokens, diagnostics) = {
            let root = self.syntax.root();
            (
                derive_tokens(root.as_ref(), &self.line_index, &self.config.scopes),
                derive_diagnostics(root.as_ref(), self.text.len()),
            )
        };
        self.tokens_by_line = tokens;
        self.token_version += 1;
        self.merger.set_syntax(diagnostics);
    }

    fn commands_for(&self, action: SchedulerAction) -> Vec<SessionCommand> {
        match action {
            SchedulerAction::None => Vec::new(),
            SchedulerAction::StartTimer(token) => vec![SessionCommand::ScheduleTimer {
                token,
                delay: self.scheduler.debounce_delay(),
            }],
            SchedulerAction::BeginEvaluation => vec![SessionCommand::Evaluate {
                source: self.text.clone(),
            }],
            SchedulerAction::AwaitInFlight => vec![SessionCommand::AwaitInFlight],
        }
    }
}
