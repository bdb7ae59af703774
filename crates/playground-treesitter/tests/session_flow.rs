//! End-to-end session tests over a real Tree-sitter grammar.

use playground_core::engine::{
    EngineCapabilities, EngineError, EvalResponse, EvaluationEngine, decode_response,
};
use playground_core::session::{
    PlaygroundSession, ResultDisplay, SessionCommand, SessionConfig,
};
use playground_core::surface::{ChangeRange, ContentChange};
use playground_core::tokens::{HighlightScope, ScopeMap, Token};
use playground_core::{Severity, TimerToken};
use playground_treesitter::TreeSitterSyntax;

fn rust_scopes() -> ScopeMap {
    ScopeMap::new().with_entries([
        ("line_comment", HighlightScope::Comment),
        ("boolean_literal", HighlightScope::Boolean),
        ("integer_literal", HighlightScope::Integer),
        ("float_literal", HighlightScope::Float),
        ("string_literal", HighlightScope::String),
        ("identifier", HighlightScope::Identifier),
        ("type_identifier", HighlightScope::TypeReference),
    ])
}

fn session() -> PlaygroundSession<TreeSitterSyntax> {
    let syntax = TreeSitterSyntax::new(&tree_sitter_rust::LANGUAGE.into()).unwrap();
    PlaygroundSession::new(syntax, SessionConfig::new(rust_scopes()))
}

fn replace(offset: usize, length: usize, text: &str) -> ContentChange {
    // single-line coordinates; all test documents edit within row 0
    ContentChange {
        range_offset: offset,
        range_length: length,
        text: text.to_string(),
        range: ChangeRange::new(0, offset, 0, offset + length),
    }
}

fn timer_token(commands: &[SessionCommand]) -> TimerToken {
    match commands {
        [SessionCommand::ScheduleTimer { token, .. }] => *token,
        other => panic!("expected a single ScheduleTimer, got {other:?}"),
    }
}

#[test]
fn test_sequential_and_batched_edits_derive_identical_artifacts() {
    let base = "fn main() { 1 + 1; }";

    let mut sequential = session();
    sequential.open(base);
    sequential.apply_change_batch(&[replace(12, 0, "(")], "fn main() { (1 + 1; }");
    sequential.apply_change_batch(&[replace(13, 0, "(")], "fn main() { ((1 + 1; }");

    let mut batched = session();
    batched.open(base);
    batched.apply_change_batch(&[replace(12, 0, "((")], "fn main() { ((1 + 1; }");

    assert_eq!(sequential.current_markers(), batched.current_markers());
    assert_eq!(sequential.token_lines(), batched.token_lines());
    assert!(sequential.has_blocking_errors());
}

#[test]
fn test_tokens_for_simple_function() {
    let mut session = session();
    session.open("fn main() { 1 + 2; }");

    assert_eq!(
        session.tokens_for_line(0),
        &[
            Token::reset(0),
            Token::classified(3, HighlightScope::Identifier),
            Token::reset(7),
            Token::classified(12, HighlightScope::Integer),
            Token::reset(13),
            Token::classified(16, HighlightScope::Integer),
            Token::reset(17),
        ]
    );
}

#[test]
fn test_tokens_for_multi_line_string() {
    let mut session = session();
    let text = "fn main() {\n  let s = \"ab\ncd\";\n}";
    session.open(text);

    // the string opens on row 1 and closes on row 2
    let row1 = session.tokens_for_line(1);
    assert!(row1.contains(&Token::classified(10, HighlightScope::String)));
    assert_eq!(row1.last(), Some(&Token::reset(13)));

    assert_eq!(
        session.tokens_for_line(2),
        &[Token::classified(0, HighlightScope::String), Token::reset(3)]
    );

    // every line is sorted with unique columns
    for line in session.token_lines() {
        let starts: Vec<usize> = line.iter().map(|t| t.start_index).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(starts, sorted);
    }
}

#[test]
fn test_syntax_errors_produce_ordered_parser_markers() {
    let mut session = session();
    session.open("fn main() { (1 + 1; }");

    let markers = session.current_markers();
    assert!(!markers.is_empty());
    for window in markers.windows(2) {
        assert!(window[0].start <= window[1].start);
    }
    for marker in &markers {
        assert_eq!(marker.source, "parser");
        assert_eq!(marker.severity, Severity::Error);
        assert!(marker.code == "syntax" || marker.code == "missing");
    }
}

#[test]
fn test_blocking_error_gates_automatic_evaluation() {
    let mut session = session();
    let update = session.open("fn main() { 1 + 1; }");
    assert!(!session.has_blocking_errors());

    // the first debounced run goes through
    let token = timer_token(&update.commands);
    assert_eq!(
        session.timer_fired(token),
        vec![SessionCommand::Evaluate {
            source: "fn main() { 1 + 1; }".to_string()
        }]
    );
    session.evaluation_finished(Err(EngineError::Call("ignored".to_string())));

    // break the syntax: the timer fires but nothing runs
    let update = session.apply_change_batch(&[replace(12, 0, "(")], "fn main() { (1 + 1; }");
    assert!(session.has_blocking_errors());
    let token = timer_token(&update.commands);
    assert_eq!(session.timer_fired(token), Vec::new());

    // further typing while broken still does not evaluate
    let update = session.apply_change_batch(&[replace(13, 0, "(")], "fn main() { ((1 + 1; }");
    let token = timer_token(&update.commands);
    assert_eq!(session.timer_fired(token), Vec::new());

    // repair the syntax: the next quiet period evaluates the latest text
    let update = session.apply_change_batch(&[replace(12, 2, "")], "fn main() { 1 + 1; }");
    assert!(!session.has_blocking_errors());
    let token = timer_token(&update.commands);
    assert_eq!(
        session.timer_fired(token),
        vec![SessionCommand::Evaluate {
            source: "fn main() { 1 + 1; }".to_string()
        }]
    );
}

#[test]
fn test_incremental_edits_keep_tree_and_tokens_in_sync() {
    let mut session = session();
    session.open("fn main() { 1 + 1; }");

    // grow the first operand one digit at a time
    session.apply_change_batch(&[replace(13, 0, "2")], "fn main() { 12 + 1; }");
    session.apply_change_batch(&[replace(14, 0, "3")], "fn main() { 123 + 1; }");

    let tokens = session.tokens_for_line(0);
    assert!(tokens.contains(&Token::classified(12, HighlightScope::Integer)));
    assert!(tokens.contains(&Token::reset(15)));
    assert!(session.current_markers().is_empty());
}

struct OkEngine;

impl EvaluationEngine for OkEngine {
    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities::default()
    }

    fn evaluate(&mut self, _source: &str) -> Result<EvalResponse, EngineError> {
        decode_response(
            r#"{"status":"ok","data":{"value":"2","type_name":"int","duration_ms":0.002}}"#,
        )
    }
}

#[test]
fn test_manual_run_renders_engine_result() {
    let mut session = session();
    session.open("fn main() { 1 + 1; }");

    let mut engine = OkEngine;
    let commands = session.manual_run();
    let source = match commands.as_slice() {
        [SessionCommand::Evaluate { source }] => source.clone(),
        other => panic!("expected Evaluate, got {other:?}"),
    };
    assert_eq!(source, "fn main() { 1 + 1; }");

    let update = session.evaluation_finished(engine.evaluate(&source));
    assert_eq!(
        update.display,
        Some(ResultDisplay::Value {
            text: "2".to_string(),
            type_name: "int".to_string(),
            timing: "<0.01ms".to_string(),
        })
    );
    assert_eq!(update.markers, Some(Vec::new()));
}
