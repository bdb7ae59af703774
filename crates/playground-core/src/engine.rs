//! The evaluation-engine boundary.
//!
//! The engine is an external collaborator that evaluates source text and
//! optionally answers hover and completion lookups. Capabilities are
//! advertised explicitly through [`EngineCapabilities`] instead of being
//! probed by method name. Responses travel as JSON and decode into the typed
//! [`EvalResponse`] here.

use crate::diagnostics::{Diagnostic, Span};
use serde::{Deserialize, Serialize};

/// Errors produced at the engine boundary.
#[derive(Debug)]
pub enum EngineError {
    /// The engine call itself failed (rejected, crashed, unavailable).
    Call(String),
    /// The engine answered with a payload that does not match the protocol.
    Protocol(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call(msg) => write!(f, "engine call failed: {msg}"),
            Self::Protocol(msg) => write!(f, "engine protocol error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Optional capabilities an engine advertises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineCapabilities {
    /// Whether [`EvaluationEngine::hover_at`] is implemented.
    pub hover: bool,
    /// Whether [`EvaluationEngine::completions_at`] is implemented.
    pub completions: bool,
}

/// A successful evaluation's payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalSuccess {
    /// Rendered result value.
    pub value: String,
    /// Name of the result's type.
    pub type_name: String,
    /// Wall-clock evaluation time in milliseconds.
    pub duration_ms: f64,
}

/// A failed evaluation's payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalFailure {
    /// Engine-sourced diagnostics describing the failure.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

/// An evaluation response, as returned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EvalResponse {
    /// Evaluation succeeded.
    Ok {
        /// The success payload.
        data: EvalSuccess,
    },
    /// Evaluation failed with diagnostics.
    Error {
        /// The failure payload.
        error: EvalFailure,
    },
}

/// Decode a JSON evaluation response.
pub fn decode_response(json: &str) -> Result<EvalResponse, EngineError> {
    serde_json::from_str(json).map_err(|err| EngineError::Protocol(err.to_string()))
}

/// A hover lookup's payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hover {
    /// Hover text.
    pub contents: String,
    /// The byte span the hover applies to, when known.
    #[serde(default)]
    pub span: Option<Span>,
}

/// One completion item as returned by the engine.
///
/// All fields are optional on the wire; [`map_completion_item`] normalizes
/// them into a [`CompletionSuggestion`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionItem {
    /// Display label.
    pub label: Option<String>,
    /// Item kind name (e.g. `"function"`).
    pub kind: Option<String>,
    /// Short detail line.
    pub detail: Option<String>,
    /// Longer documentation.
    pub documentation: Option<String>,
    /// Text to insert, when different from the label.
    pub insert_text: Option<String>,
    /// Whether `insert_text` uses snippet placeholder syntax.
    pub is_snippet: bool,
}

/// Normalized completion kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// Callable items.
    Function,
    /// Bindings in scope.
    Variable,
    /// Language keywords.
    Keyword,
    /// Snippet expansions.
    Snippet,
    /// Anything else.
    Text,
}

impl CompletionKind {
    fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "function" => Self::Function,
            "variable" => Self::Variable,
            "keyword" => Self::Keyword,
            "snippet" => Self::Snippet,
            _ => Self::Text,
        }
    }
}

/// A completion item normalized for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSuggestion {
    /// Display label.
    pub label: String,
    /// Normalized kind.
    pub kind: CompletionKind,
    /// Short detail line, falling back to the documentation.
    pub detail: Option<String>,
    /// Longer documentation.
    pub documentation: Option<String>,
    /// Text to insert on accept.
    pub insert_text: String,
    /// Whether `insert_text` uses snippet placeholder syntax.
    pub as_snippet: bool,
}

/// Normalize a wire completion item.
///
/// The insert text falls back to the label; the label falls back to the
/// insert text; an unknown or absent kind becomes [`CompletionKind::Text`].
pub fn map_completion_item(item: &CompletionItem) -> CompletionSuggestion {
    let insert_text = item
        .insert_text
        .clone()
        .or_else(|| item.label.clone())
        .unwrap_or_default();
    let label = item.label.clone().unwrap_or_else(|| insert_text.clone());
    let kind = item
        .kind
        .as_deref()
        .map_or(CompletionKind::Text, CompletionKind::from_name);

    CompletionSuggestion {
        label,
        kind,
        detail: item.detail.clone().or_else(|| item.documentation.clone()),
        documentation: item.documentation.clone(),
        insert_text,
        as_snippet: item.is_snippet,
    }
}

/// Format an evaluation duration for display.
///
/// Durations below 0.01 ms display as `<0.01ms`.
pub fn format_duration_ms(duration_ms: f64) -> String {
    if duration_ms < 0.01 {
        "<0.01ms".to_string()
    } else {
        format!("{duration_ms:.2}ms")
    }
}

/// The external evaluation engine.
///
/// All operations may fail; callers at the session boundary turn failures
/// into "no data" (hover, completions) or a rendered failure message
/// (evaluate) rather than propagating them.
pub trait EvaluationEngine {
    /// Which optional operations this engine supports.
    fn capabilities(&self) -> EngineCapabilities;

    /// Evaluate the full source text.
    fn evaluate(&mut self, source: &str) -> Result<EvalResponse, EngineError>;

    /// Hover lookup at a byte offset. Only called when advertised.
    fn hover_at(&mut self, source: &str, byte_offset: usize) -> Result<Option<Hover>, EngineError> {
        let _ = (source, byte_offset);
        Ok(None)
    }

    /// Completion lookup at a byte offset. Only called when advertised.
    fn completions_at(
        &mut self,
        source: &str,
        byte_offset: usize,
    ) -> Result<Vec<CompletionItem>, EngineError> {
        let _ = (source, byte_offset);
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    #[test]
    fn test_decode_ok_response() {
        let json = r#"{"status":"ok","data":{"value":"2","type_name":"int","duration_ms":0.003}}"#;
        let response = decode_response(json).unwrap();
        match response {
            EvalResponse::Ok { data } => {
                assert_eq!(data.value, "2");
                assert_eq!(data.type_name, "int");
                assert!(data.duration_ms < 0.01);
            }
            other => panic!("expected ok, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_error_response() {
        let json = r#"{
            "status": "error",
            "error": {
                "diagnostics": [
                    {"message": "unknown name", "severity": "error", "span": {"start": 0, "end": 3}}
                ]
            }
        }"#;
        let response = decode_response(json).unwrap();
        match response {
            EvalResponse::Error { error } => {
                assert_eq!(error.diagnostics.len(), 1);
                assert_eq!(error.diagnostics[0].severity, Severity::Error);
                assert_eq!(error.diagnostics[0].span, Span::new(0, 3));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_malformed_payload() {
        assert!(matches!(
            decode_response(r#"{"status":"maybe"}"#),
            Err(EngineError::Protocol(_))
        ));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(0.0001), "<0.01ms");
        assert_eq!(format_duration_ms(0.009), "<0.01ms");
        assert_eq!(format_duration_ms(0.01), "0.01ms");
        assert_eq!(format_duration_ms(12.3456), "12.35ms");
    }

    #[test]
    fn test_map_completion_item_fallbacks() {
        let item = CompletionItem {
            insert_text: Some("print(${1})".to_string()),
            kind: Some("Snippet".to_string()),
            is_snippet: true,
            ..CompletionItem::default()
        };
        let suggestion = map_completion_item(&item);
        assert_eq!(suggestion.label, "print(${1})");
        assert_eq!(suggestion.kind, CompletionKind::Snippet);
        assert!(suggestion.as_snippet);

        let item = CompletionItem {
            label: Some("count".to_string()),
            kind: Some("weird".to_string()),
            documentation: Some("a binding".to_string()),
            ..CompletionItem::default()
        };
        let suggestion = map_completion_item(&item);
        assert_eq!(suggestion.insert_text, "count");
        assert_eq!(suggestion.kind, CompletionKind::Text);
        assert_eq!(suggestion.detail.as_deref(), Some("a binding"));
    }
}
