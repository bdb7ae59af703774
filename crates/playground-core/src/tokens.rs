//! Highlight tokens and the node-kind → scope mapping.

use std::collections::BTreeMap;

/// The fixed set of highlight classifications.
///
/// Each maps to a distinct presentation scope; spans outside any classification
/// render with [`DEFAULT_SCOPE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HighlightScope {
    /// Line comments.
    Comment,
    /// Boolean literals.
    Boolean,
    /// Integer literals.
    Integer,
    /// Float literals.
    Float,
    /// String literals.
    String,
    /// Byte-string literals.
    ByteString,
    /// Formatted-string literals.
    FormatString,
    /// Plain identifiers.
    Identifier,
    /// Quoted identifiers.
    QuotedIdentifier,
    /// Type references.
    TypeReference,
}

/// The presentation scope applied outside any classified span.
pub const DEFAULT_SCOPE: &str = "source";

impl HighlightScope {
    /// The presentation scope string for this classification.
    pub fn presentation(&self) -> &'static str {
        match self {
            Self::Comment => "comment.line",
            Self::Boolean => "constant.language.boolean",
            Self::Integer => "constant.numeric.integer",
            Self::Float => "constant.numeric.float",
            Self::String => "string.quoted.double",
            Self::ByteString => "string.quoted.double.bytes",
            Self::FormatString => "string.quoted.double.format",
            Self::Identifier => "variable.other",
            Self::QuotedIdentifier => "variable.other.quoted",
            Self::TypeReference => "entity.name.type",
        }
    }
}

/// A highlight token within one line.
///
/// `scope == None` restores [`DEFAULT_SCOPE`] from this column onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Byte offset within the line where this token starts.
    pub start_index: usize,
    /// Classification starting at `start_index`, or `None` for the default scope.
    pub scope: Option<HighlightScope>,
}

impl Token {
    /// A token opening a classified span.
    pub fn classified(start_index: usize, scope: HighlightScope) -> Self {
        Self {
            start_index,
            scope: Some(scope),
        }
    }

    /// A token restoring the default scope.
    pub fn reset(start_index: usize) -> Self {
        Self {
            start_index,
            scope: None,
        }
    }

    /// The presentation scope string in effect from this token onward.
    pub fn presentation(&self) -> &'static str {
        self.scope.map_or(DEFAULT_SCOPE, |s| s.presentation())
    }
}

/// Mapping from parse-tree node kinds to highlight classifications.
#[derive(Debug, Clone, Default)]
pub struct ScopeMap {
    map: BTreeMap<String, HighlightScope>,
}

impl ScopeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a set of node kind → scope entries.
    pub fn with_entries<const N: usize>(mut self, entries: [(&str, HighlightScope); N]) -> Self {
        for (kind, scope) in entries {
            self.map.insert(kind.to_string(), scope);
        }
        self
    }

    /// Add a single node kind → scope entry.
    pub fn insert(&mut self, kind: impl Into<String>, scope: HighlightScope) {
        self.map.insert(kind.into(), scope);
    }

    /// Look up the classification for a node kind.
    pub fn get(&self, kind: &str) -> Option<HighlightScope> {
        self.map.get(kind).copied()
    }

    /// Number of mapped node kinds.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
