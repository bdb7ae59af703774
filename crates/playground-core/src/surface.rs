//! Editor-surface boundary types.
//!
//! The external editor surface is a collaborator, not part of this crate: it emits
//! batched [`ContentChange`] events when the user types and accepts a flat marker
//! list for diagnostic display. Everything here is expressed in zero-based rows and
//! byte columns so it lines up with the parse tree's coordinates.

use crate::delta::Position;
use crate::diagnostics::Severity;

/// The rectangular region replaced by a single change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRange {
    /// Start line (0-based).
    pub start_line: usize,
    /// Start byte column on the start line.
    pub start_col: usize,
    /// End line (0-based, inclusive coordinate of the replaced region's end).
    pub end_line: usize,
    /// End byte column on the end line.
    pub end_col: usize,
}

impl ChangeRange {
    /// Create a change range from start/end coordinates.
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// The range's start as a [`Position`].
    pub fn start(&self) -> Position {
        Position::new(self.start_line, self.start_col)
    }

    /// The range's end as a [`Position`].
    pub fn end(&self) -> Position {
        Position::new(self.end_line, self.end_col)
    }
}

/// A single text-change event as delivered by the editor surface.
///
/// A batch of these arrives per edit; entries within one batch are non-overlapping
/// but may arrive in any order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    /// Byte offset of the replaced region's start.
    pub range_offset: usize,
    /// Byte length of the replaced region (0 for a pure insertion).
    pub range_length: usize,
    /// The inserted text (empty for a pure deletion).
    pub text: String,
    /// The replaced region in row/column coordinates.
    pub range: ChangeRange,
}

/// A diagnostic marker in the editor surface's schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Marker start position.
    pub start: Position,
    /// Marker end position.
    pub end: Position,
    /// Human-readable message.
    pub message: String,
    /// Marker severity.
    pub severity: Severity,
    /// Stable diagnostic code (e.g. `"syntax"`, `"missing"`).
    pub code: String,
    /// Which subsystem produced the marker (e.g. `"parser"`, `"engine"`).
    pub source: String,
}

/// A sink that renders markers.
///
/// Each call fully replaces the marker set previously published under `owner`;
/// markers published under other owner tags are unaffected.
pub trait MarkerSink {
    /// Replace the marker set tagged with `owner`.
    fn set_markers(&mut self, owner: &str, markers: Vec<Marker>);
}
