//! Edit translation.
//!
//! Converts a batch of raw [`ContentChange`] events from the editor surface into
//! tree-mutation [`EditDelta`]s, ordered by byte offset. The deltas use the
//! coordinate system the parse tree expects: byte offsets plus zero-based
//! row / byte-column positions.

use crate::surface::ContentChange;

/// A zero-based row / byte-column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Line number (0-based).
    pub row: usize,
    /// Byte column within the line (0-based).
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// A single tree-mutation delta.
///
/// Describes one text replacement in both byte offsets and row/column positions,
/// ready to be recorded into the current parse tree ahead of an incremental
/// re-parse. Within one batch, deltas are applied in ascending `start_byte` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditDelta {
    /// Byte offset of the replaced region's start.
    pub start_byte: usize,
    /// Exclusive byte end of the replaced region in the old text.
    pub old_end_byte: usize,
    /// Exclusive byte end of the inserted text in the new text.
    pub new_end_byte: usize,
    /// Start position of the replaced region.
    pub start_position: Position,
    /// End position of the replaced region in the old text.
    pub old_end_position: Position,
    /// End position of the inserted text in the new text.
    pub new_end_position: Position,
}

/// Compute the position just past `text` when it is inserted at `start`.
///
/// A single-line insertion ends on the same row, `text.len()` bytes after the
/// start column. A multi-line insertion ends on
/// `start.row + (line count - 1)`, at a column equal to the byte length of the
/// inserted text's final line; the remaining original lines play no part.
pub fn end_position_after(start: Position, text: &str) -> Position {
    let mut end = start;
    let mut parts = text.split('\n');
    let Some(first) = parts.next() else {
        return end;
    };

    end.column = end.column.saturating_add(first.len());
    for part in parts {
        end.row = end.row.saturating_add(1);
        end.column = part.len();
    }

    end
}

/// Translate a change batch into [`EditDelta`]s sorted by `start_byte`.
pub fn translate_changes(changes: &[ContentChange]) -> Vec<EditDelta> {
    let mut ordered: Vec<&ContentChange> = changes.iter().collect();
    ordered.sort_by_key(|change| change.range_offset);

    ordered
        .into_iter()
        .map(|change| EditDelta {
            start_byte: change.range_offset,
            old_end_byte: change.range_offset.saturating_add(change.range_length),
            new_end_byte: change.range_offset.saturating_add(change.text.len()),
            start_position: change.range.start(),
            old_end_position: change.range.end(),
            new_end_position: end_position_after(change.range.start(), &change.text),
        })
        .collect()
}
