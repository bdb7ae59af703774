//! Byte-oriented line index.
//!
//! Rope-backed conversion between absolute byte offsets and row / byte-column
//! positions, plus per-line byte lengths for token derivation. Byte-oriented
//! because both the parse tree and the editor surface speak byte offsets.

use crate::delta::Position;
use ropey::Rope;

/// Line index over the current document text.
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an index over an empty document.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build an index from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count (an empty document has one line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total byte length of the document.
    pub fn byte_len(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Byte length of a line, excluding its line terminator.
    ///
    /// Out-of-range lines report length 0.
    pub fn line_byte_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }

        let slice = self.rope.line(line);
        let mut len = slice.len_bytes();
        let mut chars = slice.chars_at(slice.len_chars());
        if let Some('\n') = chars.prev() {
            len -= 1;
            if let Some('\r') = chars.prev() {
                len -= 1;
            }
        }
        len
    }

    /// Byte lengths for every line, in order.
    pub fn line_byte_lengths(&self) -> Vec<usize> {
        (0..self.line_count())
            .map(|line| self.line_byte_len(line))
            .collect()
    }

    /// Convert an absolute byte offset into a row / byte-column position.
    ///
    /// Offsets past the end of the document clamp to the final position.
    pub fn byte_to_position(&self, byte: usize) -> Position {
        let byte = byte.min(self.rope.len_bytes());
        let row = self.rope.byte_to_line(byte);
        let line_start = self.rope.line_to_byte(row);
        Position::new(row, byte - line_start)
    }

    /// Convert a row / byte-column position into an absolute byte offset.
    ///
    /// Rows past the end clamp to the document length; columns clamp to the
    /// line's byte length.
    pub fn position_to_byte(&self, position: Position) -> usize {
        if position.row >= self.rope.len_lines() {
            return self.rope.len_bytes();
        }

        let line_start = self.rope.line_to_byte(position.row);
        line_start + position.column.min(self.line_byte_len(position.row))
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}
