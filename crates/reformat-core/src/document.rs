//! Mutable, line-addressable document buffer.
//!
//! [`Document`] is the engine's view of the host editor's text buffer: a rope-backed character
//! sequence with O(log n) line/offset conversion and in-place editing. The host hands the engine
//! exclusive write access (`&mut Document`) for the duration of one patch application, which is
//! what makes a hunk sequence atomically visible to concurrent readers.
//!
//! All offsets are character offsets; lines and offsets are 0-indexed. Unlike a clamping editor
//! buffer, out-of-range accesses here return [`DocumentError`]: the patch applier must detect a
//! stale anchor and abort rather than silently edit the wrong place.

use ropey::Rope;
use thiserror::Error;

/// Errors produced by [`Document`] accessors and mutators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A line number past the end of the document was addressed.
    #[error("line {line} out of bounds (document has {line_count} lines)")]
    LineOutOfBounds {
        /// The requested 0-based line number.
        line: usize,
        /// The document's current line count.
        line_count: usize,
    },

    /// A character offset past the end of the document was addressed.
    #[error("offset {offset} out of bounds (document length {len})")]
    OffsetOutOfBounds {
        /// The requested character offset.
        offset: usize,
        /// The document's current length in characters.
        len: usize,
    },

    /// A character range extends past the end of the document.
    #[error("range {start}..{end} out of bounds (document length {len})")]
    RangeOutOfBounds {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
        /// The document's current length in characters.
        len: usize,
    },
}

/// A mutable text buffer with line-addressable access.
///
/// Backed by a [`ropey::Rope`], so line/offset conversion and editing stay O(log n) even for
/// large documents.
#[derive(Debug, Clone)]
pub struct Document {
    rope: Rope,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a document from its initial text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Full document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Document length in characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the document contains no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of lines.
    ///
    /// A trailing newline yields a final empty line, matching rope semantics; an empty document
    /// has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Character offset of the start of `line`.
    ///
    /// `line == line_count()` is accepted and resolves to the end of the document, so a hunk may
    /// anchor one past the last line (e.g. an append).
    pub fn line_to_offset(&self, line: usize) -> Result<usize, DocumentError> {
        let line_count = self.rope.len_lines();
        if line < line_count {
            Ok(self.rope.line_to_char(line))
        } else if line == line_count {
            Ok(self.rope.len_chars())
        } else {
            Err(DocumentError::LineOutOfBounds { line, line_count })
        }
    }

    /// Line containing the character at `offset`.
    ///
    /// `offset == len_chars()` resolves to the last line.
    pub fn offset_to_line(&self, offset: usize) -> Result<usize, DocumentError> {
        let len = self.rope.len_chars();
        if offset > len {
            return Err(DocumentError::OffsetOutOfBounds { offset, len });
        }
        Ok(self.rope.char_to_line(offset))
    }

    /// Insert `text` at character `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), DocumentError> {
        let len = self.rope.len_chars();
        if offset > len {
            return Err(DocumentError::OffsetOutOfBounds { offset, len });
        }
        self.rope.insert(offset, text);
        Ok(())
    }

    /// Remove `len` characters starting at character `offset`.
    pub fn remove(&mut self, offset: usize, len: usize) -> Result<(), DocumentError> {
        let total = self.rope.len_chars();
        let end = offset.saturating_add(len);
        if offset > total || end > total {
            return Err(DocumentError::RangeOutOfBounds {
                start: offset,
                end,
                len: total,
            });
        }
        if len > 0 {
            self.rope.remove(offset..end);
        }
        Ok(())
    }

    /// Text of the half-open character range `start..end`.
    pub fn text_between(&self, start: usize, end: usize) -> Result<String, DocumentError> {
        let len = self.rope.len_chars();
        if start > end || end > len {
            return Err(DocumentError::RangeOutOfBounds { start, end, len });
        }
        Ok(self.rope.slice(start..end).to_string())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}
