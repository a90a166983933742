//! Legacy breakpoint-preserving formatter.
//!
//! Before guarded sections, breakpoint positions were kept stable by bucketing the document into
//! line sections around the breakpoint lines, formatting each section's range independently, and
//! stitching the outputs back together. Each section costs a *separate* full-document
//! format-and-slice call, so this is strictly less efficient than the unified diff/patch
//! pipeline in [`crate::engine`], which subsumes it. Kept for hosts that still rely on
//! per-section stitching.

use crate::backend::{BackendError, FormatResult, FormatterBackend, FormatterOptions};
use crate::document::{Document, DocumentError};
use crate::engine::CancellationToken;
use crate::regions::Region;
use thiserror::Error;

/// A contiguous run of lines, inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSection {
    /// First line of the section.
    pub start_line: usize,
    /// Last line of the section, inclusive.
    pub end_line: usize,
}

/// Errors produced by [`format_with_breakpoints`].
#[derive(Debug, Error)]
pub enum SectionizerError {
    /// The formatter backend failed for one of the sections.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A section boundary no longer resolves in the document.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Partition `0..line_count` into sections; each breakpoint line starts a new section.
///
/// Breakpoints are deduplicated, sorted, and clamped to the line space; out-of-range entries are
/// ignored. With no (in-range) breakpoints the whole document is a single section. A zero-line
/// document yields no sections.
pub fn sections(line_count: usize, breakpoints: &[usize]) -> Vec<LineSection> {
    if line_count == 0 {
        return Vec::new();
    }

    let mut starts: Vec<usize> = breakpoints
        .iter()
        .copied()
        .filter(|&line| line > 0 && line < line_count)
        .collect();
    starts.sort_unstable();
    starts.dedup();

    let mut out = Vec::with_capacity(starts.len() + 1);
    let mut start = 0;
    for next in starts {
        out.push(LineSection {
            start_line: start,
            end_line: next - 1,
        });
        start = next;
    }
    out.push(LineSection {
        start_line: start,
        end_line: line_count - 1,
    });
    out
}

/// Format each section independently and stitch the outputs back together.
///
/// For every section a full-document format is requested with that section's character range as
/// the only formattable region; the section's slice of the output is then cut out using the
/// unchanged-prefix/suffix lengths the backend's region guarantee provides. The concatenation of
/// all slices is the stitched result. The document itself is not mutated.
pub fn format_with_breakpoints(
    document: &Document,
    breakpoints: &[usize],
    backend: &dyn FormatterBackend,
    options: &FormatterOptions,
    cancel: &CancellationToken,
) -> Result<String, SectionizerError> {
    let text = document.text();
    let total_chars = document.len_chars();
    let mut out = String::with_capacity(text.len());

    for section in sections(document.line_count(), breakpoints) {
        let start = document.line_to_offset(section.start_line)?;
        let end = document.line_to_offset(section.end_line + 1)?;
        if start >= end {
            // The final empty line after a trailing newline carries no text.
            continue;
        }

        let formatted = match backend.format(
            &text,
            &[Region::new(start, end - 1)],
            options,
            cancel,
        )? {
            FormatResult::Unchanged => {
                out.push_str(&document.text_between(start, end)?);
                continue;
            }
            FormatResult::Formatted(full) => full,
        };

        // Text outside the region is untouched, so the prefix/suffix lengths carry over into
        // the formatted output and bracket this section's slice.
        let suffix_chars = total_chars - end;
        let formatted_chars = formatted.chars().count();
        let slice_end = formatted_chars.saturating_sub(suffix_chars).max(start);
        out.push_str(&char_slice(&formatted, start, slice_end));
    }

    Ok(out)
}

/// Slice a string by character offsets.
fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}
