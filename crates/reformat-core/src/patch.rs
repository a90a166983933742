//! Replaying diff hunks onto a live document.
//!
//! Hunks are applied strictly in ascending `target_line` order. Because each hunk's net
//! line-count delta matches the diff bookkeeping exactly, translating `target_line` through
//! [`Document::line_to_offset`] against the *live, already-partially-patched* document resolves
//! every subsequent anchor correctly; no hunk is ever re-based against stale offsets.
//!
//! The caller must hold exclusive write access for the whole sequence (`&mut Document` enforces
//! this) so concurrent readers never observe a partially applied hunk list.

use crate::diff::DiffHunk;
use crate::document::{Document, DocumentError};

/// Apply `hunks` to `document`, in order.
///
/// Returns `true` iff at least one hunk was applied, i.e. the document text actually changed.
///
/// An out-of-range anchor (possible only if the document was mutated by another actor between
/// diff and patch) is fatal for the remaining sequence: further hunks are abandoned, the failure
/// is logged, and the best-effort changed state is returned. The document may then be partially
/// patched; recovering from that is the host's responsibility.
pub fn apply_hunks(document: &mut Document, hunks: &[DiffHunk]) -> bool {
    let mut changed = false;
    for hunk in hunks {
        if let Err(err) = apply_one(document, hunk) {
            tracing::error!(
                target_line = hunk.target_line(),
                error = %err,
                "aborting patch application; document may be partially patched"
            );
            break;
        }
        changed = true;
    }
    changed
}

fn apply_one(document: &mut Document, hunk: &DiffHunk) -> Result<(), DocumentError> {
    match hunk {
        DiffHunk::Insert {
            target_line,
            inserted,
        } => {
            let offset = document.line_to_offset(*target_line)?;
            document.insert(offset, inserted)
        }
        DiffHunk::Replace {
            target_line,
            removed,
            inserted,
        } => {
            let offset = document.line_to_offset(*target_line)?;
            document.remove(offset, removed.chars().count())?;
            document.insert(offset, inserted)
        }
        // Deletions anchor one line past their insertion-point counterpart: the deleted line
        // itself is being removed, not inserted before.
        DiffHunk::Delete {
            target_line,
            removed,
        } => {
            let offset = document.line_to_offset(target_line + 1)?;
            document.remove(offset, removed.chars().count())
        }
    }
}
