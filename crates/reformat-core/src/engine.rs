//! The formatting request pipeline.
//!
//! One request runs single-threaded and synchronous: snapshot guarded sections, compute the
//! formattable regions, invoke the backend, diff its output against the original text, and
//! replay the hunks onto the live document. The backend call may be expensive and can run off
//! the document-owning thread; everything that mutates the document happens behind the caller's
//! exclusive `&mut Document` access.
//!
//! Up to the point hunks begin applying, failure and cancellation are all-or-nothing: the
//! document has not been touched.

use crate::backend::{BackendError, FormatResult, FormatterBackend, FormatterOptions};
use crate::diff::diff;
use crate::document::Document;
use crate::patch::apply_hunks;
use crate::regions::{ChangeSet, GuardedSectionProvider, formattable_regions};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Cooperative cancellation for a formatting request.
///
/// Clones share the same flag. The engine checks the token before invoking the backend and again
/// before any document mutation; backends should poll it during long runs.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Irreversible for this token and all its clones.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`CancellationToken::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Errors surfaced by [`format_document`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReformatError {
    /// The formatter backend failed; the document was not mutated.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The request was cancelled before any document mutation.
    #[error("formatting was cancelled")]
    Cancelled,
}

/// Run one formatting request against a live document.
///
/// `changes` names the regions to reformat; `None` means the whole document. Returns `Ok(true)`
/// iff the document text changed. An empty formattable region set (everything guarded, or an
/// empty document) is a successful no-op, not an error.
///
/// No retries happen anywhere in the engine; every failure is surfaced synchronously.
pub fn format_document(
    document: &mut Document,
    changes: Option<&ChangeSet>,
    guards: &dyn GuardedSectionProvider,
    backend: &dyn FormatterBackend,
    options: &FormatterOptions,
    cancel: &CancellationToken,
) -> Result<bool, ReformatError> {
    let guarded = guards.guarded_sections(document);
    let regions = formattable_regions(changes, &guarded, document.len_chars());
    if regions.is_empty() {
        tracing::debug!(backend = backend.id(), "no formattable regions, nothing to do");
        return Ok(false);
    }

    if cancel.is_cancelled() {
        return Err(ReformatError::Cancelled);
    }

    let original = document.text();
    let formatted = match backend.format(&original, &regions, options, cancel)? {
        FormatResult::Unchanged => {
            tracing::debug!(backend = backend.id(), "backend reports document unchanged");
            return Ok(false);
        }
        FormatResult::Formatted(text) => text,
    };

    // The backend may have observed cancellation and returned early; nothing has been mutated
    // yet, so this is the last point the request can still be abandoned cleanly.
    if cancel.is_cancelled() {
        return Err(ReformatError::Cancelled);
    }

    let hunks = diff(&original, &formatted);
    if hunks.is_empty() {
        return Ok(false);
    }

    tracing::debug!(
        backend = backend.id(),
        regions = regions.len(),
        hunks = hunks.len(),
        "applying formatter output"
    );
    Ok(apply_hunks(document, &hunks))
}
