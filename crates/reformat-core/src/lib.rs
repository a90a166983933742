#![warn(missing_docs)]
//! Reformat Core - Guard-Aware Incremental Reformatting Engine
//!
//! # Overview
//!
//! `reformat-core` sits between an editor host and pluggable external formatters. External
//! formatters always return the *entire* document text, even when only a sub-range was
//! requested; naively replacing the whole buffer would destroy caret positions, markers, and
//! guarded (read-only) regions. This engine instead:
//!
//! 1. clips the requested edit regions against the host's guarded sections, producing the
//!    disjoint set of regions the formatter may touch,
//! 2. hands the full text and those regions to the formatter backend,
//! 3. diffs the returned text against the original, line by line, and
//! 4. replays the resulting hunks onto the live document, so untouched text is never rewritten.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Request Pipeline (engine)                  │  ← Public entry point
//! ├─────────────────────────────────────────────┤
//! │  Patch Applier (patch)                      │  ← Live-document mutation
//! ├─────────────────────────────────────────────┤
//! │  Line Diff (diff)                           │  ← Hunk computation
//! ├─────────────────────────────────────────────┤
//! │  Region/Interval Algebra (regions)          │  ← Guard subtraction
//! ├─────────────────────────────────────────────┤
//! │  Document Buffer (document, rope-based)     │  ← Line/offset addressing
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Formatter backends ([`FormatterBackend`]) and guarded-section providers
//! ([`GuardedSectionProvider`]) are external collaborators supplied by the host.
//!
//! # Quick Start
//!
//! ```rust
//! use reformat_core::{
//!     BackendError, CancellationToken, Document, FormatResult, FormatterBackend,
//!     FormatterOptions, NoGuards, Region, format_document,
//! };
//!
//! /// A toy backend that collapses runs of spaces.
//! struct SquashSpaces;
//!
//! impl FormatterBackend for SquashSpaces {
//!     fn id(&self) -> &str {
//!         "squash-spaces"
//!     }
//!
//!     fn format(
//!         &self,
//!         source: &str,
//!         _regions: &[Region],
//!         _options: &FormatterOptions,
//!         _cancel: &CancellationToken,
//!     ) -> Result<FormatResult, BackendError> {
//!         let mut out = String::with_capacity(source.len());
//!         let mut in_spaces = false;
//!         for c in source.chars() {
//!             if c == ' ' {
//!                 if !in_spaces {
//!                     out.push(c);
//!                 }
//!                 in_spaces = true;
//!             } else {
//!                 out.push(c);
//!                 in_spaces = false;
//!             }
//!         }
//!         Ok(FormatResult::Formatted(out))
//!     }
//! }
//!
//! let mut doc = Document::from_text("let  x =   1;\n");
//! let changed = format_document(
//!     &mut doc,
//!     None,
//!     &NoGuards,
//!     &SquashSpaces,
//!     &FormatterOptions::new(),
//!     &CancellationToken::new(),
//! )
//! .unwrap();
//!
//! assert!(changed);
//! assert_eq!(doc.text(), "let x = 1;\n");
//! ```
//!
//! # Module Description
//!
//! - [`document`] - rope-backed, line-addressable document buffer
//! - [`regions`] - region/interval algebra over guarded sections
//! - [`diff`] - line-level Myers diff producing ordered hunks
//! - [`patch`] - ascending-order hunk replay onto the live document
//! - [`backend`] - formatter backend contract, options, and registry
//! - [`engine`] - the per-request pipeline and cancellation
//! - [`sectionizer`] - legacy breakpoint-preserving formatter (superseded)
//!
//! # Concurrency Model
//!
//! One request is a single-threaded, synchronous pipeline. The backend call may be performed off
//! the document-owning thread, but patch application requires the exclusive `&mut Document` the
//! host hands in, so a concurrent reader never observes a partial hunk sequence. Cancellation is
//! all-or-nothing up to the point hunks begin applying.

pub mod backend;
pub mod diff;
pub mod document;
pub mod engine;
pub mod patch;
pub mod regions;
pub mod sectionizer;

pub use backend::{
    BackendError, BackendRegistry, FormatResult, FormatterBackend, FormatterOptions,
};
pub use diff::{DiffHunk, diff};
pub use document::{Document, DocumentError};
pub use engine::{CancellationToken, ReformatError, format_document};
pub use patch::apply_hunks;
pub use regions::{
    ChangeSet, ChangeSetError, GuardedSection, GuardedSectionProvider, NoGuards, Region, clip,
    formattable_regions,
};
pub use sectionizer::{LineSection, SectionizerError, format_with_breakpoints, sections};
