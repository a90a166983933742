//! Formatter backend contract.
//!
//! A backend is an opaque text-to-text transformation supplied by an external formatter
//! (a pretty-printer library, a language-specific formatter, a style tool). The engine hands it
//! the full document text plus the regions it may touch; the backend returns the full
//! reformatted text, a sentinel meaning "no change", or a classified error.
//!
//! Backends guarantee they will not alter text outside the supplied regions. The engine depends
//! on that guarantee but does not verify it.

use crate::engine::CancellationToken;
use crate::regions::Region;
use std::collections::BTreeMap;
use thiserror::Error;

/// Options handed to a formatter backend.
///
/// Only `indent_width` and `line_width` are universally meaningful; everything
/// formatter-specific travels in `extra` as opaque key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterOptions {
    /// Indentation width in spaces.
    pub indent_width: usize,
    /// Preferred maximum line width.
    pub line_width: usize,
    /// Named configuration profile to load, if the backend supports profiles.
    pub profile: Option<String>,
    /// Formatter-specific settings (dialect, style variant, ...), opaque to the engine.
    pub extra: BTreeMap<String, String>,
}

impl FormatterOptions {
    /// Create options with the default indent width (4) and line width (120).
    pub fn new() -> Self {
        Self {
            indent_width: 4,
            line_width: 120,
            profile: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set the indentation width.
    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Set the preferred maximum line width.
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    /// Select a named configuration profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Add a formatter-specific setting.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Successful outcome of a backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatResult {
    /// The full reformatted document text.
    Formatted(String),
    /// The backend determined the document is already formatted.
    Unchanged,
}

/// Classified backend failures.
///
/// Callers pattern-match on the variant: a [`BackendError::FormattingFailed`] is a property of
/// the input (e.g. a syntax error), the other two are configuration problems to surface as
/// user-facing diagnostics, not to retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The input could not be formatted (typically a syntax error in the source).
    #[error("formatting failed: {message}")]
    FormattingFailed {
        /// Backend-supplied failure description.
        message: String,
    },

    /// The backend configuration is invalid.
    #[error("formatter configuration invalid: {message}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        message: String,
    },

    /// The requested configuration profile does not exist.
    #[error("formatter profile '{profile}' not found")]
    ProfileNotFound {
        /// The profile name that failed to resolve.
        profile: String,
    },
}

/// An external formatter.
///
/// `format` may run off the document-owning thread; it receives plain text, not the document.
/// A long-running backend should poll `cancel` and return promptly when cancellation is
/// requested ([`FormatResult::Unchanged`] is fine); the engine re-checks the token before any
/// document mutation and reports cancellation itself.
pub trait FormatterBackend {
    /// Stable identifier for registry lookup (e.g. `"json"`).
    fn id(&self) -> &str;

    /// Reformat `source`, touching only the given regions.
    ///
    /// `regions` is non-empty, disjoint, and ordered ascending; offsets are inclusive character
    /// offsets into `source`.
    fn format(
        &self,
        source: &str,
        regions: &[Region],
        options: &FormatterOptions,
        cancel: &CancellationToken,
    ) -> Result<FormatResult, BackendError>;
}

/// An injectable id-to-backend map.
///
/// Hosts build one registry per configuration scope and pass it (or a backend looked up from it)
/// into the engine at call time; there is no process-wide registry.
#[derive(Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Box<dyn FormatterBackend>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            backends: BTreeMap::new(),
        }
    }

    /// Register a backend under its [`FormatterBackend::id`].
    ///
    /// A later registration with the same id replaces the earlier one.
    pub fn register(&mut self, backend: Box<dyn FormatterBackend>) {
        self.backends.insert(backend.id().to_string(), backend);
    }

    /// Look up a backend by id.
    pub fn get(&self, id: &str) -> Option<&dyn FormatterBackend> {
        self.backends.get(id).map(|b| b.as_ref())
    }

    /// Registered backend ids, in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Returns `true` if no backend is registered.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("ids", &self.backends.keys().collect::<Vec<_>>())
            .finish()
    }
}
