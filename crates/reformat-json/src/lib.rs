#![warn(missing_docs)]
//! A whole-document JSON formatter backend for `reformat-core`.
//!
//! Parses the document with `serde_json` (insertion order preserved, so formatting never
//! reorders object keys) and re-emits it pretty-printed with the indent width from
//! [`FormatterOptions`]. Output always ends with a single trailing newline.
//!
//! JSON cannot be reformatted one sub-range at a time, so this backend only accepts a region
//! set covering the entire document; anything narrower is reported as
//! [`BackendError::ConfigInvalid`] rather than silently rewriting text it was told not to
//! touch. Pair it with documents that have no guarded sections.

use reformat_core::{
    BackendError, CancellationToken, FormatResult, FormatterBackend, FormatterOptions, Region,
};
use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;

/// JSON formatter backend, registered under the id `"json"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }
}

fn covers_whole_document(source: &str, regions: &[Region]) -> bool {
    let total = source.chars().count();
    if total == 0 {
        return true;
    }
    regions.len() == 1 && regions[0].start == 0 && regions[0].end == total - 1
}

impl FormatterBackend for JsonFormatter {
    fn id(&self) -> &str {
        "json"
    }

    fn format(
        &self,
        source: &str,
        regions: &[Region],
        options: &FormatterOptions,
        cancel: &CancellationToken,
    ) -> Result<FormatResult, BackendError> {
        if cancel.is_cancelled() {
            return Ok(FormatResult::Unchanged);
        }
        if let Some(profile) = &options.profile {
            return Err(BackendError::ProfileNotFound {
                profile: profile.clone(),
            });
        }
        if !covers_whole_document(source, regions) {
            return Err(BackendError::ConfigInvalid {
                message: "the JSON backend formats whole documents only".to_string(),
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(source).map_err(|err| BackendError::FormattingFailed {
                message: err.to_string(),
            })?;

        let indent = " ".repeat(options.indent_width);
        let mut buf = Vec::with_capacity(source.len());
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
        value
            .serialize(&mut serializer)
            .map_err(|err| BackendError::FormattingFailed {
                message: err.to_string(),
            })?;
        let mut out =
            String::from_utf8(buf).map_err(|err| BackendError::FormattingFailed {
                message: err.to_string(),
            })?;
        out.push('\n');

        if out == source {
            Ok(FormatResult::Unchanged)
        } else {
            Ok(FormatResult::Formatted(out))
        }
    }
}
