//! Per-import statistics and skipped record warnings.

use acmiview_core::RecordError;
use serde::Serialize;
use std::fmt;

/// A line that was skipped and why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordWarning {
    /// 1-based line number in the input
    pub line_number: usize,
    pub line: String,
    pub error: RecordError,
}

impl fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.error)
    }
}

/// What an import did with its input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub lines_read: usize,
    pub frames: usize,
    pub entity_lines: usize,
    pub entities_created: usize,
    /// Entities dropped at the end because they never got a sample
    pub entities_discarded: usize,
    pub samples: usize,
    /// `T=` updates seen before any valid time frame
    pub untimed_updates: usize,
    pub warnings: Vec<RecordWarning>,
}

impl ImportReport {
    pub fn skipped_lines(&self) -> usize {
        self.warnings.len()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub(crate) fn warn(&mut self, line_number: usize, line: &str, error: RecordError) {
        tracing::warn!(line_number, error = %error, "Skipping record");
        self.warnings.push(RecordWarning {
            line_number,
            line: line.to_string(),
            error,
        });
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines, {} frames, {} entities ({} discarded), {} samples, {} skipped",
            self.lines_read,
            self.frames,
            self.entities_created.saturating_sub(self.entities_discarded),
            self.entities_discarded,
            self.samples,
            self.skipped_lines()
        )
    }
}
