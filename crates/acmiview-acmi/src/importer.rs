//! Whole-buffer import on top of [`AcmiParser`].

use crate::parser::{AcmiParser, ParsedReplay};
use acmiview_core::config::{AppConfig, ClassificationConfig};
use acmiview_core::{ImportError, ReferencePoint};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};

/// Imports ACMI text against a fixed reference point and classification rules.
#[derive(Debug, Clone)]
pub struct AcmiImporter {
    reference: ReferencePoint,
    rules: ClassificationConfig,
}

impl AcmiImporter {
    pub fn new(reference: ReferencePoint, rules: ClassificationConfig) -> Self {
        Self { reference, rules }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.reference, config.classification.clone())
    }

    pub fn reference(&self) -> &ReferencePoint {
        &self.reference
    }

    pub fn parser(&self) -> AcmiParser {
        AcmiParser::new(self.reference, self.rules.clone())
    }

    /// Parses a complete document.
    ///
    /// Either every record that could be read ends up in the returned registry, or a
    /// fatal [`ImportError`] is returned and nothing is kept.
    pub fn import(&self, text: &str) -> Result<ParsedReplay, ImportError> {
        self.run(text, None)
    }

    /// Like [`import`](Self::import), but gives up with [`ImportError::Cancelled`] if
    /// `cancel` is set when the next time frame is reached.
    pub fn import_cancellable(
        &self,
        text: &str,
        cancel: &AtomicBool,
    ) -> Result<ParsedReplay, ImportError> {
        self.run(text, Some(cancel))
    }

    fn run(&self, text: &str, cancel: Option<&AtomicBool>) -> Result<ParsedReplay, ImportError> {
        let mut parser = self.parser();

        let fed = text
            .lines()
            .enumerate()
            .try_for_each(|(index, line)| {
                let cancelled = cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));
                if cancelled && line.trim_start().starts_with('#') {
                    return Err(ImportError::Cancelled {
                        line_number: index + 1,
                    });
                }
                parser.feed_line(line)
            });
        let result = fed.and_then(|()| parser.finish());

        match &result {
            Ok(replay) => info!(
                entities = replay.registry.len(),
                samples = replay.report.samples,
                skipped = replay.report.skipped_lines(),
                "Import finished"
            ),
            Err(err) => error!(error = %err, header = err.is_header_error(), "Import failed"),
        }
        result
    }
}

impl Default for AcmiImporter {
    fn default() -> Self {
        Self::new(ReferencePoint::default(), ClassificationConfig::default())
    }
}
