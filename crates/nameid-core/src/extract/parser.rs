//! Name/ID extractor combining the name and ID rules.

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::document::OcrDocument;
use crate::models::record::NameIdRecord;

use super::normalize_lines;
use super::rules::{FieldExtractor, IdExtractor, NameExtractor};

/// Extraction result with the lines the fields were read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionDetails {
    /// Extracted fields.
    pub record: NameIdRecord,
    /// Number of non-empty lines in the document.
    pub line_count: usize,
    /// Index of the name line among the non-empty lines.
    pub name_line: Option<usize>,
    /// Text of the name line.
    pub name_source: Option<String>,
    /// Index of the line the ID was found on.
    pub id_line: Option<usize>,
    /// Text of the ID line, before sanitizing.
    pub id_source: Option<String>,
}

/// Extracts `{last, first, middle, id}` from the OCR text of an ID document.
///
/// The first `Last, First [Middle]` line is taken as the name. The ID is
/// searched for only on the lines after it, so numbers printed above the
/// name (issuer codes, barcodes) never leak into the result. The extractor
/// holds no mutable state and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct NameIdExtractor {
    name: NameExtractor,
    id: IdExtractor,
}

impl NameIdExtractor {
    /// Create an extractor with the default `N` + 6-9 digits ID pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with the ID pattern from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        Ok(Self {
            name: NameExtractor::new(),
            id: IdExtractor::with_pattern(
                &config.id_prefix,
                config.id_min_digits,
                config.id_max_digits,
            )?,
        })
    }

    /// Extract fields from text. All fields are empty when nothing matches.
    pub fn extract(&self, text: &str) -> NameIdRecord {
        self.extract_detailed(text).record
    }

    /// Extract fields from an OCR document.
    pub fn extract_document(&self, document: &OcrDocument) -> NameIdRecord {
        self.extract(&document.text)
    }

    /// Extract fields and report which lines they came from.
    pub fn extract_detailed(&self, text: &str) -> ExtractionDetails {
        let lines = normalize_lines(text);

        let Some(name) = self.name.extract_lines(&lines) else {
            debug!("No name line among {} lines", lines.len());
            return ExtractionDetails {
                line_count: lines.len(),
                ..ExtractionDetails::default()
            };
        };

        let after_name = name.line + 1;
        let id = self
            .id
            .extract_lines(&lines[after_name..])
            .map(|m| m.offset(after_name));

        debug!(
            "Name on line {}, ID {}",
            name.line,
            id.as_ref()
                .map(|m| format!("on line {}", m.line))
                .unwrap_or_else(|| "not found".to_string())
        );

        let (id_value, id_line, id_source) = match id {
            Some(m) => (m.value, Some(m.line), Some(m.source)),
            None => (String::new(), None, None),
        };

        ExtractionDetails {
            record: NameIdRecord::from_parts(name.value, id_value),
            line_count: lines.len(),
            name_line: Some(name.line),
            name_source: Some(name.source),
            id_line,
            id_source,
        }
    }
}

/// Extract name and ID with the default extractor.
pub fn extract_name_id(text: &str) -> NameIdRecord {
    NameIdExtractor::new().extract(text)
}
