//! Core library for reading names and document IDs off scanned ID cards.
//!
//! This crate provides:
//! - A rule-based extractor turning raw OCR text into
//!   `{last name, first name, middle name, ID}`
//! - OCR providers (Google Cloud Vision, local PaddleOCR models, sidecar text files)
//! - A batch runner that keeps results in input order
//! - CSV/JSON result reports with timestamped file names

pub mod error;
pub mod extract;
pub mod models;
pub mod report;
#[cfg(feature = "native")]
pub mod batch;
#[cfg(feature = "native")]
pub mod ocr;

pub use error::{BatchError, ConfigError, ExtractionError, NameIdError, OcrError, ReportError, Result};
pub use extract::{ExtractionDetails, NameIdExtractor, extract_name_id};
pub use models::config::NameIdConfig;
pub use models::document::OcrDocument;
pub use models::record::{ExtractedId, NameIdRecord, NameRecord, ResultRow};
pub use report::ReportFormat;

#[cfg(feature = "native")]
pub use batch::{BatchRunner, ErrorPolicy};
#[cfg(feature = "native")]
pub use ocr::{OcrProvider, create_provider};

/// Extract name and ID fields from the OCR text of one document.
///
/// Never fails: text without a recognizable name line yields an all-empty record.
pub fn extract(text: &str) -> NameIdRecord {
    extract_name_id(text)
}
