//! Raw OCR output for one image.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Recognized text of one document image.
///
/// `text` holds the full recognized text with embedded line breaks and may
/// be empty when the provider found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrDocument {
    /// Full recognized text.
    pub text: String,

    /// Image the text was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Name of the provider that produced the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Time spent recognizing, in milliseconds.
    pub processing_time_ms: u64,
}

impl OcrDocument {
    /// Create a document from text alone.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_processing_time(mut self, ms: u64) -> Self {
        self.processing_time_ms = ms;
        self
    }

    /// True if the provider returned no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}').is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(OcrDocument::default().is_blank());
        assert!(OcrDocument::new(" \r\n\u{feff}\t").is_blank());
        assert!(!OcrDocument::new("Doe, John").is_blank());
    }
}
