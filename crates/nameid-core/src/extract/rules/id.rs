//! Document ID extraction.
//!
//! OCR output around ID numbers is noisy (stray punctuation, soft hyphens,
//! spaces between digit groups), so every line is reduced to its ASCII
//! letters and digits before the pattern is applied.

use regex::Regex;

use super::patterns::DOCUMENT_ID;
use super::{ExtractionMatch, FieldExtractor};
use crate::error::ExtractionError;

/// Document ID field extractor.
#[derive(Debug, Clone)]
pub struct IdExtractor {
    pattern: Regex,
}

impl IdExtractor {
    /// Create an extractor for the default `N` + 6-9 digits pattern.
    pub fn new() -> Self {
        Self {
            pattern: DOCUMENT_ID.clone(),
        }
    }

    /// Create an extractor for `prefix` followed by `min_digits..=max_digits` digits.
    pub fn with_pattern(
        prefix: &str,
        min_digits: usize,
        max_digits: usize,
    ) -> Result<Self, ExtractionError> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ExtractionError::InvalidPrefix(prefix.to_string()));
        }
        if min_digits == 0 || min_digits > max_digits {
            return Err(ExtractionError::InvalidDigitRange {
                min: min_digits,
                max: max_digits,
            });
        }

        let pattern = Regex::new(&format!(
            "(?i){}[0-9]{{{},{}}}",
            regex::escape(prefix),
            min_digits,
            max_digits
        ))
        .map_err(|e| ExtractionError::Pattern(e.to_string()))?;

        Ok(Self { pattern })
    }

    /// Find the first ID on a single line, after sanitizing it.
    pub fn find_in_line(&self, line: &str) -> Option<String> {
        let sanitized = sanitize_line(line);
        self.pattern
            .find(&sanitized)
            .map(|m| m.as_str().to_string())
    }
}

impl Default for IdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IdExtractor {
    type Output = String;

    fn extract_lines(&self, lines: &[&str]) -> Option<ExtractionMatch<String>> {
        lines.iter().enumerate().find_map(|(i, line)| {
            self.find_in_line(line)
                .map(|id| ExtractionMatch::new(id, i, *line))
        })
    }
}

/// Drop every character that is not an ASCII letter or digit.
pub fn sanitize_line(line: &str) -> String {
    line.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
