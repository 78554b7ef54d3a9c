//! Line-based field rules for ID documents.

pub mod id;
pub mod name;
pub mod patterns;

pub use id::{IdExtractor, sanitize_line};
pub use name::{NameExtractor, split_name};
pub use patterns::*;

use super::normalize_lines;

/// Trait for field extractors working over normalized lines.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Find the field on the first line that carries it.
    fn extract_lines(&self, lines: &[&str]) -> Option<ExtractionMatch<Self::Output>>;

    /// Find the field in raw text.
    fn extract(&self, text: &str) -> Option<ExtractionMatch<Self::Output>> {
        self.extract_lines(&normalize_lines(text))
    }
}

/// A field value together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the line in the normalized line sequence.
    pub line: usize,
    /// Line text the value came from.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, line: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            line,
            source: source.into(),
        }
    }

    /// Shift the line index, for matches found in a sub-slice of lines.
    pub fn offset(mut self, by: usize) -> Self {
        self.line += by;
        self
    }
}
