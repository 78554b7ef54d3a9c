//! "Last, First Middle" name line extraction.

use super::patterns::NAME_LINE;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::record::NameRecord;

/// Name line field extractor.
///
/// Matches the first line laid out as `Last, First` or `Last, First Middle`
/// and splits it into its parts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameExtractor;

impl NameExtractor {
    pub fn new() -> Self {
        Self
    }

    /// True if the line is laid out as a name line.
    pub fn is_name_line(&self, line: &str) -> bool {
        NAME_LINE.is_match(line)
    }
}

impl FieldExtractor for NameExtractor {
    type Output = NameRecord;

    fn extract_lines(&self, lines: &[&str]) -> Option<ExtractionMatch<NameRecord>> {
        lines
            .iter()
            .enumerate()
            .find(|(_, line)| self.is_name_line(line))
            .map(|(i, line)| ExtractionMatch::new(split_name(line), i, *line))
    }
}

/// Split `Last, First Middle` into its parts.
///
/// Only the first two tokens after the comma are used. Without a comma all
/// parts are empty.
pub fn split_name(full_name: &str) -> NameRecord {
    let Some((last, rest)) = full_name.split_once(',') else {
        return NameRecord::default();
    };

    let mut given = rest.split_whitespace();

    NameRecord {
        last_name: last.trim().to_string(),
        first_name: given.next().unwrap_or_default().to_string(),
        middle_name: given.next().unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn name(last: &str, first: &str, middle: &str) -> NameRecord {
        NameRecord {
            last_name: last.to_string(),
            first_name: first.to_string(),
            middle_name: middle.to_string(),
        }
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("Doe, John Michael"), name("Doe", "John", "Michael"));
        assert_eq!(split_name("Smith, Ann"), name("Smith", "Ann", ""));
        assert_eq!(split_name("Smith,Ann"), name("Smith", "Ann", ""));
        assert_eq!(split_name("Lee, Kim  Soo  Jin"), name("Lee", "Kim", "Soo"));
    }

    #[test]
    fn test_split_name_without_comma() {
        assert_eq!(split_name("John Doe"), NameRecord::default());
        assert_eq!(split_name(""), NameRecord::default());
    }

    #[test]
    fn test_first_name_line_wins() {
        let found = NameExtractor::new()
            .extract_lines(&["DRIVER LICENSE", "Doe, Jane", "Roe, Richard"])
            .unwrap();
        assert_eq!(found.value, name("Doe", "Jane", ""));
        assert_eq!(found.line, 1);
    }

    #[test]
    fn test_no_name_line() {
        assert!(NameExtractor::new().extract("CLASS C\nEXP 01/01/2030").is_none());
    }
}
