//! Name and ID extraction from OCR text.

mod parser;
pub mod rules;

pub use parser::{ExtractionDetails, NameIdExtractor, extract_name_id};

/// Split OCR text into trimmed, non-empty lines.
///
/// Handles both LF and CRLF line endings; blank lines are dropped and the
/// input order is kept. A byte order mark counts as whitespace.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(|line| line.trim_matches(is_blank_char))
        .filter(|line| !line.is_empty())
        .collect()
}

fn is_blank_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lines_mixed_endings() {
        let text = "  DRIVER LICENSE \r\n\r\nDoe, John\n   \n\tN123456\r\n";
        assert_eq!(
            normalize_lines(text),
            vec!["DRIVER LICENSE", "Doe, John", "N123456"]
        );
    }

    #[test]
    fn test_normalize_lines_empty() {
        assert!(normalize_lines("").is_empty());
        assert!(normalize_lines("\n\r\n  \n").is_empty());
    }

    #[test]
    fn test_normalize_lines_byte_order_mark() {
        let text = "\u{feff}Doe, John\r\n\u{feff}\r\nN123456 \u{feff}";
        assert_eq!(normalize_lines(text), vec!["Doe, John", "N123456"]);
    }
}
