//! Common regex patterns for ID document extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Last, First" or "Last, First Middle" as printed on government IDs
    pub static ref NAME_LINE: Regex = Regex::new(
        r"^[A-Z][a-zA-Z'’-]+,\s*[A-Z][a-zA-Z'’-]+(?:\s+[A-Z][a-zA-Z'’-]*)?$"
    ).unwrap();

    // Document number: N followed by 6-9 digits, matched on sanitized lines
    pub static ref DOCUMENT_ID: Regex = Regex::new(
        r"(?i)N[0-9]{6,9}"
    ).unwrap();
}
