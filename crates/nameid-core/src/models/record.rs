//! Extracted name/ID records and result rows.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Document identifier; empty when none was found.
pub type ExtractedId = String;

/// Person name split into its parts. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameRecord {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
}

impl NameRecord {
    /// True if no part of the name was found.
    pub fn is_empty(&self) -> bool {
        self.last_name.is_empty() && self.first_name.is_empty() && self.middle_name.is_empty()
    }
}

/// Fields extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameIdRecord {
    /// Surname (text before the comma on the name line).
    pub last_name: String,

    /// First given name.
    pub first_name: String,

    /// Second given name, if printed.
    pub middle_name: String,

    /// Document identifier.
    pub id: ExtractedId,
}

impl NameIdRecord {
    /// Combine a parsed name and an ID into one record.
    pub fn from_parts(name: NameRecord, id: ExtractedId) -> Self {
        Self {
            last_name: name.last_name,
            first_name: name.first_name,
            middle_name: name.middle_name,
            id,
        }
    }

    /// The name part of the record.
    pub fn name(&self) -> NameRecord {
        NameRecord {
            last_name: self.last_name.clone(),
            first_name: self.first_name.clone(),
            middle_name: self.middle_name.clone(),
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name().is_empty()
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// True if nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        !self.has_name() && !self.has_id()
    }
}

/// One output row: the source image and what was extracted from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    /// File name (without directories) of the source image.
    pub source_file: String,

    /// Extracted fields.
    #[serde(flatten)]
    pub record: NameIdRecord,

    /// Why the image could not be processed, when it failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultRow {
    pub fn new(source_file: impl Into<String>, record: NameIdRecord) -> Self {
        Self {
            source_file: source_file.into(),
            record,
            error: None,
        }
    }

    /// Build a row for an image path, keeping only its file name.
    pub fn for_path(path: &Path, record: NameIdRecord) -> Self {
        Self::new(file_name(path), record)
    }

    /// Row for an image that could not be processed; all fields empty.
    pub fn failed(path: &Path, error: impl Into<String>) -> Self {
        Self {
            source_file: file_name(path),
            record: NameIdRecord::default(),
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
