//! Error types for the nameid-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the nameid library.
#[derive(Error, Debug)]
pub enum NameIdError {
    /// OCR provider error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Batch processing error.
    #[error("batch error: {0}")]
    Batch(#[from] BatchError),

    /// Extractor configuration error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Result report error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by OCR providers.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Credentials file is missing, unreadable, or holds no usable secret.
    #[error("invalid credentials in {path}: {reason}")]
    Credentials { path: PathBuf, reason: String },

    /// The image file does not exist.
    #[error("image not found: {0}")]
    ImageNotFound(PathBuf),

    /// The file is not an image format the providers accept.
    #[error("unsupported image {path}: {reason}")]
    UnsupportedImage { path: PathBuf, reason: String },

    /// HTTP transport failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The OCR service answered with an error.
    #[error("service error {code}: {message}")]
    Service { code: i32, message: String },

    /// The OCR service answered with something we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Failed to load local OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Local text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Reading an input file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors in extractor configuration.
///
/// Extraction itself never fails; only building an extractor from
/// user-supplied settings can.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The ID prefix is empty or contains characters removed by line sanitizing.
    #[error("invalid ID prefix {0:?}: must be non-empty ASCII letters or digits")]
    InvalidPrefix(String),

    /// The digit range of the ID pattern is empty.
    #[error("invalid ID digit range {min}..={max}")]
    InvalidDigitRange { min: usize, max: usize },

    /// The assembled pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(String),
}

/// Errors raised while processing a batch of images.
#[derive(Error, Debug)]
pub enum BatchError {
    /// An image failed under the abort policy.
    #[error("failed to process {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: OcrError,
    },
}

/// Errors raised while writing result reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting has an unusable value.
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Result type for the nameid library.
pub type Result<T> = std::result::Result<T, NameIdError>;
