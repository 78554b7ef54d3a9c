//! Configuration structures for the extraction pipeline.
//!
//! Everything the driver needs (credentials location, OCR endpoint, output
//! directory) lives here and is passed in explicitly at startup.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::report::ReportFormat;

/// Main configuration for nameid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NameIdConfig {
    /// OCR provider configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Result output configuration.
    pub output: OutputConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,
}

/// Which OCR provider turns images into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Cloud Vision text detection.
    #[default]
    Vision,
    /// Local PaddleOCR models through pure-onnx-ocr.
    Local,
    /// Pre-recognized text stored next to each image.
    Sidecar,
}

impl ProviderKind {
    /// True if the provider needs a credentials file.
    pub fn needs_credentials(self) -> bool {
        matches!(self, ProviderKind::Vision)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Vision => write!(f, "vision"),
            ProviderKind::Local => write!(f, "local"),
            ProviderKind::Sidecar => write!(f, "sidecar"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vision" | "google" => Ok(ProviderKind::Vision),
            "local" | "onnx" => Ok(ProviderKind::Local),
            "sidecar" | "text" => Ok(ProviderKind::Sidecar),
            other => Err(format!(
                "unknown provider '{}' (expected vision, local or sidecar)",
                other
            )),
        }
    }
}

/// OCR provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Provider used for recognition.
    pub provider: ProviderKind,

    /// Credentials file for the Vision provider.
    pub credentials_path: Option<PathBuf>,

    /// Vision `images:annotate` endpoint.
    pub endpoint: String,

    /// Language hints sent with each Vision request.
    pub language_hints: Vec<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Directory with local OCR models (det.onnx, latin_rec.onnx, latin_dict.txt).
    pub model_dir: PathBuf,

    /// Extension of sidecar text files.
    pub sidecar_extension: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Vision,
            credentials_path: None,
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            language_hints: Vec::new(),
            timeout_secs: 30,
            model_dir: PathBuf::from("models"),
            sidecar_extension: "txt".to_string(),
        }
    }
}

/// Field extraction configuration.
///
/// The ID pattern is `<id_prefix>` followed by `id_min_digits..=id_max_digits`
/// digits, matched case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Letters that open a document ID.
    pub id_prefix: String,

    /// Minimum number of digits after the prefix.
    pub id_min_digits: usize,

    /// Maximum number of digits after the prefix.
    pub id_max_digits: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            id_prefix: "N".to_string(),
            id_min_digits: 6,
            id_max_digits: 9,
        }
    }
}

/// Result output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving results files.
    pub results_dir: PathBuf,

    /// Format of the results file.
    pub format: ReportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            format: ReportFormat::Csv,
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of OCR requests in flight at once.
    pub concurrency: usize,

    /// Keep going when an image fails, recording an empty row for it.
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            continue_on_error: false,
        }
    }
}

impl NameIdConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check settings that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "batch.concurrency".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.ocr.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "ocr.timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.extraction.id_min_digits == 0
            || self.extraction.id_min_digits > self.extraction.id_max_digits
        {
            return Err(ConfigError::Invalid {
                key: "extraction.id_min_digits".to_string(),
                reason: format!(
                    "digit range {}..={} is empty",
                    self.extraction.id_min_digits, self.extraction.id_max_digits
                ),
            });
        }
        Ok(())
    }

    /// Credentials file configured for the Vision provider.
    pub fn credentials_path(&self) -> Option<&Path> {
        self.ocr.credentials_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NameIdConfig::default();
        assert_eq!(config.ocr.provider, ProviderKind::Vision);
        assert_eq!(config.output.results_dir, PathBuf::from("results"));
        assert_eq!(config.extraction.id_prefix, "N");
        assert_eq!(config.batch.concurrency, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"ocr": {"provider": "sidecar"}, "batch": {"concurrency": 4}}"#)
            .unwrap();

        let config = NameIdConfig::from_file(&path).unwrap();
        assert_eq!(config.ocr.provider, ProviderKind::Sidecar);
        assert_eq!(config.ocr.sidecar_extension, "txt");
        assert_eq!(config.batch.concurrency, 4);
        assert!(!config.batch.continue_on_error);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = NameIdConfig::default();
        config.output.results_dir = PathBuf::from("out");
        config.save(&path).unwrap();

        let loaded = NameIdConfig::from_file(&path).unwrap();
        assert_eq!(loaded.output.results_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_credentials_path() {
        let mut config = NameIdConfig::default();
        assert_eq!(config.credentials_path(), None);

        config.ocr.credentials_path = Some(PathBuf::from("vision-key.json"));
        assert_eq!(config.credentials_path(), Some(Path::new("vision-key.json")));
    }

    #[test]
    fn test_invalid_concurrency_rejected() {
        let mut config = NameIdConfig::default();
        config.batch.concurrency = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("Vision".parse::<ProviderKind>(), Ok(ProviderKind::Vision));
        assert_eq!("sidecar".parse::<ProviderKind>(), Ok(ProviderKind::Sidecar));
        assert!("tesseract".parse::<ProviderKind>().is_err());
    }
}
