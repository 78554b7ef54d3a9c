//! Provider reading text that was recognized ahead of time.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use crate::error::OcrError;
use crate::models::document::OcrDocument;

use super::OcrProvider;

/// Reads `<image stem>.<extension>` next to each image.
///
/// Lets previously recognized text be re-run through extraction without
/// another OCR round-trip.
#[derive(Debug, Clone)]
pub struct SidecarTextProvider {
    extension: String,
}

impl SidecarTextProvider {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Path of the text file holding the image's OCR output.
    pub fn sidecar_path(&self, image: &Path) -> PathBuf {
        image.with_extension(&self.extension)
    }
}

impl Default for SidecarTextProvider {
    fn default() -> Self {
        Self::new("txt")
    }
}

#[async_trait]
impl OcrProvider for SidecarTextProvider {
    fn name(&self) -> &str {
        "sidecar"
    }

    async fn recognize(&self, path: &Path) -> Result<OcrDocument, OcrError> {
        let start = Instant::now();
        let sidecar = self.sidecar_path(path);

        let text = tokio::fs::read_to_string(&sidecar)
            .await
            .map_err(|source| OcrError::Io {
                path: sidecar.clone(),
                source,
            })?;

        debug!("Read {} characters from {}", text.len(), sidecar.display());

        Ok(OcrDocument::new(text)
            .with_source(path)
            .with_provider(self.name())
            .with_processing_time(start.elapsed().as_millis() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path() {
        let provider = SidecarTextProvider::default();
        assert_eq!(
            provider.sidecar_path(Path::new("scans/card.png")),
            PathBuf::from("scans/card.txt")
        );
    }

    #[tokio::test]
    async fn test_recognize_reads_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("card.jpg");
        std::fs::write(&image, b"").unwrap();
        std::fs::write(dir.path().join("card.txt"), "Doe, John\nN1234567\n").unwrap();

        let doc = SidecarTextProvider::default().recognize(&image).await.unwrap();
        assert_eq!(doc.text, "Doe, John\nN1234567\n");
        assert_eq!(doc.provider.as_deref(), Some("sidecar"));
        assert_eq!(doc.source.as_deref(), Some(image.as_path()));
    }

    #[tokio::test]
    async fn test_missing_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let result = SidecarTextProvider::default()
            .recognize(&dir.path().join("card.png"))
            .await;
        assert!(matches!(result, Err(OcrError::Io { .. })));
    }
}
