//! OCR providers turning document images into text.

mod local;
mod sidecar;
mod vision;

pub use local::LocalOcrProvider;
pub use sidecar::SidecarTextProvider;
pub use vision::{VisionAuth, VisionCredentials, VisionProvider};

use std::path::Path;

use async_trait::async_trait;
use image::ImageFormat;

use crate::error::OcrError;
use crate::models::config::{OcrConfig, ProviderKind};
use crate::models::document::OcrDocument;

/// Source of recognized text for document images.
///
/// Implementations are called once per image and must not depend on the
/// order in which images are submitted.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Short provider name for logs and document metadata.
    fn name(&self) -> &str;

    /// Recognize the text of one image.
    async fn recognize(&self, path: &Path) -> Result<OcrDocument, OcrError>;
}

/// Build the provider selected in configuration.
pub fn create_provider(config: &OcrConfig) -> Result<Box<dyn OcrProvider>, OcrError> {
    match config.provider {
        ProviderKind::Vision => {
            let path = config.credentials_path.as_deref().ok_or_else(|| {
                OcrError::Credentials {
                    path: Default::default(),
                    reason: "no credentials file configured".to_string(),
                }
            })?;
            Ok(Box::new(VisionProvider::from_credentials_file(path, config)?))
        }
        ProviderKind::Local => Ok(Box::new(LocalOcrProvider::from_dir(&config.model_dir)?)),
        ProviderKind::Sidecar => Ok(Box::new(SidecarTextProvider::new(
            config.sidecar_extension.clone(),
        ))),
    }
}

/// Read an image file and check that it is in a format we can submit.
pub async fn read_image(path: &Path) -> Result<(Vec<u8>, ImageFormat), OcrError> {
    if !path.exists() {
        return Err(OcrError::ImageNotFound(path.to_path_buf()));
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| OcrError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let format = check_image_format(path, &bytes)?;
    Ok((bytes, format))
}

/// Sniff the image format from its bytes.
pub fn check_image_format(path: &Path, bytes: &[u8]) -> Result<ImageFormat, OcrError> {
    let format = image::guess_format(bytes).map_err(|e| OcrError::UnsupportedImage {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match format {
        ImageFormat::Png
        | ImageFormat::Jpeg
        | ImageFormat::Gif
        | ImageFormat::WebP
        | ImageFormat::Tiff
        | ImageFormat::Bmp => Ok(format),
        other => Err(OcrError::UnsupportedImage {
            path: path.to_path_buf(),
            reason: format!("{:?} images are not supported", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn test_check_image_format() {
        let path = Path::new("card.png");
        assert_eq!(check_image_format(path, PNG_MAGIC).unwrap(), ImageFormat::Png);
        assert!(matches!(
            check_image_format(path, b"plain text, not an image"),
            Err(OcrError::UnsupportedImage { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_missing_image() {
        let result = read_image(Path::new("/definitely/not/here.png")).await;
        assert!(matches!(result, Err(OcrError::ImageNotFound(_))));
    }

    #[test]
    fn test_vision_requires_credentials() {
        let config = OcrConfig::default();
        assert!(matches!(
            create_provider(&config),
            Err(OcrError::Credentials { .. })
        ));
    }

    #[test]
    fn test_create_sidecar_provider() {
        let config = OcrConfig {
            provider: ProviderKind::Sidecar,
            ..OcrConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "sidecar");
    }
}
