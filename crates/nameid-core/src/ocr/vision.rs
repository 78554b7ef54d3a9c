//! Google Cloud Vision text detection over the REST API.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;
use crate::models::document::OcrDocument;

use super::{OcrProvider, read_image};

/// Credentials file contents.
///
/// The file is JSON holding either an API key or a ready-made OAuth access
/// token; minting tokens from service accounts is left to external tooling.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisionCredentials {
    pub api_key: Option<String>,
    pub access_token: Option<String>,
}

/// How requests are authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisionAuth {
    /// Sent as the `key` query parameter.
    ApiKey(String),
    /// Sent as a bearer token.
    AccessToken(String),
}

impl VisionCredentials {
    /// Load credentials from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, OcrError> {
        let content = std::fs::read_to_string(path).map_err(|e| OcrError::Credentials {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| OcrError::Credentials {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Pick the authentication method, preferring the API key.
    pub fn into_auth(self, path: &Path) -> Result<VisionAuth, OcrError> {
        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(self.api_key) {
            Ok(VisionAuth::ApiKey(key))
        } else if let Some(token) = non_empty(self.access_token) {
            Ok(VisionAuth::AccessToken(token))
        } else {
            Err(OcrError::Credentials {
                path: path.to_path_buf(),
                reason: "expected an \"api_key\" or \"access_token\" field".to_string(),
            })
        }
    }
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_context: Option<ImageContext>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageContext {
    language_hints: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

/// OCR provider backed by Google Cloud Vision `TEXT_DETECTION`.
pub struct VisionProvider {
    client: Client,
    endpoint: String,
    auth: VisionAuth,
    language_hints: Vec<String>,
}

impl VisionProvider {
    /// Create a provider with explicit authentication.
    pub fn new(auth: VisionAuth, config: &OcrConfig) -> Result<Self, OcrError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            auth,
            language_hints: config.language_hints.clone(),
        })
    }

    /// Create a provider from a credentials file.
    pub fn from_credentials_file(path: &Path, config: &OcrConfig) -> Result<Self, OcrError> {
        let auth = VisionCredentials::from_file(path)?.into_auth(path)?;
        info!("Using Google Cloud Vision at {}", config.endpoint);
        Self::new(auth, config)
    }

    async fn annotate(&self, bytes: &[u8]) -> Result<String, OcrError> {
        let body = build_request(bytes, &self.language_hints);

        let request = self.client.post(&self.endpoint).json(&body);
        let request = match &self.auth {
            VisionAuth::ApiKey(key) => request.query(&[("key", key)]),
            VisionAuth::AccessToken(token) => request.bearer_auth(token),
        };

        let response = request
            .send()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OcrError::Service {
                code: i32::from(status.as_u16()),
                message,
            });
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| OcrError::InvalidResponse(e.to_string()))?;

        parse_response(parsed)
    }
}

#[async_trait]
impl OcrProvider for VisionProvider {
    fn name(&self) -> &str {
        "vision"
    }

    async fn recognize(&self, path: &Path) -> Result<OcrDocument, OcrError> {
        let start = Instant::now();
        let (bytes, format) = read_image(path).await?;

        debug!("Submitting {} ({:?}, {} bytes)", path.display(), format, bytes.len());

        let text = self.annotate(&bytes).await?;
        let elapsed = start.elapsed().as_millis() as u64;

        debug!("Vision returned {} characters in {}ms", text.len(), elapsed);

        Ok(OcrDocument::new(text)
            .with_source(path)
            .with_provider(self.name())
            .with_processing_time(elapsed))
    }
}

fn build_request(bytes: &[u8], language_hints: &[String]) -> AnnotateRequest {
    let image_context = if language_hints.is_empty() {
        None
    } else {
        Some(ImageContext {
            language_hints: language_hints.to_vec(),
        })
    };

    AnnotateRequest {
        requests: vec![ImageRequest {
            image: ImageContent {
                content: STANDARD.encode(bytes),
            },
            features: vec![Feature {
                kind: "TEXT_DETECTION",
            }],
            image_context,
        }],
    }
}

/// Pull the full text out of an annotate response.
///
/// A response without a text annotation means the image holds no text and
/// yields an empty string.
fn parse_response(response: AnnotateResponse) -> Result<String, OcrError> {
    let first = response.responses.into_iter().next().unwrap_or_default();

    if let Some(status) = first.error {
        return Err(OcrError::Service {
            code: status.code,
            message: status.message,
        });
    }

    Ok(first
        .full_text_annotation
        .map(|annotation| annotation.text)
        .unwrap_or_default())
}
