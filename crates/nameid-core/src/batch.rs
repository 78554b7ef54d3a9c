//! Batch processing: one OCR round-trip per image, rows in input order.

use std::path::PathBuf;
use std::pin::pin;
use std::time::Instant;

use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::BatchError;
use crate::extract::NameIdExtractor;
use crate::models::config::BatchConfig;
use crate::models::record::ResultRow;
use crate::ocr::OcrProvider;

/// What to do when an image cannot be recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop the batch at the first failure.
    #[default]
    Abort,
    /// Record an empty row carrying the error and keep going.
    Continue,
}

/// Runs OCR and extraction over a list of images.
pub struct BatchRunner {
    provider: Box<dyn OcrProvider>,
    extractor: NameIdExtractor,
    concurrency: usize,
    policy: ErrorPolicy,
}

impl BatchRunner {
    /// Create a runner processing one image at a time and aborting on failure.
    pub fn new(provider: Box<dyn OcrProvider>, extractor: NameIdExtractor) -> Self {
        Self {
            provider,
            extractor,
            concurrency: 1,
            policy: ErrorPolicy::Abort,
        }
    }

    /// Set the number of OCR requests in flight.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the failure policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Apply concurrency and failure policy from configuration.
    pub fn with_config(self, config: &BatchConfig) -> Self {
        let policy = if config.continue_on_error {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Abort
        };
        self.with_concurrency(config.concurrency)
            .with_error_policy(policy)
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Process all images and return one row per image, in input order.
    pub async fn run(&self, paths: &[PathBuf]) -> Result<Vec<ResultRow>, BatchError> {
        self.run_with(paths, |_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_row` with each row as soon as it
    /// is final. Rows are reported in input order.
    pub async fn run_with<F>(
        &self,
        paths: &[PathBuf],
        mut on_row: F,
    ) -> Result<Vec<ResultRow>, BatchError>
    where
        F: FnMut(usize, &ResultRow),
    {
        let start = Instant::now();
        let provider = self.provider.as_ref();

        info!(
            "Processing {} images with {} provider ({} concurrent)",
            paths.len(),
            provider.name(),
            self.concurrency
        );

        let mut recognized = pin!(
            stream::iter(paths.iter().enumerate())
                .map(|(index, path)| async move { (index, path, provider.recognize(path).await) })
                .buffered(self.concurrency)
        );

        let mut rows = Vec::with_capacity(paths.len());

        while let Some((index, path, result)) = recognized.next().await {
            let row = match result {
                Ok(document) => {
                    if document.is_blank() {
                        warn!("No text recognized in {}", path.display());
                    }
                    let details = self.extractor.extract_detailed(&document.text);
                    debug!(
                        "{}: {} lines, name line {:?}, ID line {:?}",
                        path.display(),
                        details.line_count,
                        details.name_line,
                        details.id_line
                    );
                    ResultRow::for_path(path, details.record)
                }
                Err(source) => match self.policy {
                    ErrorPolicy::Abort => {
                        return Err(BatchError::Image {
                            path: path.clone(),
                            source,
                        });
                    }
                    ErrorPolicy::Continue => {
                        warn!("Failed to process {}: {}", path.display(), source);
                        ResultRow::failed(path, source.to_string())
                    }
                },
            };

            on_row(index, &row);
            rows.push(row);
        }

        info!(
            "Processed {} images in {}ms",
            rows.len(),
            start.elapsed().as_millis()
        );

        Ok(rows)
    }
}
