//! Offline OCR with PaddleOCR models through `pure-onnx-ocr`.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use image::GenericImageView;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::document::OcrDocument;

use super::{OcrProvider, read_image};

/// Lines whose top edges are closer than this (in pixels) share a row.
const ROW_HEIGHT: f32 = 20.0;

/// OCR provider running PaddleOCR models locally (pure Rust, no external runtime).
///
/// Inference runs on tokio's blocking pool so other in-flight requests keep
/// making progress.
pub struct LocalOcrProvider {
    engine: Arc<Mutex<pure_onnx_ocr::engine::OcrEngine>>,
}

/// One recognized text region, positioned by its top-left corner.
struct TextRegion {
    text: String,
    x: f32,
    y: f32,
}

impl LocalOcrProvider {
    /// Create a provider from model files in a directory.
    pub fn from_dir(model_dir: &Path) -> Result<Self, OcrError> {
        let det_path = model_dir.join("det.onnx");
        let rec_path = model_dir.join("latin_rec.onnx");
        let dict_path = model_dir.join("latin_dict.txt");

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "missing model file {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded local OCR models from {}", model_dir.display());

        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
        })
    }
}

fn recognize_image(
    engine: &Mutex<pure_onnx_ocr::engine::OcrEngine>,
    image: &image::DynamicImage,
) -> Result<String, OcrError> {
    let (width, height) = image.dimensions();
    debug!("Running local OCR on {}x{} image", width, height);

    let engine = engine
        .lock()
        .map_err(|_| OcrError::Recognition("OCR engine lock poisoned".to_string()))?;

    let results = engine
        .run_from_image(image)
        .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

    let regions = results
        .iter()
        .map(|r| {
            let (x, y) = top_left(&r.bounding_box);
            TextRegion {
                text: r.text.replace("[UNK]", " "),
                x,
                y,
            }
        })
        .collect();

    Ok(join_in_reading_order(regions))
}

#[async_trait]
impl OcrProvider for LocalOcrProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn recognize(&self, path: &Path) -> Result<OcrDocument, OcrError> {
        let start = Instant::now();
        let (bytes, format) = read_image(path).await?;

        let image = image::load_from_memory_with_format(&bytes, format).map_err(|e| {
            OcrError::UnsupportedImage {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        let engine = Arc::clone(&self.engine);
        let text = run_blocking(move || recognize_image(&engine, &image)).await?;
        let elapsed = start.elapsed().as_millis() as u64;

        debug!("Local OCR read {} characters in {}ms", text.len(), elapsed);

        Ok(OcrDocument::new(text)
            .with_source(path)
            .with_provider(self.name())
            .with_processing_time(elapsed))
    }
}

/// Run CPU-bound recognition off the async workers.
async fn run_blocking<F>(task: F) -> Result<String, OcrError>
where
    F: FnOnce() -> Result<String, OcrError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| OcrError::Recognition(format!("OCR task failed: {}", e)))?
}

/// Top-left corner of a detected polygon.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}

/// Sort regions top-to-bottom, left-to-right and join them with newlines.
fn join_in_reading_order(mut regions: Vec<TextRegion>) -> String {
    regions.sort_by(|a, b| {
        let row_a = (a.y / ROW_HEIGHT) as i32;
        let row_b = (b.y / ROW_HEIGHT) as i32;
        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        }
    });

    regions
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
