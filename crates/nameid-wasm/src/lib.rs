//! WASM bindings for name/ID extraction.
//!
//! OCR happens elsewhere (in the browser or a service); these bindings take
//! the recognized text and return the structured record.

use wasm_bindgen::prelude::*;

use nameid_core::extract::NameIdExtractor as CoreExtractor;
use nameid_core::models::config::ExtractionConfig;
use nameid_core::models::record::{NameIdRecord, ResultRow};
use nameid_core::report::{self, ReportFormat};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract `{lastName, firstName, middleName, id}` from OCR text.
#[wasm_bindgen]
pub fn extract(text: &str) -> Result<JsValue, JsValue> {
    to_js(&nameid_core::extract(text))
}

/// Build the CSV results table from `[{file, text}, ...]`.
///
/// Rows follow the input order and the header row comes first.
#[wasm_bindgen(js_name = buildResultsCsv)]
pub fn build_results_csv(documents: JsValue) -> Result<String, JsValue> {
    #[derive(serde::Deserialize)]
    struct Document {
        file: String,
        #[serde(default)]
        text: String,
    }

    let documents: Vec<Document> = serde_wasm_bindgen::from_value(documents)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let extractor = CoreExtractor::new();
    let rows: Vec<ResultRow> = documents
        .iter()
        .map(|doc| ResultRow::new(doc.file.clone(), extractor.extract(&doc.text)))
        .collect();

    report::render(&rows, ReportFormat::Csv).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extractor with a configurable ID pattern, for browser use.
#[wasm_bindgen]
pub struct NameIdExtractor {
    inner: CoreExtractor,
}

#[wasm_bindgen]
impl NameIdExtractor {
    /// Create an extractor for the default `N` + 6-9 digits ID pattern.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: CoreExtractor::new(),
        }
    }

    /// Create an extractor for `prefix` followed by `min..=max` digits.
    #[wasm_bindgen(js_name = withIdPattern)]
    pub fn with_id_pattern(prefix: &str, min_digits: usize, max_digits: usize) -> Result<NameIdExtractor, JsValue> {
        let config = ExtractionConfig {
            id_prefix: prefix.to_string(),
            id_min_digits: min_digits,
            id_max_digits: max_digits,
        };
        let inner = CoreExtractor::from_config(&config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }

    /// Extract the record from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.extract(text))
    }

    /// Extract the record together with the matched line numbers.
    #[wasm_bindgen(js_name = extractWithDetails)]
    pub fn extract_with_details(&self, text: &str) -> Result<JsValue, JsValue> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Details {
            record: NameIdRecord,
            line_count: usize,
            name_line: Option<usize>,
            id_line: Option<usize>,
        }

        let details = self.inner.extract_detailed(text);
        let output = Details {
            record: details.record,
            line_count: details.line_count,
            name_line: details.name_line,
            id_line: details.id_line,
        };

        serde_wasm_bindgen::to_value(&output).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for NameIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js(record: &NameIdRecord) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(record).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Serialize a record to a JSON string (for environments without JS object interop).
#[wasm_bindgen(js_name = extractJson)]
pub fn extract_json(text: &str) -> Result<String, JsValue> {
    serde_json::to_string(&nameid_core::extract(text)).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(serde::Serialize)]
    struct Document<'a> {
        file: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<&'a str>,
    }

    #[derive(serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Details {
        record: NameIdRecord,
        line_count: usize,
        name_line: Option<usize>,
        id_line: Option<usize>,
    }

    fn record(last: &str, first: &str, middle: &str, id: &str) -> NameIdRecord {
        NameIdRecord {
            last_name: last.to_string(),
            first_name: first.to_string(),
            middle_name: middle.to_string(),
            id: id.to_string(),
        }
    }

    fn error_message(result: Result<NameIdExtractor, JsValue>) -> String {
        match result {
            Ok(_) => panic!("expected an error"),
            Err(err) => err.as_string().unwrap_or_default(),
        }
    }

    #[wasm_bindgen_test]
    fn test_extract_json() {
        let json = extract_json("Doe, John Michael\nN-1234567").unwrap();
        assert_eq!(
            json,
            r#"{"lastName":"Doe","firstName":"John","middleName":"Michael","id":"N1234567"}"#
        );
    }

    #[wasm_bindgen_test]
    fn test_extract() {
        let value = extract("Smith, Ann\nLIC N 765 4321").unwrap();
        let actual: NameIdRecord = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(actual, record("Smith", "Ann", "", "N7654321"));
    }

    #[wasm_bindgen_test]
    fn test_build_results_csv() {
        let documents = vec![
            Document {
                file: "b.png",
                text: Some("Doe, John Michael\nN1234567"),
            },
            Document {
                file: "a.png",
                text: None,
            },
            Document {
                file: "c.png",
                text: Some("Roe, Richard"),
            },
        ];
        let input = serde_wasm_bindgen::to_value(&documents).unwrap();

        let csv = build_results_csv(input).unwrap();

        assert_eq!(
            csv,
            "File,LastName,FirstName,MiddleName,ID\n\
             b.png,Doe,John,Michael,N1234567\n\
             a.png,,,,\n\
             c.png,Roe,Richard,,\n"
        );
    }

    #[wasm_bindgen_test]
    fn test_build_results_csv_empty() {
        let input = serde_wasm_bindgen::to_value(&Vec::<Document>::new()).unwrap();
        assert_eq!(
            build_results_csv(input).unwrap(),
            "File,LastName,FirstName,MiddleName,ID\n"
        );
    }

    #[wasm_bindgen_test]
    fn test_with_id_pattern() {
        let extractor = NameIdExtractor::with_id_pattern("ID", 4, 5).unwrap();
        let value = extractor.extract("Doe, John\nN1234567\nID-98765").unwrap();
        let actual: NameIdRecord = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(actual, record("Doe", "John", "", "ID98765"));
    }

    #[wasm_bindgen_test]
    fn test_with_id_pattern_rejects_bad_range() {
        let message = error_message(NameIdExtractor::with_id_pattern("N", 9, 6));
        assert!(message.contains("9..=6"));

        let message = error_message(NameIdExtractor::with_id_pattern("", 6, 9));
        assert!(message.contains("invalid ID prefix"));
    }

    #[wasm_bindgen_test]
    fn test_extract_with_details() {
        let extractor = NameIdExtractor::new();
        let value = extractor
            .extract_with_details("DRIVER LICENSE\nDoe, John Michael\n\n123 MAIN ST\nN-1234567")
            .unwrap();
        let details: Details = serde_wasm_bindgen::from_value(value).unwrap();

        assert_eq!(details.record, record("Doe", "John", "Michael", "N1234567"));
        assert_eq!(details.line_count, 4);
        assert_eq!(details.name_line, Some(1));
        assert_eq!(details.id_line, Some(3));
    }

    #[wasm_bindgen_test]
    fn test_extract_with_details_no_name() {
        let value = NameIdExtractor::new()
            .extract_with_details("N1234567")
            .unwrap();
        let details: Details = serde_wasm_bindgen::from_value(value).unwrap();

        assert_eq!(details.record, NameIdRecord::default());
        assert_eq!(details.name_line, None);
        assert_eq!(details.id_line, None);
    }

    #[wasm_bindgen_test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
