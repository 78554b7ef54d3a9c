//! Result reports: timestamped CSV/JSON files and console summaries.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReportError;
use crate::models::record::ResultRow;

/// Fixed header row of the results table.
pub const HEADER: [&str; 5] = ["File", "LastName", "FirstName", "MiddleName", "ID"];

/// Results file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Comma-separated values with the fixed header row.
    #[default]
    Csv,
    /// Pretty-printed JSON array.
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown format '{}' (expected csv or json)", other)),
        }
    }
}

/// File name for a results file written at `timestamp`.
///
/// ISO 8601 UTC with milliseconds, `:` and `.` replaced by `-` so the name
/// is valid on every filesystem, e.g. `results_2024-03-05T10-15-30-123Z.csv`.
pub fn results_file_name(timestamp: DateTime<Utc>, format: ReportFormat) -> String {
    let stamp = timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("results_{}.{}", stamp, format.extension())
}

/// Write rows as CSV, header first.
pub fn write_csv<W: Write>(writer: W, rows: &[ResultRow]) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(HEADER)?;

    for row in rows {
        wtr.write_record([
            row.source_file.as_str(),
            row.record.last_name.as_str(),
            row.record.first_name.as_str(),
            row.record.middle_name.as_str(),
            row.record.id.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write rows as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, rows: &[ResultRow]) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Render rows in the given format.
pub fn render(rows: &[ResultRow], format: ReportFormat) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    match format {
        ReportFormat::Csv => write_csv(&mut buf, rows)?,
        ReportFormat::Json => write_json(&mut buf, rows)?,
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Save rows to a new timestamped file in `dir`, creating `dir` if needed.
pub fn save_results(
    dir: &Path,
    rows: &[ResultRow],
    format: ReportFormat,
    timestamp: DateTime<Utc>,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir)?;

    let path = dir.join(results_file_name(timestamp, format));
    let writer = BufWriter::new(File::create(&path)?);

    match format {
        ReportFormat::Csv => write_csv(writer, rows)?,
        ReportFormat::Json => write_json(writer, rows)?,
    }

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(path)
}

/// Human-readable block for one processed image.
pub fn format_summary(row: &ResultRow) -> String {
    let record = &row.record;
    let id = if record.id.is_empty() {
        "(none)"
    } else {
        record.id.as_str()
    };

    let mut output = format!(
        "{}\nExtracted → {}, {} {}\nID → {}",
        row.source_file, record.last_name, record.first_name, record.middle_name, id
    );
    if let Some(error) = &row.error {
        output.push_str(&format!("\nError → {}", error));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use crate::models::record::NameIdRecord;

    fn rows() -> Vec<ResultRow> {
        vec![
            ResultRow::new(
                "front.png",
                NameIdRecord {
                    last_name: "Doe".into(),
                    first_name: "John".into(),
                    middle_name: "Michael".into(),
                    id: "N123456".into(),
                },
            ),
            ResultRow::new("blank.jpg", NameIdRecord::default()),
        ]
    }

    fn timestamp() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_milli_opt(10, 15, 30, 123)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_results_file_name() {
        assert_eq!(
            results_file_name(timestamp(), ReportFormat::Csv),
            "results_2024-03-05T10-15-30-123Z.csv"
        );
        assert_eq!(
            results_file_name(timestamp(), ReportFormat::Json),
            "results_2024-03-05T10-15-30-123Z.json"
        );
    }

    #[test]
    fn test_csv_header_first() {
        let csv = render(&rows(), ReportFormat::Csv).unwrap();
        assert_eq!(
            csv,
            "File,LastName,FirstName,MiddleName,ID\n\
             front.png,Doe,John,Michael,N123456\n\
             blank.jpg,,,,\n"
        );
    }

    #[test]
    fn test_csv_header_only_for_no_rows() {
        let csv = render(&[], ReportFormat::Csv).unwrap();
        assert_eq!(csv, "File,LastName,FirstName,MiddleName,ID\n");
    }

    #[test]
    fn test_csv_quotes_commas() {
        let row = ResultRow::new("scan, page 1.png", NameIdRecord::default());
        let csv = render(&[row], ReportFormat::Csv).unwrap();
        assert!(csv.ends_with("\"scan, page 1.png\",,,,\n"));
    }

    #[test]
    fn test_json_report() {
        let json = render(&rows(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["sourceFile"], "front.png");
        assert_eq!(value[0]["lastName"], "Doe");
        assert_eq!(value[1]["id"], "");
        assert!(value[1].get("error").is_none());
    }

    #[test]
    fn test_save_results_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let results_dir = dir.path().join("results");

        let path = save_results(&results_dir, &rows(), ReportFormat::Csv, timestamp()).unwrap();

        assert_eq!(path, results_dir.join("results_2024-03-05T10-15-30-123Z.csv"));
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.starts_with("File,LastName,FirstName,MiddleName,ID\n"));
    }

    #[test]
    fn test_format_summary() {
        let rows = rows();
        assert_eq!(
            format_summary(&rows[0]),
            "front.png\nExtracted → Doe, John Michael\nID → N123456"
        );
        assert_eq!(
            format_summary(&rows[1]),
            "blank.jpg\nExtracted → ,  \nID → (none)"
        );
    }
}
