//! Parse command - extract name and ID from already recognized text.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;

use nameid_core::extract::{ExtractionDetails, NameIdExtractor};

use super::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file with OCR output (default: stdin)
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show which lines the fields were read from
    #[arg(long)]
    explain: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let extractor = NameIdExtractor::from_config(&config.extraction)?;

    let text = match &args.input {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            std::fs::read_to_string(path)?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let details = extractor.extract_detailed(&text);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&details.record)?),
        OutputFormat::Text => println!("{}", format_text(&details)),
    }

    if args.explain {
        eprintln!();
        eprintln!("{}", format_explanation(&details));
    }

    Ok(())
}

fn format_text(details: &ExtractionDetails) -> String {
    let record = &details.record;
    let or_none = |s: &str| {
        if s.is_empty() {
            "(none)".to_string()
        } else {
            s.to_string()
        }
    };

    let mut output = String::new();
    output.push_str(&format!("Last name:   {}\n", or_none(&record.last_name)));
    output.push_str(&format!("First name:  {}\n", or_none(&record.first_name)));
    output.push_str(&format!("Middle name: {}\n", or_none(&record.middle_name)));
    output.push_str(&format!("ID:          {}", or_none(&record.id)));
    output
}

fn format_explanation(details: &ExtractionDetails) -> String {
    let mut output = format!(
        "{} {} non-empty lines\n",
        style("ℹ").blue(),
        details.line_count
    );

    match (details.name_line, &details.name_source) {
        (Some(line), Some(source)) => {
            output.push_str(&format!("  name: line {} {:?}\n", line + 1, source));
        }
        _ => output.push_str("  name: no \"Last, First [Middle]\" line\n"),
    }

    match (details.id_line, &details.id_source) {
        (Some(line), Some(source)) => {
            output.push_str(&format!("  id:   line {} {:?}", line + 1, source));
        }
        _ if details.name_line.is_some() => output.push_str("  id:   no match after the name line"),
        _ => output.push_str("  id:   not searched"),
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_text() {
        let details = NameIdExtractor::new().extract_detailed("Smith, Ann\nN1234567");
        assert_eq!(
            format_text(&details),
            "Last name:   Smith\nFirst name:  Ann\nMiddle name: (none)\nID:          N1234567"
        );
    }

    #[test]
    fn test_format_explanation() {
        let details = NameIdExtractor::new().extract_detailed("HEADER\nSmith, Ann\nN1234567");
        let text = format_explanation(&details);
        assert!(text.contains("line 2 \"Smith, Ann\""));
        assert!(text.contains("line 3 \"N1234567\""));

        let details = NameIdExtractor::new().extract_detailed("HEADER");
        assert!(format_explanation(&details).contains("not searched"));
    }
}
