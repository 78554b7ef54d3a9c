//! Run command - OCR a list of images and save the extracted names and IDs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use nameid_core::models::config::{NameIdConfig, ProviderKind};
use nameid_core::models::record::ResultRow;
use nameid_core::report::{ReportFormat, format_summary, save_results};
use nameid_core::{BatchRunner, NameIdExtractor, create_provider};

use super::load_config;

const USAGE: &str = "Usage: nameid run <CREDENTIALS> <IMAGE>...\n       \
                     nameid run --provider <local|sidecar> <IMAGE>...";

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Credentials file followed by image files or glob patterns
    /// (the credentials file is only expected for the vision provider)
    #[arg(value_name = "INPUTS")]
    inputs: Vec<PathBuf>,

    /// Credentials file; when given, every input is treated as an image
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// OCR provider (vision, local, sidecar)
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// Directory receiving the results file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Results file format (csv, json)
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Number of OCR requests in flight
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Continue on error, recording an empty row for failed images
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory for the local provider
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub async fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    let (credentials, inputs) = split_inputs(
        config.ocr.provider,
        args.credentials
            .clone()
            .or_else(|| config.credentials_path().map(Path::to_path_buf)),
        &args.inputs,
    )?;

    if let Some(path) = &credentials {
        if !path.exists() {
            anyhow::bail!("Credentials file not found: {}\n\n{}", path.display(), USAGE);
        }
    }
    config.ocr.credentials_path = credentials;

    let images = expand_inputs(&inputs)?;
    for image in &images {
        if !image.exists() {
            anyhow::bail!("Image not found: {}\n\n{}", image.display(), USAGE);
        }
    }

    println!(
        "{} Found {} images to process",
        style("ℹ").blue(),
        images.len()
    );

    let extractor = NameIdExtractor::from_config(&config.extraction)?;
    let provider = create_provider(&config.ocr)?;
    let runner = BatchRunner::new(provider, extractor).with_config(&config.batch);

    info!("Using {} provider", runner.provider_name());

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images")?
            .progress_chars("=>-"),
    );

    let rows = runner
        .run_with(&images, |_, row| {
            pb.suspend(|| print_row(row));
            pb.inc(1);
        })
        .await;

    pb.finish_and_clear();
    let rows = rows?;

    let path = save_results(
        &config.output.results_dir,
        &rows,
        config.output.format,
        Utc::now(),
    )?;

    let failed = rows.iter().filter(|r| r.is_failed()).count();

    println!();
    println!(
        "{} Results saved to {}",
        style("✓").green(),
        path.display()
    );
    println!(
        "   {} processed, {} failed",
        style(rows.len() - failed).green(),
        style(failed).red()
    );

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn apply_overrides(config: &mut NameIdConfig, args: &RunArgs) {
    if let Some(provider) = args.provider {
        config.ocr.provider = provider;
    }
    if let Some(dir) = &args.model_dir {
        config.ocr.model_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output.results_dir = dir.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(jobs) = args.jobs {
        config.batch.concurrency = jobs;
    }
    if args.continue_on_error {
        config.batch.continue_on_error = true;
    }
}

fn print_row(row: &ResultRow) {
    println!();
    println!("{}", format_summary(row));
}

/// Separate the credentials file from the images.
///
/// For the vision provider the first input is the credentials file unless
/// one was given by flag or configuration.
fn split_inputs(
    provider: ProviderKind,
    credentials: Option<PathBuf>,
    inputs: &[PathBuf],
) -> anyhow::Result<(Option<PathBuf>, Vec<PathBuf>)> {
    let (credentials, images) = match (provider.needs_credentials(), credentials) {
        (true, Some(path)) => (Some(path), inputs.to_vec()),
        (true, None) => match inputs.split_first() {
            Some((first, rest)) => (Some(first.clone()), rest.to_vec()),
            None => anyhow::bail!("Missing credentials file and images.\n\n{}", USAGE),
        },
        (false, _) => (None, inputs.to_vec()),
    };

    if images.is_empty() {
        anyhow::bail!("No image files provided.\n\n{}", USAGE);
    }

    Ok((credentials, images))
}

/// Expand glob patterns, keeping literal paths as given and input order intact.
fn expand_inputs(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut images = Vec::with_capacity(inputs.len());

    for input in inputs {
        let pattern = input.to_string_lossy();
        if !is_pattern(&pattern) {
            images.push(input.clone());
            continue;
        }

        let matches: Vec<PathBuf> = glob(&pattern)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();

        if matches.is_empty() {
            anyhow::bail!("No files match pattern: {}\n\n{}", pattern, USAGE);
        }
        images.extend(matches);
    }

    Ok(images)
}

fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_split_inputs_vision_positional_credentials() {
        let (creds, images) =
            split_inputs(ProviderKind::Vision, None, &paths(&["key.json", "a.png", "b.png"]))
                .unwrap();
        assert_eq!(creds, Some(PathBuf::from("key.json")));
        assert_eq!(images, paths(&["a.png", "b.png"]));
    }

    #[test]
    fn test_split_inputs_vision_flag_credentials() {
        let (creds, images) = split_inputs(
            ProviderKind::Vision,
            Some(PathBuf::from("key.json")),
            &paths(&["a.png"]),
        )
        .unwrap();
        assert_eq!(creds, Some(PathBuf::from("key.json")));
        assert_eq!(images, paths(&["a.png"]));
    }

    #[test]
    fn test_split_inputs_requires_images() {
        let err = split_inputs(ProviderKind::Vision, None, &paths(&["key.json"])).unwrap_err();
        assert!(err.to_string().contains("Usage"));

        assert!(split_inputs(ProviderKind::Vision, None, &[]).is_err());
        assert!(split_inputs(ProviderKind::Sidecar, None, &[]).is_err());
    }

    #[test]
    fn test_split_inputs_other_providers() {
        let (creds, images) =
            split_inputs(ProviderKind::Sidecar, None, &paths(&["a.png", "b.png"])).unwrap();
        assert_eq!(creds, None);
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn test_expand_inputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let literal = dir.path().join("z.png");
        let pattern = dir.path().join("*.png");
        let images = expand_inputs(&[literal.clone(), pattern]).unwrap();

        assert_eq!(
            images,
            vec![literal, dir.path().join("a.png"), dir.path().join("b.png")]
        );
    }

    #[test]
    fn test_expand_inputs_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let err = expand_inputs(&[dir.path().join("*.tiff")]).unwrap_err();
        assert!(err.to_string().contains("Usage: nameid run"));
    }
}
