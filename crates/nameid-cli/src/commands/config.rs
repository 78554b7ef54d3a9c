//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use nameid_core::NameIdConfig;

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "ocr.provider")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

/// Run a config subcommand against `config_path`, or the default location.
pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&config_path),
        ConfigCommand::Init(init_args) => init_config(init_args, config_path),
        ConfigCommand::Get { key } => get_config(&config_path, &key),
        ConfigCommand::Set { key, value } => set_config(&config_path, &key, &value),
        ConfigCommand::Path => show_path(&config_path),
    }
}

fn load_or_default(path: &Path) -> anyhow::Result<NameIdConfig> {
    if path.exists() {
        Ok(NameIdConfig::from_file(path)?)
    } else {
        Ok(NameIdConfig::default())
    }
}

fn show_config(config_path: &Path) -> anyhow::Result<()> {
    if !config_path.exists() {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = load_or_default(config_path)?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, config_path: PathBuf) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or(config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    NameIdConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(config_path: &Path, key: &str) -> anyhow::Result<()> {
    let config = load_or_default(config_path)?;
    let json = serde_json::to_value(&config)?;

    let value = lookup(&json, key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(config_path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let config = load_or_default(config_path)?;

    let parsed_value = parse_value(value);
    let updated = with_value(&config, key, parsed_value.clone())?;
    updated.save(config_path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

fn show_path(config_path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'nameid config init' to create a configuration file.");
    }

    Ok(())
}

/// Values that are not valid JSON are taken as plain strings.
fn parse_value(value: &str) -> serde_json::Value {
    serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()))
}

fn lookup<'a>(json: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.').try_fold(json, |current, part| current.get(part))
}

/// Return a copy of `config` with the dotted `key` set to `value`.
fn with_value(
    config: &NameIdConfig,
    key: &str,
    value: serde_json::Value,
) -> anyhow::Result<NameIdConfig> {
    let mut json = serde_json::to_value(config)?;

    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, path)) = parts.split_last() else {
        anyhow::bail!("Empty configuration key");
    };

    let mut current = &mut json;
    for part in path {
        current = current
            .get_mut(*part)
            .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
    }

    match current.as_object_mut() {
        Some(obj) if obj.contains_key(*last) => {
            obj.insert((*last).to_string(), value);
        }
        Some(_) => anyhow::bail!("Configuration key not found: {}", key),
        None => anyhow::bail!("Cannot set value at non-object path"),
    }

    let updated: NameIdConfig = serde_json::from_value(json)?;
    updated.validate()?;
    Ok(updated)
}
