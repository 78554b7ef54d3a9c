//! CLI subcommands.

pub mod config;
pub mod parse;
pub mod run;

use std::path::{Path, PathBuf};

use nameid_core::NameIdConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nameid")
        .join("config.json")
}

/// Load configuration from an explicit path, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<NameIdConfig> {
    if let Some(path) = config_path {
        return Ok(NameIdConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(NameIdConfig::from_file(&default_path)?)
    } else {
        Ok(NameIdConfig::default())
    }
}
