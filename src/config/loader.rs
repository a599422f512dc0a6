// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile, RunnerOverrides};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** merge defaults or
/// compile watch rules. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file, layer `cli` overrides on top of its `[runner]`
/// section, and validate the result.
pub fn load_and_validate(path: impl AsRef<Path>, cli: RunnerOverrides) -> Result<ConfigFile> {
    let mut raw = load_from_path(&path)?;
    raw.runner = raw.runner.and(cli);
    ConfigFile::try_from(raw)
}

/// Like [`load_and_validate`], but a missing file means "all defaults".
///
/// The runner is usable without any config file; only a file that exists
/// and fails to parse is an error.
pub fn load_or_default(path: impl AsRef<Path>, cli: RunnerOverrides) -> Result<ConfigFile> {
    let path = path.as_ref();
    if path.exists() {
        return load_and_validate(path, cli);
    }

    debug!(?path, "config file not found; using defaults");
    let raw = RawConfigFile {
        runner: cli,
        ..Default::default()
    };
    ConfigFile::try_from(raw)
}

/// Helper to resolve a default config path: `Konawatch.toml` in the current
/// working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Konawatch.toml")
}
