// src/config/validate.rs

use globset::Glob;
use regex::Regex;

use crate::config::model::{ConfigFile, RawConfigFile, RunnerOptions};
use crate::errors::{KonawatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::KonawatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let runner = RunnerOptions::default().merge(&raw.runner);
        validate_runner(&runner)?;
        validate_engine(&raw)?;
        validate_watch(&raw)?;
        Ok(ConfigFile::new_unchecked(runner, raw.engine, raw.notifier, raw.watch))
    }
}

fn validate_runner(runner: &RunnerOptions) -> Result<()> {
    if runner.suite_root.as_os_str().is_empty() {
        return Err(KonawatchError::ConfigError(
            "[runner].suite_root must not be empty".to_string(),
        ));
    }

    if runner.rails_environment_file.as_os_str().is_empty() {
        return Err(KonawatchError::ConfigError(
            "[runner].rails_environment_file must not be empty".to_string(),
        ));
    }

    if let Some(ext) = runner.extensions.iter().find(|e| e.trim_start_matches('.').is_empty()) {
        return Err(KonawatchError::ConfigError(format!(
            "[runner].extensions contains an empty extension ({:?})",
            ext
        )));
    }

    Ok(())
}

fn validate_engine(cfg: &RawConfigFile) -> Result<()> {
    if cfg.engine.cmd.trim().is_empty() {
        return Err(KonawatchError::ConfigError(
            "[engine].cmd must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    for rule in cfg.watch.rules.iter() {
        Regex::new(&rule.pattern)?;
    }
    for pattern in cfg.watch.exclude.iter() {
        Glob::new(pattern)?;
    }
    Ok(())
}
