// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::suite::DEFAULT_EXTENSIONS;
use crate::types::FormatterKind;

/// Environment variable that overrides the default Rails environment file.
pub const RAILS_ENV_FILE_VAR: &str = "KONAWATCH_RAILS_ENV_FILE";

/// Default command used to run the suites.
pub const DEFAULT_ENGINE_CMD: &str = "bundle exec rake konacha:run";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [runner]
/// notification = true
/// run_all_on_start = false
/// suite_root = "spec/javascripts"
///
/// [engine]
/// cmd = "bundle exec rake konacha:run"
///
/// [notifier]
/// cmd = "notify-send \"$KONAWATCH_TITLE\" \"$KONAWATCH_MESSAGE\""
///
/// [watch]
/// exclude = ["**/*.swp"]
///
/// [[watch.rule]]
/// pattern = '^app/assets/javascripts/(.+)\.js$'
/// target = "spec/javascripts/${1}_spec.js"
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub runner: RunnerOverrides,

    #[serde(default)]
    pub engine: EngineSection,

    #[serde(default)]
    pub notifier: NotifierSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// Validated configuration.
///
/// Construct via `ConfigFile::try_from(raw)` (see `validate.rs`), which merges
/// the `[runner]` overrides onto [`RunnerOptions::default`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub runner: RunnerOptions,
    pub engine: EngineSection,
    pub notifier: NotifierSection,
    pub watch: WatchSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        runner: RunnerOptions,
        engine: EngineSection,
        notifier: NotifierSection,
        watch: WatchSection,
    ) -> Self {
        Self {
            runner,
            engine,
            notifier,
            watch,
        }
    }
}

/// Effective runner options: defaults merged with overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Send a notification after every run.
    pub notification: bool,

    /// Rails environment file handed to the engine.
    pub rails_environment_file: PathBuf,

    /// Which built-in formatter to use.
    pub formatter: FormatterKind,

    /// Run the whole suite when the session starts.
    pub run_all_on_start: bool,

    /// Directory that spec files live under; stripped from suite ids.
    pub suite_root: PathBuf,

    /// Spec file extensions stripped from suite ids.
    pub extensions: Vec<String>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            notification: true,
            rails_environment_file: default_rails_environment_file(),
            formatter: FormatterKind::default(),
            run_all_on_start: false,
            suite_root: PathBuf::from("spec/javascripts"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn default_rails_environment_file() -> PathBuf {
    std::env::var_os(RAILS_ENV_FILE_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config/environment"))
}

impl RunnerOptions {
    /// Apply `overrides` key by key; unset keys keep their current value.
    pub fn merge(mut self, overrides: &RunnerOverrides) -> Self {
        if let Some(v) = overrides.notification {
            self.notification = v;
        }
        if let Some(ref v) = overrides.rails_environment_file {
            self.rails_environment_file = v.clone();
        }
        if let Some(v) = overrides.formatter {
            self.formatter = v;
        }
        if let Some(v) = overrides.run_all_on_start {
            self.run_all_on_start = v;
        }
        if let Some(ref v) = overrides.suite_root {
            self.suite_root = v.clone();
        }
        if let Some(ref v) = overrides.extensions {
            self.extensions = v.clone();
        }
        self
    }
}

/// `[runner]` section, also used for CLI overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerOverrides {
    #[serde(default)]
    pub notification: Option<bool>,

    #[serde(default)]
    pub rails_environment_file: Option<PathBuf>,

    #[serde(default)]
    pub formatter: Option<FormatterKind>,

    #[serde(default)]
    pub run_all_on_start: Option<bool>,

    #[serde(default)]
    pub suite_root: Option<PathBuf>,

    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

impl RunnerOverrides {
    /// Layer `other` on top of `self`; values set in `other` win.
    pub fn and(mut self, other: RunnerOverrides) -> Self {
        self.notification = other.notification.or(self.notification);
        self.rails_environment_file = other.rails_environment_file.or(self.rails_environment_file);
        self.formatter = other.formatter.or(self.formatter);
        self.run_all_on_start = other.run_all_on_start.or(self.run_all_on_start);
        self.suite_root = other.suite_root.or(self.suite_root);
        self.extensions = other.extensions.or(self.extensions);
        self
    }
}

/// `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    /// Shell command that runs the suites.
    #[serde(default = "default_engine_cmd")]
    pub cmd: String,
}

fn default_engine_cmd() -> String {
    DEFAULT_ENGINE_CMD.to_string()
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            cmd: default_engine_cmd(),
        }
    }
}

/// `[notifier]` section.
///
/// Without `cmd`, notifications are written to the log.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierSection {
    #[serde(default)]
    pub cmd: Option<String>,

    #[serde(default = "default_notifier_title")]
    pub title: String,
}

fn default_notifier_title() -> String {
    "Konacha Specs".to_string()
}

impl Default for NotifierSection {
    fn default() -> Self {
        Self {
            cmd: None,
            title: default_notifier_title(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Glob patterns (relative to the project root) that never trigger a run.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// How long to keep collecting file events into one batch.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Path mapping rules. If empty, the built-in rules are used.
    #[serde(default, rename = "rule")]
    pub rules: Vec<WatchRuleConfig>,
}

fn default_debounce_ms() -> u64 {
    100
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            debounce_ms: default_debounce_ms(),
            rules: Vec::new(),
        }
    }
}

/// `[[watch.rule]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WatchRuleConfig {
    /// Regex matched against the project-relative path.
    pub pattern: String,

    /// Spec path template using `$1` / `${name}` captures. If `None`, the
    /// changed path itself is used.
    #[serde(default)]
    pub target: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_defaults_for_unset_keys() {
        let overrides = RunnerOverrides {
            notification: Some(false),
            run_all_on_start: Some(true),
            ..Default::default()
        };

        let merged = RunnerOptions::default().merge(&overrides);
        let defaults = RunnerOptions::default();

        assert!(!merged.notification);
        assert!(merged.run_all_on_start);
        assert_eq!(merged.rails_environment_file, defaults.rails_environment_file);
        assert_eq!(merged.formatter, defaults.formatter);
        assert_eq!(merged.suite_root, defaults.suite_root);
        assert_eq!(merged.extensions, defaults.extensions);
    }

    #[test]
    fn later_overrides_win() {
        let file = RunnerOverrides {
            notification: Some(true),
            suite_root: Some(PathBuf::from("test/js")),
            ..Default::default()
        };
        let cli = RunnerOverrides {
            notification: Some(false),
            ..Default::default()
        };

        let layered = file.and(cli);
        assert_eq!(layered.notification, Some(false));
        assert_eq!(layered.suite_root, Some(PathBuf::from("test/js")));
    }
}
