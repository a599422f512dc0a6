// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::RunnerOverrides;
use crate::types::FormatterKind;

/// Command-line arguments for `konawatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "konawatch",
    version,
    about = "Run Konacha JavaScript specs when files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Konawatch.toml` in the current working directory. A missing
    /// file means "use defaults".
    #[arg(long, value_name = "PATH", default_value = "Konawatch.toml")]
    pub config: String,

    /// Run all suites once, no watching.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `KONAWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load and print the effective configuration, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Don't send notifications.
    #[arg(long)]
    pub no_notification: bool,

    /// Run all suites when the session starts.
    #[arg(long)]
    pub run_all_on_start: bool,

    /// Rails environment file handed to the engine.
    #[arg(long, value_name = "PATH")]
    pub rails_env_file: Option<PathBuf>,

    /// Formatter to use (summary, quiet).
    #[arg(long, value_name = "KIND")]
    pub formatter: Option<FormatterKind>,
}

impl CliArgs {
    /// Runner options set on the command line. Flags that were not given
    /// leave the config file's values alone.
    pub fn runner_overrides(&self) -> RunnerOverrides {
        RunnerOverrides {
            notification: self.no_notification.then_some(false),
            rails_environment_file: self.rails_env_file.clone(),
            formatter: self.formatter,
            run_all_on_start: self.run_all_on_start.then_some(true),
            ..Default::default()
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_do_not_override() {
        let args = CliArgs::parse_from(["konawatch"]);
        assert_eq!(args.runner_overrides(), RunnerOverrides::default());
        assert_eq!(args.config, "Konawatch.toml");
    }

    #[test]
    fn flags_become_overrides() {
        let args = CliArgs::parse_from([
            "konawatch",
            "--no-notification",
            "--run-all-on-start",
            "--rails-env-file",
            "test/dummy/config/environment",
            "--formatter",
            "quiet",
        ]);
        let o = args.runner_overrides();
        assert_eq!(o.notification, Some(false));
        assert_eq!(o.run_all_on_start, Some(true));
        assert_eq!(
            o.rails_environment_file,
            Some(PathBuf::from("test/dummy/config/environment"))
        );
        assert_eq!(o.formatter, Some(FormatterKind::Quiet));
    }
}
