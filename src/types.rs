// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which mode the execution engine should run suites in.
///
/// The runner always asks for `Runner`: run once headless and report. `Server`
/// is what an interactive browser session would use and is only exposed so
/// engines can tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Runner,
    Server,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Runner => "runner",
            ExecutionMode::Server => "server",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status attached to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyStatus {
    Success,
    Failed,
}

impl NotifyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyStatus::Success => "success",
            NotifyStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for NotifyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which built-in formatter to construct.
///
/// - `Summary`: print failing output and the summary line to stdout.
/// - `Quiet`: print nothing, but still compute the summary line for
///   notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    Summary,
    Quiet,
}

impl Default for FormatterKind {
    fn default() -> Self {
        FormatterKind::Summary
    }
}

impl FromStr for FormatterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(FormatterKind::Summary),
            "quiet" => Ok(FormatterKind::Quiet),
            other => Err(format!(
                "invalid formatter: {other} (expected \"summary\" or \"quiet\")"
            )),
        }
    }
}
