// src/engine/command.rs

//! Engine that runs suites through an external command.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::engine::{Engine, EngineEvent, EngineRequest};
use crate::errors::Result;
use crate::format::Formatter;
use crate::suite::SuiteSelection;

/// Matches whole summary lines such as `12 examples, 1 failure, 2 pending`,
/// optionally prefixed with `Finished:`.
const TOTALS_PATTERN: &str =
    r"^\s*(?:Finished:\s*)?(\d+) examples?, (\d+) failures?(?:, (\d+) pending)?\s*$";

/// Runs `cmd` through the platform shell in `root`.
///
/// The request is passed through the environment:
/// - `KONACHA_MODE`: the execution mode (`runner`).
/// - `RAILS_ENVIRONMENT_FILE`: the configured environment file.
/// - `SPEC`: comma-separated suite ids, only when specific suites were
///   requested.
pub struct CommandEngine {
    cmd: String,
    root: PathBuf,
    rails_environment_file: PathBuf,
    totals_re: Regex,
}

impl fmt::Debug for CommandEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEngine")
            .field("cmd", &self.cmd)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl CommandEngine {
    pub fn new(
        cmd: impl Into<String>,
        root: impl Into<PathBuf>,
        rails_environment_file: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            cmd: cmd.into(),
            root: root.into(),
            rails_environment_file: rails_environment_file.into(),
            totals_re: Regex::new(TOTALS_PATTERN)?,
        })
    }

    fn build_command(&self, request: &EngineRequest) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };

        cmd.current_dir(&self.root)
            .env("KONACHA_MODE", request.mode.as_str())
            .env("RAILS_ENVIRONMENT_FILE", &self.rails_environment_file)
            .env_remove("SPEC");

        if let Some(spec) = spec_env(&request.suites) {
            cmd.env("SPEC", spec);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        cmd
    }

    /// Translate one line of output into formatter events.
    fn events_for_line(&self, line: String) -> Vec<EngineEvent> {
        let totals = self.totals_re.captures(&line).map(|caps| {
            let num = |i: usize| {
                caps.get(i)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .unwrap_or(0)
            };
            EngineEvent::Totals {
                examples: num(1),
                failures: num(2),
                pending: num(3),
            }
        });

        let mut events = vec![EngineEvent::Output(line)];
        events.extend(totals);
        events
    }
}

/// Value for the `SPEC` variable, if specific suites were requested.
pub fn spec_env(suites: &SuiteSelection) -> Option<String> {
    match suites {
        SuiteSelection::All => None,
        SuiteSelection::Only(ids) => Some(
            ids.iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(","),
        ),
    }
}

impl Engine for CommandEngine {
    fn run<'a>(
        &'a mut self,
        request: EngineRequest,
        formatter: &'a mut dyn Formatter,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            info!(
                cmd = %self.cmd,
                mode = %request.mode,
                suites = ?request.suites,
                "starting engine"
            );

            let mut child = self
                .build_command(&request)
                .spawn()
                .with_context(|| format!("spawning engine command '{}'", self.cmd))?;

            // Always consume stderr so buffers don't fill; log at debug.
            if let Some(stderr) = child.stderr.take() {
                tokio::spawn(async move {
                    let mut reader = BufReader::new(stderr);
                    let mut buf = Vec::new();
                    while let Ok(n) = reader.read_until(b'\n', &mut buf).await {
                        if n == 0 {
                            break;
                        }
                        debug!("engine stderr: {}", String::from_utf8_lossy(&buf).trim_end());
                        buf.clear();
                    }
                });
            }

            // Engine output is not guaranteed to be UTF-8; decode lossily.
            if let Some(stdout) = child.stdout.take() {
                let mut reader = BufReader::new(stdout);
                let mut buf = Vec::new();
                loop {
                    buf.clear();
                    let n = reader
                        .read_until(b'\n', &mut buf)
                        .await
                        .context("reading engine stdout")?;
                    if n == 0 {
                        break;
                    }
                    let line = String::from_utf8_lossy(&buf)
                        .trim_end_matches(['\n', '\r'])
                        .to_string();
                    debug!("engine stdout: {}", line);
                    for event in self.events_for_line(line) {
                        formatter.record(event);
                    }
                }
            }

            let status = child
                .wait()
                .await
                .with_context(|| format!("waiting for engine command '{}'", self.cmd))?;

            let exit_code = status.code().unwrap_or(-1);
            info!(exit_code, success = status.success(), "engine exited");
            formatter.record(EngineEvent::Finished { exit_code });

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::SuiteId;

    fn engine() -> CommandEngine {
        CommandEngine::new("true", ".", "config/environment").unwrap()
    }

    #[test]
    fn spec_env_joins_ids() {
        let sel = SuiteSelection::Only(vec![SuiteId::from("/1"), SuiteId::from("/foo/bar")]);
        assert_eq!(spec_env(&sel).as_deref(), Some("/1,/foo/bar"));
        assert_eq!(spec_env(&SuiteSelection::All), None);
    }

    #[test]
    fn totals_are_parsed_from_output() {
        let events = engine().events_for_line("7 examples, 2 failures, 1 pending".into());
        assert_eq!(
            events,
            vec![
                EngineEvent::Output("7 examples, 2 failures, 1 pending".into()),
                EngineEvent::Totals {
                    examples: 7,
                    failures: 2,
                    pending: 1
                },
            ]
        );
    }

    #[test]
    fn pending_is_optional() {
        let events = engine().events_for_line("Finished: 1 example, 0 failures".into());
        assert_eq!(
            events[1],
            EngineEvent::Totals {
                examples: 1,
                failures: 0,
                pending: 0
            }
        );
    }

    #[test]
    fn quoted_totals_inside_other_output_are_ignored() {
        let line = "  expected summary '3 examples, 1 failure' to be empty";
        let events = engine().events_for_line(line.into());
        assert_eq!(events, vec![EngineEvent::Output(line.into())]);
    }

    #[test]
    fn plain_output_is_passed_through() {
        let events = engine().events_for_line("..F.".into());
        assert_eq!(events, vec![EngineEvent::Output("..F.".into())]);
    }
}
