// src/runner.rs

//! The runner: turns a batch of changed paths into one engine invocation,
//! one summary and at most one notification.
//!
//! Per call to [`Runner::run`]:
//!
//! 1. reset the formatter
//! 2. translate existing paths into suite ids (none => run everything)
//! 3. invoke the engine once
//! 4. write the summary; a formatter error becomes a failure outcome
//! 5. notify, if enabled
//!
//! Nothing in a run is escalated to the caller. Engine and notifier errors
//! are logged, formatter errors end up in the notification.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::{RunnerOptions, RunnerOverrides};
use crate::engine::{Engine, EngineRequest};
use crate::format::Formatter;
use crate::fs::{FileSystem, RealFileSystem};
use crate::notifier::Notifier;
use crate::suite::{SuiteId, SuiteSelection};
use crate::types::{ExecutionMode, NotifyStatus};

/// Result of one run, as seen by the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The formatter wrote its summary.
    Summary { line: String, passed: bool },
    /// Writing the summary failed with this message.
    Failure { message: String },
}

impl RunOutcome {
    /// Text carried by the notification.
    pub fn message(&self) -> &str {
        match self {
            RunOutcome::Summary { line, .. } => line,
            RunOutcome::Failure { message } => message,
        }
    }

    pub fn status(&self) -> NotifyStatus {
        match self {
            RunOutcome::Summary { passed: true, .. } => NotifyStatus::Success,
            _ => NotifyStatus::Failed,
        }
    }
}

pub struct Runner<E: Engine, N: Notifier> {
    options: RunnerOptions,
    mode: ExecutionMode,
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    engine: E,
    formatter: Box<dyn Formatter>,
    notifier: N,
}

impl<E: Engine, N: Notifier> fmt::Debug for Runner<E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("options", &self.options)
            .field("mode", &self.mode)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<E: Engine, N: Notifier> Runner<E, N> {
    /// Create a runner whose options are the defaults merged with `overrides`.
    pub fn new(
        overrides: &RunnerOverrides,
        engine: E,
        formatter: Box<dyn Formatter>,
        notifier: N,
    ) -> Self {
        Self::from_options(
            RunnerOptions::default().merge(overrides),
            engine,
            formatter,
            notifier,
        )
    }

    /// Create a runner from already merged options.
    pub fn from_options(
        options: RunnerOptions,
        engine: E,
        formatter: Box<dyn Formatter>,
        notifier: N,
    ) -> Self {
        info!(?options, "runner initialised");
        Self {
            options,
            mode: ExecutionMode::Runner,
            root: PathBuf::from("."),
            fs: Arc::new(RealFileSystem),
            engine,
            formatter,
            notifier,
        }
    }

    /// Resolve relative paths against `root` instead of the working directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Use `fs` for existence checks.
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Mode handed to the engine on every invocation.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Called once when the watch session begins.
    ///
    /// Runs every suite if `run_all_on_start` is set; otherwise does nothing.
    pub async fn start(&mut self) -> Option<RunOutcome> {
        if self.options.run_all_on_start {
            Some(self.run_all().await)
        } else {
            debug!("run_all_on_start disabled; waiting for changes");
            None
        }
    }

    pub async fn run_all(&mut self) -> RunOutcome {
        self.run(&[]).await
    }

    /// Run the suites for `paths`, or every suite if `paths` is empty or
    /// none of them could be translated.
    pub async fn run(&mut self, paths: &[PathBuf]) -> RunOutcome {
        self.formatter.reset();

        let suites = SuiteSelection::from_ids(self.suite_ids(paths));
        info!(suites = ?suites, "running suites");

        let request = EngineRequest {
            mode: self.mode,
            suites,
        };
        if let Err(err) = self.engine.run(request, self.formatter.as_mut()).await {
            error!(error = %err, "engine run failed");
        }

        let outcome = match self.formatter.write_summary() {
            Ok(()) => RunOutcome::Summary {
                line: self.formatter.summary_line().unwrap_or_default().to_string(),
                passed: self.formatter.passed(),
            },
            Err(err) => {
                error!(error = %err, "failed to write summary");
                RunOutcome::Failure {
                    message: err.to_string(),
                }
            }
        };

        self.notify(&outcome).await;
        outcome
    }

    async fn notify(&mut self, outcome: &RunOutcome) {
        if !self.options.notification {
            debug!("notifications disabled");
            return;
        }

        let status = outcome.status();
        if let Err(err) = self.notifier.notify(outcome.message(), status).await {
            warn!(error = %err, "failed to deliver notification");
        }
    }

    /// Suite ids for the paths that exist, in order, without duplicates.
    pub fn suite_ids(&self, paths: &[PathBuf]) -> Vec<SuiteId> {
        let mut ids: Vec<SuiteId> = Vec::new();

        for path in paths {
            let on_disk = self.resolve(path);
            if !self.fs.exists(&on_disk) {
                debug!(?path, "skipping path that does not exist");
                continue;
            }

            let rel = self.relative(path);
            match SuiteId::from_path(rel, &self.options.suite_root, &self.options.extensions) {
                Some(id) => {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                None => debug!(?path, suite_root = ?self.options.suite_root, "path is not a spec file"),
            }
        }

        ids
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}
