// src/session.rs

//! Host loop around the runner.
//!
//! The session owns the [`Runner`] and feeds it from a channel of
//! [`HostEvent`]s (file watcher batches, Ctrl-C). Each event is handled to
//! completion, notification included, before the next one is read, so runs
//! never overlap.

use std::fmt;
use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::Engine;
use crate::errors::Result;
use crate::notifier::Notifier;
use crate::runner::{RunOutcome, Runner};
use crate::watch::RuleSet;

/// Events flowing into the session from the watcher and signal handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A batch of project-relative paths changed.
    FilesChanged(Vec<PathBuf>),
    /// Run every suite.
    RunAll,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Run every suite once and return without reading events (`--once`).
    pub exit_when_idle: bool,
}

pub struct Session<E: Engine, N: Notifier> {
    runner: Runner<E, N>,
    rules: RuleSet,
    event_rx: mpsc::Receiver<HostEvent>,
    options: SessionOptions,
}

impl<E: Engine, N: Notifier> fmt::Debug for Session<E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("runner", &self.runner)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<E: Engine, N: Notifier> Session<E, N> {
    pub fn new(
        runner: Runner<E, N>,
        rules: RuleSet,
        event_rx: mpsc::Receiver<HostEvent>,
        options: SessionOptions,
    ) -> Self {
        Self {
            runner,
            rules,
            event_rx,
            options,
        }
    }

    /// Main event loop. Returns the runner once the session ends.
    pub async fn run(mut self) -> Result<Runner<E, N>> {
        if self.options.exit_when_idle {
            info!("running all suites once");
            self.runner.run_all().await;
            return Ok(self.runner);
        }

        info!("konawatch session started");
        self.runner.start().await;

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("host event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "session received event");

            if !self.handle(event).await {
                info!("shutdown requested; stopping session");
                break;
            }
        }

        info!("session exiting");
        Ok(self.runner)
    }

    /// Handle one event. Returns `false` when the session should stop.
    pub async fn handle(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::FilesChanged(paths) => {
                self.files_changed(&paths).await;
                true
            }
            HostEvent::RunAll => {
                self.runner.run_all().await;
                true
            }
            HostEvent::ShutdownRequested => false,
        }
    }

    async fn files_changed(&mut self, paths: &[PathBuf]) -> Option<RunOutcome> {
        let rel: Vec<String> = paths
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect();

        let specs: Vec<PathBuf> = self
            .rules
            .map_paths(rel.iter().map(String::as_str))
            .into_iter()
            .map(PathBuf::from)
            .collect();

        if specs.is_empty() {
            debug!(?paths, "no watch rule matched; nothing to run");
            return None;
        }

        info!(?specs, "changes detected");
        Some(self.runner.run(&specs).await)
    }

    pub fn runner(&self) -> &Runner<E, N> {
        &self.runner
    }
}
