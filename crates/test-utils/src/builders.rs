// crates/test-utils/src/builders.rs

use std::sync::Arc;

use konawatch::config::RunnerOverrides;
use konawatch::fs::mock::MockFileSystem;
use konawatch::runner::Runner;

use crate::fakes::{CallLog, FakeEngine, FakeFormatter, RecordingNotifier};

pub type FakeRunner = Runner<FakeEngine, RecordingNotifier>;

/// Builder for a runner wired to fakes and an in-memory filesystem.
pub struct RunnerBuilder {
    log: CallLog,
    overrides: RunnerOverrides,
    fs: MockFileSystem,
    engine: Option<FakeEngine>,
    formatter: Option<FakeFormatter>,
    notifier: Option<RecordingNotifier>,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        Self {
            log: CallLog::new(),
            overrides: RunnerOverrides::default(),
            fs: MockFileSystem::new(),
            engine: None,
            formatter: None,
            notifier: None,
        }
    }

    /// Call log shared by every fake this builder creates.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn notification(mut self, val: bool) -> Self {
        self.overrides.notification = Some(val);
        self
    }

    pub fn run_all_on_start(mut self, val: bool) -> Self {
        self.overrides.run_all_on_start = Some(val);
        self
    }

    pub fn overrides(mut self, overrides: RunnerOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Make `path` exist in the mock filesystem.
    pub fn with_file(self, path: &str) -> Self {
        self.fs.add_file(path);
        self
    }

    pub fn engine(mut self, f: impl FnOnce(FakeEngine) -> FakeEngine) -> Self {
        self.engine = Some(f(FakeEngine::new(self.log.clone())));
        self
    }

    pub fn formatter(mut self, f: impl FnOnce(FakeFormatter) -> FakeFormatter) -> Self {
        self.formatter = Some(f(FakeFormatter::new(self.log.clone(), "1 example, 0 failures")));
        self
    }

    pub fn notifier(mut self, f: impl FnOnce(RecordingNotifier) -> RecordingNotifier) -> Self {
        self.notifier = Some(f(RecordingNotifier::new(self.log.clone())));
        self
    }

    pub fn build(self) -> (FakeRunner, CallLog) {
        let engine = self
            .engine
            .unwrap_or_else(|| FakeEngine::new(self.log.clone()));
        let formatter = self
            .formatter
            .unwrap_or_else(|| FakeFormatter::new(self.log.clone(), "1 example, 0 failures"));
        let notifier = self
            .notifier
            .unwrap_or_else(|| RecordingNotifier::new(self.log.clone()));

        let runner = Runner::new(&self.overrides, engine, Box::new(formatter), notifier)
            .with_fs(Arc::new(self.fs));
        (runner, self.log)
    }
}

impl Default for RunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
