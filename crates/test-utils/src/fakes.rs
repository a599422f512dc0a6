// crates/test-utils/src/fakes.rs

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use konawatch::engine::{Engine, EngineEvent, EngineRequest};
use konawatch::errors::Result;
use konawatch::format::{FormatError, Formatter};
use konawatch::notifier::Notifier;
use konawatch::types::NotifyStatus;

/// Everything the fakes observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Reset,
    EngineRun(EngineRequest),
    Record(EngineEvent),
    WriteSummary,
    Notify(String, NotifyStatus),
}

/// Shared, ordered log of calls across all fakes.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn engine_requests(&self) -> Vec<EngineRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::EngineRun(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<(String, NotifyStatus)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Notify(m, s) => Some((m, s)),
                _ => None,
            })
            .collect()
    }

    /// Position of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(pred)
    }
}

/// An engine that records requests and replays canned events into the
/// formatter instead of running anything.
pub struct FakeEngine {
    log: CallLog,
    events: Vec<EngineEvent>,
    error: Option<String>,
}

impl FakeEngine {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            events: Vec::new(),
            error: None,
        }
    }

    pub fn with_events(mut self, events: Vec<EngineEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }
}

impl Engine for FakeEngine {
    fn run<'a>(
        &'a mut self,
        request: EngineRequest,
        formatter: &'a mut dyn Formatter,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.log.push(Call::EngineRun(request));
            for event in self.events.iter().cloned() {
                formatter.record(event);
            }
            match self.error {
                Some(ref msg) => Err(anyhow::anyhow!(msg.clone()).into()),
                None => Ok(()),
            }
        })
    }
}

/// A formatter with a fixed summary line, or a fixed `write_summary` error.
pub struct FakeFormatter {
    log: CallLog,
    summary: String,
    error: Option<String>,
    passed: bool,
    written: Option<String>,
}

impl FakeFormatter {
    pub fn new(log: CallLog, summary: &str) -> Self {
        Self {
            log,
            summary: summary.to_string(),
            error: None,
            passed: true,
            written: None,
        }
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }

    pub fn with_failures(mut self) -> Self {
        self.passed = false;
        self
    }
}

impl Formatter for FakeFormatter {
    fn reset(&mut self) {
        self.log.push(Call::Reset);
        self.written = None;
    }

    fn record(&mut self, event: EngineEvent) {
        self.log.push(Call::Record(event));
    }

    fn write_summary(&mut self) -> std::result::Result<(), FormatError> {
        self.log.push(Call::WriteSummary);
        if let Some(ref msg) = self.error {
            return Err(FormatError::Other(msg.clone()));
        }
        self.written = Some(self.summary.clone());
        Ok(())
    }

    fn summary_line(&self) -> Option<&str> {
        self.written.as_deref()
    }

    fn passed(&self) -> bool {
        self.passed
    }
}

/// A notifier that records every notification.
pub struct RecordingNotifier {
    log: CallLog,
    error: Option<String>,
}

impl RecordingNotifier {
    pub fn new(log: CallLog) -> Self {
        Self { log, error: None }
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }
}

impl Notifier for RecordingNotifier {
    fn notify<'a>(
        &'a mut self,
        message: &'a str,
        status: NotifyStatus,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.log.push(Call::Notify(message.to_string(), status));
            match self.error {
                Some(ref msg) => Err(anyhow::anyhow!(msg.clone()).into()),
                None => Ok(()),
            }
        })
    }
}
