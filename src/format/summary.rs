// src/format/summary.rs

use std::fmt;
use std::io::{self, Write};

use tracing::debug;

use crate::engine::EngineEvent;
use crate::types::FormatterKind;

use super::{FormatError, Formatter};

/// Default formatter: counts examples and failures reported by the engine,
/// keeps the engine's output, and prints both once the run is over.
pub struct SummaryFormatter {
    kind: FormatterKind,
    out: Box<dyn Write + Send>,
    output: Vec<String>,
    totals: Option<Totals>,
    exit_code: Option<i32>,
    summary_line: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Totals {
    examples: u32,
    failures: u32,
    pending: u32,
}

impl fmt::Debug for SummaryFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryFormatter")
            .field("kind", &self.kind)
            .field("totals", &self.totals)
            .field("exit_code", &self.exit_code)
            .field("summary_line", &self.summary_line)
            .finish_non_exhaustive()
    }
}

impl SummaryFormatter {
    /// Formatter writing to stdout.
    pub fn new(kind: FormatterKind) -> Self {
        Self::with_writer(kind, Box::new(io::stdout()))
    }

    pub fn with_writer(kind: FormatterKind, out: Box<dyn Write + Send>) -> Self {
        Self {
            kind,
            out,
            output: Vec::new(),
            totals: None,
            exit_code: None,
            summary_line: None,
        }
    }

    fn render_line(&self) -> Option<String> {
        if let Some(t) = self.totals {
            return Some(format!(
                "{} {}, {} {}, {} pending",
                t.examples,
                plural(t.examples, "example", "examples"),
                t.failures,
                plural(t.failures, "failure", "failures"),
                t.pending,
            ));
        }
        self.exit_code
            .map(|code| format!("engine exited with status {code}"))
    }
}

fn plural<'a>(n: u32, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

impl Formatter for SummaryFormatter {
    fn reset(&mut self) {
        self.output.clear();
        self.totals = None;
        self.exit_code = None;
        self.summary_line = None;
    }

    fn record(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Output(line) => self.output.push(line),
            EngineEvent::Totals {
                examples,
                failures,
                pending,
            } => {
                // Engines that run suites in batches may report several
                // totals lines; they add up.
                let t = self.totals.get_or_insert_with(Totals::default);
                t.examples = t.examples.saturating_add(examples);
                t.failures = t.failures.saturating_add(failures);
                t.pending = t.pending.saturating_add(pending);
            }
            EngineEvent::Finished { exit_code } => self.exit_code = Some(exit_code),
        }
    }

    fn write_summary(&mut self) -> Result<(), FormatError> {
        let line = self.render_line().ok_or(FormatError::NoResults)?;

        if self.kind == FormatterKind::Summary {
            if !self.passed() {
                for l in &self.output {
                    writeln!(self.out, "{l}")?;
                }
            }
            writeln!(self.out)?;
            writeln!(self.out, "{line}")?;
            self.out.flush()?;
        }

        debug!(summary = %line, "summary written");
        self.summary_line = Some(line);
        Ok(())
    }

    fn summary_line(&self) -> Option<&str> {
        self.summary_line.as_deref()
    }

    fn passed(&self) -> bool {
        let no_failures = self.totals.map(|t| t.failures == 0).unwrap_or(true);
        let clean_exit = self.exit_code.map(|c| c == 0).unwrap_or(true);
        no_failures && clean_exit
    }
}
