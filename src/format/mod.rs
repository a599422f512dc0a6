// src/format/mod.rs

//! Result formatting.
//!
//! A [`Formatter`] accumulates [`EngineEvent`]s while the engine runs and
//! renders them once the run is over. The runner resets it before every run
//! and asks it for a summary afterwards; whatever the formatter exposes as
//! its summary line is what ends up in the notification.

pub mod summary;

use thiserror::Error;

use crate::engine::EngineEvent;

pub use summary::SummaryFormatter;

/// Failure while writing a summary.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("no results were reported by the engine")]
    NoResults,

    #[error("failed to write summary: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Capability the runner needs from a result formatter.
pub trait Formatter: Send {
    /// Drop everything accumulated by a previous run.
    fn reset(&mut self);

    /// Record a single event emitted by the engine.
    fn record(&mut self, event: EngineEvent);

    /// Render the accumulated results.
    fn write_summary(&mut self) -> Result<(), FormatError>;

    /// Latest summary line, available after a successful `write_summary`.
    fn summary_line(&self) -> Option<&str>;

    /// Whether the last run had no failures.
    fn passed(&self) -> bool;
}
