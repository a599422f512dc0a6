// src/engine/mod.rs

//! Test execution engine abstraction.
//!
//! The runner never executes suites itself. It hands an [`EngineRequest`] to
//! an [`Engine`] together with the formatter that should receive results.
//!
//! - [`command`] provides `CommandEngine`, which shells out to the configured
//!   command (a rake task by default) and streams its stdout into the
//!   formatter.
//! - Tests provide their own `Engine` that records requests instead of
//!   spawning processes.

pub mod command;

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::format::Formatter;
use crate::suite::SuiteSelection;
use crate::types::ExecutionMode;

pub use command::CommandEngine;

/// A single engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRequest {
    pub mode: ExecutionMode,
    pub suites: SuiteSelection,
}

/// Results flowing from the engine into the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A raw line of engine output.
    Output(String),
    /// Example counts, as reported by the engine's own summary line.
    Totals {
        examples: u32,
        failures: u32,
        pending: u32,
    },
    /// The engine finished with the given exit code.
    Finished { exit_code: i32 },
}

/// Trait abstracting how suites are executed.
pub trait Engine: Send {
    /// Run the requested suites, reporting results into `formatter`.
    ///
    /// Called exactly once per runner `run`.
    fn run<'a>(
        &'a mut self,
        request: EngineRequest,
        formatter: &'a mut dyn Formatter,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}
