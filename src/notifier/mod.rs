// src/notifier/mod.rs

//! Notification sinks.
//!
//! Delivering desktop notifications is left to whatever the user already has
//! installed; konawatch either logs the notification or hands it to a
//! configured command.

pub mod command;
pub mod log;

use std::future::Future;
use std::pin::Pin;

use crate::config::NotifierSection;
use crate::errors::Result;
use crate::types::NotifyStatus;

pub use command::CommandNotifier;
pub use log::LogNotifier;

/// Trait abstracting where run notifications go.
pub trait Notifier: Send {
    /// Deliver one notification. Called at most once per run.
    fn notify<'a>(
        &'a mut self,
        message: &'a str,
        status: NotifyStatus,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Build the notifier described by `[notifier]`.
pub fn from_config(section: &NotifierSection) -> Box<dyn Notifier> {
    match section.cmd {
        Some(ref cmd) => Box::new(CommandNotifier::new(cmd.clone(), section.title.clone())),
        None => Box::new(LogNotifier::new(section.title.clone())),
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify<'a>(
        &'a mut self,
        message: &'a str,
        status: NotifyStatus,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        (**self).notify(message, status)
    }
}
