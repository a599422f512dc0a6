// src/notifier/log.rs

use std::future::Future;
use std::pin::Pin;

use tracing::{info, warn};

use crate::errors::Result;
use crate::types::NotifyStatus;

use super::Notifier;

/// Writes notifications to the log.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    title: String,
}

impl LogNotifier {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Notifier for LogNotifier {
    fn notify<'a>(
        &'a mut self,
        message: &'a str,
        status: NotifyStatus,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            match status {
                NotifyStatus::Success => info!(title = %self.title, %status, "{}", message),
                NotifyStatus::Failed => warn!(title = %self.title, %status, "{}", message),
            }
            Ok(())
        })
    }
}
