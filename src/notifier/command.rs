// src/notifier/command.rs

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{anyhow, Context};
use tokio::process::Command;
use tracing::debug;

use crate::errors::Result;
use crate::types::NotifyStatus;

use super::Notifier;

/// Runs a shell command for every notification.
///
/// The command sees `KONAWATCH_TITLE`, `KONAWATCH_MESSAGE` and
/// `KONAWATCH_STATUS` (`success` / `failed`) in its environment, e.g.
/// `notify-send "$KONAWATCH_TITLE" "$KONAWATCH_MESSAGE"`.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    cmd: String,
    title: String,
}

impl CommandNotifier {
    pub fn new(cmd: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            title: title.into(),
        }
    }

    fn build_command(&self, message: &str, status: NotifyStatus) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };

        cmd.env("KONAWATCH_TITLE", &self.title)
            .env("KONAWATCH_MESSAGE", message)
            .env("KONAWATCH_STATUS", status.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        cmd
    }
}

impl Notifier for CommandNotifier {
    fn notify<'a>(
        &'a mut self,
        message: &'a str,
        status: NotifyStatus,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            debug!(cmd = %self.cmd, %status, "running notifier command");

            let exit = self
                .build_command(message, status)
                .status()
                .await
                .with_context(|| format!("running notifier command '{}'", self.cmd))?;

            if !exit.success() {
                return Err(anyhow!(
                    "notifier command '{}' exited with {:?}",
                    self.cmd,
                    exit.code()
                )
                .into());
            }
            Ok(())
        })
    }
}
