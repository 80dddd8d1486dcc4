//! Desktop notifications.
//!
//! [`NotifySend`] shells out to `notify-send` (libnotify), which is present
//! on practically every desktop that runs spotifyd.

use std::{path::Path, process::Stdio};

use async_trait::async_trait;
use tokio::process::Command;

use crate::{Error, Res};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, description: &str, icon: Option<&Path>) -> Res<()>;
}

pub struct NotifySend {
    app_name: String,
}

impl NotifySend {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Default for NotifySend {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

#[async_trait]
impl Notifier for NotifySend {
    async fn notify(&self, title: &str, description: &str, icon: Option<&Path>) -> Res<()> {
        let mut cmd = Command::new("notify-send");
        cmd.arg(format!("--app-name={}", self.app_name));
        if let Some(icon) = icon {
            cmd.arg(format!("--icon={}", icon.display()));
        }

        let status = cmd
            .arg("--")
            .arg(title)
            .arg(description)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .await
            .map_err(|e| Error::Notification(format!("failed to run notify-send: {e}")))?;

        if !status.success() {
            return Err(Error::Notification(format!("notify-send exited with {status}")));
        }
        Ok(())
    }
}
