//! Local notification sinks

use crate::core::state::ConversionResult;
use anyhow::Result;
use async_trait::async_trait;
use console::style;

pub const CONVERSION_TITLE: &str = "Conversion complete ✅";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn for_conversion(result: &ConversionResult) -> Self {
        Notification {
            title: CONVERSION_TITLE.to_string(),
            body: result.summary(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn request_permission(&self) -> Result<PermissionStatus>;

    /// Emits the notification immediately, without any trigger delay.
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Prints notifications as a banner on stderr.
pub struct TerminalNotifier {
    enabled: bool,
}

impl TerminalNotifier {
    pub fn new(enabled: bool) -> Self {
        TerminalNotifier { enabled }
    }
}

#[async_trait]
impl NotificationSink for TerminalNotifier {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(if self.enabled {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }

    async fn notify(&self, notification: &Notification) -> Result<()> {
        eprintln!(
            "\u{7}{} {}",
            style(&notification.title).bold().cyan(),
            style(&notification.body).dim()
        );
        Ok(())
    }
}

pub struct NoopNotifier;

#[async_trait]
impl NotificationSink for NoopNotifier {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn notify(&self, _notification: &Notification) -> Result<()> {
        Ok(())
    }
}
