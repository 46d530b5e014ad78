//! # Notifications
//!
//! Facades report outcomes through an injected [`NotificationSink`] and never
//! touch a UI directly. Whatever renders toasts (or logs, or a test recorder)
//! plugs in here.

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

/// A one-shot, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

/// Receives notifications. Fire-and-forget.
pub trait NotificationSink: Send + Sync {
    fn emit(&self, notification: Notification);
}

impl<F> NotificationSink for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn emit(&self, notification: Notification) {
        self(notification)
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn emit(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success | NotificationKind::Info => {
                info!(message = %notification.message, "Notification")
            }
            NotificationKind::Warning => warn!(message = %notification.message, "Notification"),
            NotificationKind::Error => error!(message = %notification.message, "Notification"),
        }
    }
}

/// Forwards notifications to a presentation layer over a channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelSink {
    fn emit(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            warn!("Notification receiver dropped");
        }
    }
}

/// Called whenever any resource reports a 401/403.
pub trait SessionListener: Send + Sync {
    fn session_ended(&self, resource: &str, error: &ResourceError);
}

/// Default listener: logs and does nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSessionListener;

impl SessionListener for LogSessionListener {
    fn session_ended(&self, resource: &str, error: &ResourceError) {
        warn!(resource, error = %error, "Session ended");
    }
}
