//! Notification port interface
//!
//! Notices are one-shot messages shown briefly and then forgotten: the
//! desktop stand-in for a mobile toast.

use async_trait::async_trait;
use thiserror::Error;

/// Notification errors
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// What a notice is about; picks the icon and urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationIcon {
    Info,
    Success,
    Warning,
    Error,
    /// Overlay move mode toggled
    Move,
}

impl NotificationIcon {
    /// Freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::Info => "dialog-information",
            Self::Success => "dialog-ok",
            Self::Warning => "dialog-warning",
            Self::Error => "dialog-error",
            Self::Move => "transform-move",
        }
    }

    /// Whether the notice reports a problem the user should act on
    pub const fn is_problem(&self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// One-shot user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub icon: NotificationIcon,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>, icon: NotificationIcon) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            icon,
        }
    }
}

/// Port for showing notices
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show one notice. Delivery is best-effort; callers log failures.
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError>;
}

/// Blanket implementation for boxed notifier types
#[async_trait]
impl Notifier for Box<dyn Notifier> {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        self.as_ref().notify(notice).await
    }
}
