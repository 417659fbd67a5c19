//! Desktop notification adapter using notify-rust

use async_trait::async_trait;
#[cfg(all(unix, not(target_os = "macos")))]
use notify_rust::{Hint, Urgency};
use notify_rust::{Notification, Timeout};

use crate::application::ports::{Notice, NotificationError, Notifier};

/// How long a notice stays on screen
const NOTICE_TIMEOUT_MS: u32 = 2_000;

/// Problems stay up a little longer
const PROBLEM_TIMEOUT_MS: u32 = 5_000;

/// Desktop notifier using notify-rust.
///
/// Notices are marked transient so they never pile up in the
/// notification history.
pub struct NotifyRustNotifier {
    app_name: String,
}

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self {
            app_name: "Volux".to_string(),
        }
    }

    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    fn build(&self, notice: &Notice) -> Notification {
        let timeout = if notice.icon.is_problem() {
            PROBLEM_TIMEOUT_MS
        } else {
            NOTICE_TIMEOUT_MS
        };
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(&notice.title)
            .body(&notice.message)
            .icon(notice.icon.icon_name())
            .timeout(Timeout::Milliseconds(timeout));

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            notification.hint(Hint::Transient(true));
            if notice.icon.is_problem() {
                notification.urgency(Urgency::Critical);
            }
        }
        notification
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        let notification = self.build(notice);

        // D-Bus round trip blocks
        tokio::task::spawn_blocking(move || {
            notification
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::SendFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
    }
}
