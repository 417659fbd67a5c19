//! Notifier that only logs

use async_trait::async_trait;
use tracing::info;

use crate::application::ports::{Notice, NotificationError, Notifier};

/// Used when notifications are turned off; notices still reach the log
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        info!(title = %notice.title, message = %notice.message, "Notice");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::NotificationIcon;

    #[tokio::test]
    async fn always_succeeds() {
        let notice = Notice::new("Volux", "hello", NotificationIcon::Info);
        assert!(NoOpNotifier.notify(&notice).await.is_ok());
    }
}
