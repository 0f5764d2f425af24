// Log-only notifier for local runs without a bot token

use async_trait::async_trait;
use tracing::info;
use upkeep_core::port::{NotifyError, Notifier};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        info!(
            chat_id = %chat_id,
            chars = text.chars().count(),
            "Notification (log only)\n{}",
            text
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_always_delivers() {
        assert!(LogNotifier::new().send("100", "*hello*").await.is_ok());
    }
}
