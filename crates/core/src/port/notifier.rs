// Notifier Port - outbound chat delivery

use async_trait::async_trait;
use thiserror::Error;

/// Notification delivery errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Rejected by chat service (status {status}): {description}")]
    Rejected { status: u16, description: String },
}

/// Notifier trait
///
/// Implementations:
/// - TelegramNotifier: Telegram Bot API
/// - LogNotifier: writes the message to the log (local runs)
///
/// Text may carry the bold/italic markup subset (`*bold*`, `_italic_`).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to one chat identifier
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Records every delivered message; fails for configured chat ids
    #[derive(Default)]
    pub struct RecordingNotifier {
        failing: HashSet<String>,
        sent: Mutex<Vec<(String, String)>>,
        attempts: Mutex<usize>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_for(chat_ids: &[&str]) -> Self {
            Self {
                failing: chat_ids.iter().map(|id| id.to_string()).collect(),
                ..Self::default()
            }
        }

        /// Successful deliveries as (chat_id, text)
        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }

        pub fn sent_to(&self, chat_id: &str) -> Vec<String> {
            self.sent()
                .into_iter()
                .filter(|(id, _)| id == chat_id)
                .map(|(_, text)| text)
                .collect()
        }

        pub fn attempts(&self) -> usize {
            *self.attempts.lock().unwrap()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
            *self.attempts.lock().unwrap() += 1;

            if self.failing.contains(chat_id) {
                return Err(NotifyError::Rejected {
                    status: 403,
                    description: "bot was blocked by the user".to_string(),
                });
            }

            self.sent
                .lock()
                .unwrap()
                .push((chat_id.to_string(), text.to_string()));
            Ok(())
        }
    }
}
